//! Configuration for the preference store

/// Configuration for a [`crate::PreferenceStore`]
#[derive(Debug, Clone)]
pub struct PreferenceStoreConfig {
    /// Namespace prefix applied to preference keys to name shadow cookies
    pub cookie_prefix: String,
    /// Name of the disposable cookie written by the capability probe
    pub probe_cookie_name: String,
    /// Lifetime of shadow cookies, in days
    pub shadow_ttl_days: i64,
    /// Capacity of the change event broadcast channel
    pub event_capacity: usize,
}

impl Default for PreferenceStoreConfig {
    fn default() -> Self {
        Self {
            cookie_prefix: "tz-".to_string(),
            probe_cookie_name: "tz-cookie-probe".to_string(),
            shadow_ttl_days: 365,
            event_capacity: 64,
        }
    }
}

impl PreferenceStoreConfig {
    /// Shadow cookie name for a preference key
    pub fn shadow_cookie_name(&self, key: &str) -> String {
        format!("{}{}", self.cookie_prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_names_carry_the_namespace_prefix() {
        let config = PreferenceStoreConfig::default();
        assert_eq!(config.shadow_cookie_name("clock-face"), "tz-clock-face");
    }
}
