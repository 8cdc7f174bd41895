//! Cookie Jar Abstraction
//!
//! The shadow tier of the preference store lives in the host's cookie jar.
//! This module defines the jar interface and the attribute set the
//! preference layer knows how to request. The jar is process-and-origin
//! global and synchronous, matching `document.cookie` semantics; no async
//! boundary is warranted here.
//!
//! The preference layer owns serialization (JSON text values) and naming
//! (a fixed namespace prefix applied to preference keys). Jars only see
//! opaque name/value pairs plus attributes.

use serde::{Deserialize, Serialize};

/// SameSite scoping policy for a cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Sent only for same-site requests
    Strict,
    /// Sent for same-site requests and top-level navigations
    Lax,
    /// Sent for all requests (requires `secure` in browsers)
    None,
}

impl SameSite {
    /// Attribute value as it appears in a cookie string
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
            SameSite::None => "none",
        }
    }
}

/// Attributes attached to a cookie write
///
/// Defaults match the preference store's shadow cookies: one year of
/// lifetime, root path, lax same-site scoping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    /// Days until expiration. A non-positive value requests deletion,
    /// mirroring browser behavior for cookies expired in the past.
    pub expires_days: Option<i64>,
    /// Path scope
    pub path: Option<String>,
    /// Domain scope
    pub domain: Option<String>,
    /// Restrict the cookie to secure transports
    pub secure: bool,
    /// Same-site policy
    pub same_site: Option<SameSite>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            expires_days: Some(365),
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl CookieAttributes {
    /// Attributes requesting immediate deletion of a cookie
    pub fn expired() -> Self {
        Self {
            expires_days: Some(-1),
            ..Self::default()
        }
    }
}

/// Errors surfaced by cookie jar handlers
#[derive(Debug, Clone, thiserror::Error)]
pub enum CookieError {
    /// The jar rejected the write
    #[error("cookie jar rejected write: {0}")]
    WriteRejected(String),

    /// Cookies are disabled or unsupported in this context
    #[error("cookies are disabled in this context")]
    Disabled,
}

/// Cookie jar abstraction
///
/// A write that the jar silently drops is indistinguishable from a
/// disabled jar; callers that need to know probe behaviorally (write,
/// read back, compare) rather than trusting `set` to report the truth.
pub trait CookieJar: Send + Sync {
    /// Read the current value of a cookie
    fn get(&self, name: &str) -> Option<String>;

    /// Write a cookie with the given attributes
    fn set(&self, name: &str, value: &str, attributes: &CookieAttributes)
        -> Result<(), CookieError>;

    /// Delete a cookie
    fn remove(&self, name: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attributes_are_one_year_lax() {
        let attrs = CookieAttributes::default();
        assert_eq!(attrs.expires_days, Some(365));
        assert_eq!(attrs.path.as_deref(), Some("/"));
        assert_eq!(attrs.same_site, Some(SameSite::Lax));
        assert!(!attrs.secure);
    }

    #[test]
    fn expired_attributes_request_deletion() {
        assert_eq!(CookieAttributes::expired().expires_days, Some(-1));
    }

    #[test]
    fn same_site_attribute_strings() {
        assert_eq!(SameSite::Lax.as_str(), "lax");
        assert_eq!(SameSite::Strict.as_str(), "strict");
        assert_eq!(SameSite::None.as_str(), "none");
    }
}
