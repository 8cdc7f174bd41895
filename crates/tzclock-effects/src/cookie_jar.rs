//! Cookie jar handlers

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};

use tzclock_core::{CookieAttributes, CookieError, CookieJar};

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: Option<OffsetDateTime>,
}

/// In-memory cookie jar with browser expiry semantics
///
/// Two behaviors of real jars matter to the preference layer and are
/// reproduced here:
/// - writing a cookie whose expiry lies in the past deletes it, which is
///   how the capability probe cleans up after itself;
/// - an expired cookie is gone on the next read, not merely flagged.
///
/// Path, domain, secure, and same-site attributes are accepted and
/// dropped; a single-origin in-process jar has nothing to scope.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Arc<Mutex<HashMap<String, StoredCookie>>>,
}

impl MemoryCookieJar {
    /// Create an empty jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) cookies
    pub fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.cookies
            .lock()
            .values()
            .filter(|c| c.expires_at.map_or(true, |at| at > now))
            .count()
    }

    /// Whether the jar holds no live cookies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let mut cookies = self.cookies.lock();
        let cookie = cookies.get(name)?;
        if let Some(at) = cookie.expires_at {
            if at <= OffsetDateTime::now_utc() {
                cookies.remove(name);
                return None;
            }
        }
        Some(cookie.value.clone())
    }

    fn set(
        &self,
        name: &str,
        value: &str,
        attributes: &CookieAttributes,
    ) -> Result<(), CookieError> {
        let mut cookies = self.cookies.lock();
        match attributes.expires_days {
            Some(days) if days <= 0 => {
                cookies.remove(name);
            }
            days => {
                let expires_at =
                    days.map(|d| OffsetDateTime::now_utc() + Duration::days(d));
                cookies.insert(
                    name.to_string(),
                    StoredCookie {
                        value: value.to_string(),
                        expires_at,
                    },
                );
            }
        }
        Ok(())
    }

    fn remove(&self, name: &str) {
        self.cookies.lock().remove(name);
    }
}
