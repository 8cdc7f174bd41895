//! Typed per-key preference accessors
//!
//! A handle is a lightweight view over the store bound to one key and one
//! default value. Handles are cheap to clone and to recreate; all state
//! lives in the store, so every handle on a key observes the same current
//! value (last write wins).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;

use crate::events::PreferenceEvent;
use crate::store::PreferenceStore;

/// Typed accessor for a single preference key
#[derive(Clone)]
pub struct PreferenceHandle<T> {
    store: PreferenceStore,
    key: String,
    default: T,
    default_json: Value,
}

impl<T> PreferenceHandle<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub(crate) fn new(
        store: PreferenceStore,
        key: String,
        default: T,
        default_json: Value,
    ) -> Self {
        Self {
            store,
            key,
            default,
            default_json,
        }
    }

    /// The key this handle is bound to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, or the default when the key is unset.
    ///
    /// The first read per key per store lifetime runs the one-shot shadow
    /// reconciliation. Never fails: an inaccessible or shape-mismatched
    /// stored value degrades to the default and a log entry.
    pub fn read(&self) -> T {
        let value = self.store.read_value(&self.key, &self.default_json);
        match serde_json::from_value(value) {
            Ok(current) => current,
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored value does not match expected shape; using default");
                self.default.clone()
            }
        }
    }

    /// Commit a new value to both tiers.
    ///
    /// The in-process value updates immediately; primary persistence is
    /// fire-and-forget and shadow failures only log. A value that cannot
    /// be represented as JSON is logged and skipped entirely; nothing
    /// unserializable is allowed into either tier.
    pub fn write(&self, value: T) {
        match serde_json::to_value(&value) {
            Ok(json) => self.store.write_value(&self.key, json),
            Err(e) => {
                warn!(key = %self.key, error = %e, "value is not JSON-representable; write skipped");
            }
        }
    }

    /// Commit the result of applying `f` to the current value.
    ///
    /// Use this instead of `read` + `write` when the next value derives
    /// from the current one: the updater runs against the pre-write
    /// current value even if another handle wrote in the same tick.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        self.store.update_value(&self.key, |current| {
            let current: T = current
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_else(|| self.default.clone());
            match serde_json::to_value(f(current)) {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "updated value is not JSON-representable; write skipped");
                    None
                }
            }
        });
    }

    /// Restore the default in both tiers.
    ///
    /// The primary record is removed (indistinguishable from never-set,
    /// by design); the shadow cookie is overwritten with the default, not
    /// deleted.
    pub fn reset(&self) {
        self.store.reset_value(&self.key, &self.default_json);
    }

    /// Subscribe to change events. Events for all keys are delivered;
    /// filter on [`PreferenceEvent::key`].
    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceEvent> {
        self.store.subscribe()
    }
}
