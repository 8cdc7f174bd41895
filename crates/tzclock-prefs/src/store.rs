//! Preference store implementation
//!
//! The store owns the in-process view of all preference values and the two
//! persistence tiers behind it. Reads and writes are synchronous against
//! the in-process cache; primary-store persistence is fire-and-forget
//! through an ordered queue so a render loop never waits on storage.
//!
//! Lifecycle: `{uninitialized}` → capability probe → `{ready, cookies
//! enabled | disabled}` → per-key one-shot reconciliation → steady state.
//! Nothing leaves steady state except dropping the store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use tzclock_core::{CookieAttributes, CookieJar, ValueStoreEffects};

use crate::config::PreferenceStoreConfig;
use crate::error::PreferenceError;
use crate::events::{ChangeOrigin, PreferenceEvent};
use crate::handle::PreferenceHandle;

/// Operations applied by the persistence worker, in send order
enum PersistOp {
    Store { key: String, bytes: Vec<u8> },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

struct StoreShared {
    config: PreferenceStoreConfig,
    jar: Option<Arc<dyn CookieJar>>,
    /// Probe result, fixed for the store's lifetime
    cookies_enabled: bool,
    /// In-process view of all preference values; authoritative for reads
    cache: RwLock<HashMap<String, Value>>,
    /// Keys whose one-shot reconciliation has already run
    reconciled: Mutex<HashSet<String>>,
    events: broadcast::Sender<PreferenceEvent>,
    persist_tx: mpsc::UnboundedSender<PersistOp>,
}

/// Dual-backend preference store
///
/// Opened once at application start and torn down at process exit. Cloning
/// is cheap; clones share the same state, so handles opened anywhere in
/// the process observe a consistent current value per key.
#[derive(Clone)]
pub struct PreferenceStore {
    shared: Arc<StoreShared>,
}

impl PreferenceStore {
    /// Open a preference store over a primary backend and an optional
    /// cookie jar.
    ///
    /// Loads a snapshot of all existing records into the in-process cache
    /// (records that are not valid JSON are logged and skipped), probes
    /// cookie capability exactly once, and spawns the persistence worker.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Propagates primary-store failures from the snapshot load. Once open,
    /// the store never surfaces primary-store errors to callers again.
    pub async fn open(
        backend: Arc<dyn ValueStoreEffects>,
        jar: Option<Arc<dyn CookieJar>>,
        config: PreferenceStoreConfig,
    ) -> Result<Self, PreferenceError> {
        let mut cache = HashMap::new();
        for key in backend.list_keys(None).await? {
            let Some(bytes) = backend.retrieve(&key).await? else {
                continue;
            };
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => {
                    cache.insert(key, value);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping unparseable primary record");
                }
            }
        }

        let cookies_enabled = jar
            .as_deref()
            .map_or(false, |jar| probe_cookie_support(jar, &config));
        debug!(cookies_enabled, "cookie capability probe complete");

        let (events, _) = broadcast::channel(config.event_capacity);
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        tokio::spawn(persistence_worker(backend, persist_rx));

        Ok(Self {
            shared: Arc::new(StoreShared {
                config,
                jar,
                cookies_enabled,
                cache: RwLock::new(cache),
                reconciled: Mutex::new(HashSet::new()),
                events,
                persist_tx,
            }),
        })
    }

    /// Open a typed handle bound to one key.
    ///
    /// # Errors
    ///
    /// Fails only if `default` cannot be represented as JSON.
    pub fn handle<T>(
        &self,
        key: impl Into<String>,
        default: T,
    ) -> Result<PreferenceHandle<T>, PreferenceError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let default_json = serde_json::to_value(&default)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;
        Ok(PreferenceHandle::new(
            self.clone(),
            key.into(),
            default,
            default_json,
        ))
    }

    /// Whether the capability probe found a working cookie jar
    pub fn cookies_enabled(&self) -> bool {
        self.shared.cookies_enabled
    }

    /// Subscribe to change events for all keys
    pub fn subscribe(&self) -> broadcast::Receiver<PreferenceEvent> {
        self.shared.events.subscribe()
    }

    /// Shadow cookie name for a preference key
    pub fn shadow_cookie_name(&self, key: &str) -> String {
        self.shared.config.shadow_cookie_name(key)
    }

    /// Wait until every persistence operation enqueued so far has been
    /// applied to the primary store.
    ///
    /// The queue is FIFO, so a round-trip through it proves durability of
    /// everything sent before it. Intended for shutdown and tests; the
    /// normal write path never waits.
    ///
    /// # Errors
    ///
    /// Fails if the persistence worker has stopped.
    pub async fn flush(&self) -> Result<(), PreferenceError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.shared
            .persist_tx
            .send(PersistOp::Flush(ack_tx))
            .map_err(|_| PreferenceError::WorkerStopped)?;
        ack_rx.await.map_err(|_| PreferenceError::WorkerStopped)
    }

    /// Current value for a key, after running the one-shot reconciliation
    /// for it. Falls back to the default on absence; never fails.
    pub(crate) fn read_value(&self, key: &str, default_json: &Value) -> Value {
        self.reconcile(key, default_json);
        self.shared
            .cache
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_json.clone())
    }

    /// Commit a literal value for a key
    pub(crate) fn write_value(&self, key: &str, value: Value) {
        let mut cache = self.shared.cache.write();
        self.commit_locked(&mut cache, key, value, ChangeOrigin::Write);
    }

    /// Commit the result of an updater applied to the current value.
    ///
    /// The closure runs under the cache write lock, so it always observes
    /// the pre-write current value even when other handles write in the
    /// same tick. Returning `None` aborts the commit.
    pub(crate) fn update_value<F>(&self, key: &str, f: F)
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let mut cache = self.shared.cache.write();
        if let Some(next) = f(cache.get(key)) {
            self.commit_locked(&mut cache, key, next, ChangeOrigin::Write);
        }
    }

    /// Reset a key: remove the primary record and write the default into
    /// the shadow cookie.
    ///
    /// The shadow is overwritten rather than deleted. Deleting it would
    /// leave reconciliation free to resurrect the old value on the next
    /// load; writing the default keeps both tiers consistent and inert.
    pub(crate) fn reset_value(&self, key: &str, default_json: &Value) {
        let mut cache = self.shared.cache.write();
        cache.remove(key);
        self.send_persist(PersistOp::Remove {
            key: key.to_string(),
        });
        self.write_shadow(key, default_json);
        let _ = self.shared.events.send(PreferenceEvent {
            key: key.to_string(),
            value: default_json.clone(),
            origin: ChangeOrigin::Reset,
        });
    }

    /// One-shot promotion of a shadow cookie into the primary store.
    ///
    /// Runs at most once per key per store lifetime. Promotes only when
    /// the current primary value equals the caller's default (canonical
    /// JSON comparison); a non-default primary value always wins over the
    /// shadow. Cannot distinguish "reset to default" from "never set";
    /// see the crate docs for why that ambiguity is preserved.
    fn reconcile(&self, key: &str, default_json: &Value) {
        if !self.shared.reconciled.lock().insert(key.to_string()) {
            return;
        }
        if !self.shared.cookies_enabled {
            return;
        }
        let Some(jar) = &self.shared.jar else {
            return;
        };
        let Some(raw) = jar.get(&self.shadow_cookie_name(key)) else {
            return;
        };

        let mut cache = self.shared.cache.write();
        let at_default = cache.get(key).map_or(true, |cur| cur == default_json);
        if !at_default {
            return;
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(shadow) => {
                debug!(key = %key, "promoting shadow cookie into primary store");
                self.commit_locked(&mut cache, key, shadow, ChangeOrigin::Reconciled);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "failed to parse shadow cookie; keeping primary value");
            }
        }
    }

    /// Shared commit path: cache first (the optimistic, visible value),
    /// then the ordered primary persist, then the shadow cookie, then the
    /// change broadcast.
    fn commit_locked(
        &self,
        cache: &mut HashMap<String, Value>,
        key: &str,
        value: Value,
        origin: ChangeOrigin,
    ) {
        cache.insert(key.to_string(), value.clone());
        match serde_json::to_vec(&value) {
            Ok(bytes) => self.send_persist(PersistOp::Store {
                key: key.to_string(),
                bytes,
            }),
            Err(e) => {
                warn!(key = %key, error = %e, "could not encode value; primary persist skipped");
            }
        }
        self.write_shadow(key, &value);
        let _ = self.shared.events.send(PreferenceEvent {
            key: key.to_string(),
            value,
            origin,
        });
    }

    /// Best-effort shadow cookie write; a no-op when the probe failed
    fn write_shadow(&self, key: &str, value: &Value) {
        if !self.shared.cookies_enabled {
            return;
        }
        let Some(jar) = &self.shared.jar else {
            return;
        };
        let attributes = CookieAttributes {
            expires_days: Some(self.shared.config.shadow_ttl_days),
            ..CookieAttributes::default()
        };
        if let Err(e) = jar.set(&self.shadow_cookie_name(key), &value.to_string(), &attributes) {
            warn!(key = %key, error = %e, "shadow cookie write failed");
        }
    }

    fn send_persist(&self, op: PersistOp) {
        if self.shared.persist_tx.send(op).is_err() {
            warn!("persistence worker stopped; value remains session-only");
        }
    }
}

/// Drains the persistence queue in order. Failures are logged, never
/// retried: the in-process value already committed optimistically and the
/// worst case is a preference that does not survive the session.
async fn persistence_worker(
    backend: Arc<dyn ValueStoreEffects>,
    mut rx: mpsc::UnboundedReceiver<PersistOp>,
) {
    while let Some(op) = rx.recv().await {
        match op {
            PersistOp::Store { key, bytes } => {
                if let Err(e) = backend.store(&key, bytes).await {
                    warn!(key = %key, error = %e, "primary store write failed");
                }
            }
            PersistOp::Remove { key } => {
                if let Err(e) = backend.remove(&key).await {
                    warn!(key = %key, error = %e, "primary store remove failed");
                }
            }
            PersistOp::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

/// Behavioral cookie capability test: write a disposable probe cookie,
/// read it back, and delete it. Capability holds iff the read-back value
/// matches. Catches jars that silently drop writes, not just jars that
/// error.
fn probe_cookie_support(jar: &dyn CookieJar, config: &PreferenceStoreConfig) -> bool {
    let token = Uuid::new_v4().to_string();
    let attributes = CookieAttributes {
        expires_days: Some(1),
        ..CookieAttributes::default()
    };
    if jar.set(&config.probe_cookie_name, &token, &attributes).is_err() {
        return false;
    }
    let supported = jar.get(&config.probe_cookie_name).as_deref() == Some(token.as_str());
    if supported {
        jar.remove(&config.probe_cookie_name);
    }
    supported
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Jar that accepts writes but silently drops them
    struct SilentlyDroppingJar {
        set_calls: AtomicUsize,
    }

    impl CookieJar for SilentlyDroppingJar {
        fn get(&self, _name: &str) -> Option<String> {
            None
        }

        fn set(
            &self,
            _name: &str,
            _value: &str,
            _attributes: &CookieAttributes,
        ) -> Result<(), tzclock_core::CookieError> {
            self.set_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn remove(&self, _name: &str) {}
    }

    /// Jar backed by a plain map, enough to exercise the probe
    #[derive(Default)]
    struct MapJar {
        cookies: Mutex<HashMap<String, String>>,
    }

    impl CookieJar for MapJar {
        fn get(&self, name: &str) -> Option<String> {
            self.cookies.lock().get(name).cloned()
        }

        fn set(
            &self,
            name: &str,
            value: &str,
            _attributes: &CookieAttributes,
        ) -> Result<(), tzclock_core::CookieError> {
            self.cookies.lock().insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, name: &str) {
            self.cookies.lock().remove(name);
        }
    }

    #[test]
    fn probe_passes_on_a_working_jar_and_cleans_up() {
        let jar = MapJar::default();
        let config = PreferenceStoreConfig::default();
        assert!(probe_cookie_support(&jar, &config));
        assert!(jar.get(&config.probe_cookie_name).is_none());
    }

    #[test]
    fn probe_fails_when_writes_are_silently_dropped() {
        let jar = SilentlyDroppingJar {
            set_calls: AtomicUsize::new(0),
        };
        let config = PreferenceStoreConfig::default();
        assert!(!probe_cookie_support(&jar, &config));
        assert_eq!(jar.set_calls.load(Ordering::SeqCst), 1);
    }
}
