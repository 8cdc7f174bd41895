//! Preference layer errors
//!
//! Only operations off the optimistic path return errors: `open` (snapshot
//! load), `handle` (default must be JSON-representable), and `flush`.
//! Reads, writes, and resets degrade and log instead.

use tzclock_core::ValueStoreError;

/// Errors surfaced by the preference store
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The primary value store failed; propagated per its own contract
    #[error("value store error: {0}")]
    Store(#[from] ValueStoreError),

    /// A default value could not be represented as JSON
    #[error("default value is not JSON-representable: {0}")]
    Serialization(String),

    /// The background persistence worker has stopped
    #[error("persistence worker is no longer running")]
    WorkerStopped,
}
