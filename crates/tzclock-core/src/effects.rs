//! Value Store Effect Interface
//!
//! Abstract interface for the primary preference persistence backend. The
//! preference store consumes this trait; production handlers live in
//! `tzclock-effects` and test handlers beside the code that needs them.
//!
//! Values cross this boundary as raw JSON bytes. Serialization policy (and
//! the typed accessor surface) belongs to the preference layer, not to
//! backends.

use async_trait::async_trait;

/// Errors surfaced by value store handlers
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValueStoreError {
    /// Reading a record failed
    #[error("value store read failed: {0}")]
    ReadFailed(String),

    /// Writing a record failed
    #[error("value store write failed: {0}")]
    WriteFailed(String),

    /// Deleting a record failed
    #[error("value store delete failed: {0}")]
    DeleteFailed(String),

    /// The key is not acceptable to this backend
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
}

/// Primary value store abstraction
///
/// Semantics expected by the preference layer:
/// - `store` upserts; there is no separate create step.
/// - `retrieve` returns `None` for a key that was never stored or was
///   removed. Backends do not distinguish the two.
/// - Operations are local and effectively non-blocking; handlers must not
///   perform network I/O.
#[async_trait]
pub trait ValueStoreEffects: Send + Sync {
    /// Store raw JSON bytes under a key, replacing any existing record
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), ValueStoreError>;

    /// Retrieve the raw bytes stored under a key
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, ValueStoreError>;

    /// Remove a record, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool, ValueStoreError>;

    /// List stored keys, optionally filtered by prefix
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, ValueStoreError>;
}
