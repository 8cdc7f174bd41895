//! # tzclock Effects - Production Handlers
//!
//! Stateless or self-contained implementations of the effect traits from
//! `tzclock-core`. These handlers perform the actual storage work the
//! preference layer delegates to:
//!
//! - [`MemoryValueStore`]: in-process value store. Used when no durable
//!   backend is available; preferences then survive for the session only.
//! - [`FilesystemValueStore`]: one JSON file per key under a base
//!   directory. The native analog of a browser's application KV store.
//! - [`MemoryCookieJar`]: cookie jar with browser expiry semantics, for
//!   hosts that have no real jar and for exercising the shadow tier.
//!
//! No preference logic lives here. Reconciliation, namespacing, and
//! serialization policy belong to `tzclock-prefs`.

#![forbid(unsafe_code)]

/// Cookie jar handlers
pub mod cookie_jar;

/// Value store handlers
pub mod value_store;

pub use cookie_jar::MemoryCookieJar;
pub use value_store::{FilesystemValueStore, MemoryValueStore};
