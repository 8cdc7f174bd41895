//! # tzclock Prefs - Dual-Backend Preference Store
//!
//! Durably persists small JSON-serializable preference values into a
//! primary value store, mirrored into the host's cookie jar so state can
//! be recovered when the primary store is cleared while the jar is not
//! (or scoped differently than expected).
//!
//! ## Tiers
//! - **Primary copy**: held in a [`ValueStoreEffects`] backend,
//!   authoritative when present and non-default.
//! - **Shadow copy**: a cookie named `<prefix><key>`, rewritten on every
//!   successful write with a one-year expiry and lax same-site scoping.
//!
//! ## Reconciliation
//! Once per key, on the first read after [`PreferenceStore::open`]: if the
//! primary value equals the handle's default and a parseable shadow cookie
//! exists, the shadow value is promoted into the primary store through the
//! normal write path.
//!
//! Known ambiguity, kept deliberately: the heuristic cannot distinguish
//! "user reset this to the default" from "never set", so a stale shadow
//! cookie can resurrect an intentionally reset value on the next load.
//! [`PreferenceHandle::reset`] narrows the window by writing the default
//! into the shadow cookie instead of deleting it.
//!
//! ## Failure philosophy
//! Persistence is a best-effort convenience layer. Reads never fail;
//! shadow-tier problems degrade to "primary only"; a disabled cookie jar
//! (detected by a behavioral probe at open) degrades to "works for this
//! session's store only". Failures surface as `tracing` events, never as
//! user-visible errors.

#![forbid(unsafe_code)]

/// Store configuration
pub mod config;

/// Errors surfaced by the preference layer
pub mod error;

/// Change events broadcast to subscribers
pub mod events;

/// Typed per-key accessors
pub mod handle;

/// The preference store itself
pub mod store;

pub use config::PreferenceStoreConfig;
pub use error::PreferenceError;
pub use events::{ChangeOrigin, PreferenceEvent};
pub use handle::PreferenceHandle;
pub use store::PreferenceStore;

pub use tzclock_core::{CookieJar, ValueStoreEffects};
