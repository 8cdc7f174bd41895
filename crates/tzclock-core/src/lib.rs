//! # tzclock Core - Foundation Types and Effect Traits
//!
//! This crate provides the foundational types and effect interfaces for the
//! tzclock preference layer. It contains only trait signatures and plain data
//! types with no implementation details or I/O.
//!
//! ## Effect Interfaces (Pure Signatures)
//! - [`ValueStoreEffects`]: async key/value persistence (`store`, `retrieve`,
//!   `remove`, `list_keys`)
//! - [`CookieJar`]: synchronous name/value cookie access with attributes
//!
//! ## Domain Vocabulary
//! - [`ClockFace`]: the clock face styles a user can select
//! - Well-known preference keys ([`USER_TIMEZONE_KEY`],
//!   [`TARGET_TIMEZONE_KEY`], [`CLOCK_FACE_KEY`])
//!
//! Handlers implementing these traits live in `tzclock-effects`; the
//! dual-backend preference store consuming them lives in `tzclock-prefs`.

#![forbid(unsafe_code)]

/// Cookie jar trait, attribute types, and cookie errors
pub mod cookie;

/// Value store effect trait and errors
pub mod effects;

/// Preference domain vocabulary shared across frontends
pub mod preferences;

pub use cookie::{CookieAttributes, CookieError, CookieJar, SameSite};
pub use effects::{ValueStoreEffects, ValueStoreError};
pub use preferences::{
    ClockFace, CLOCK_FACES, CLOCK_FACE_KEY, TARGET_TIMEZONE_KEY, USER_TIMEZONE_KEY,
};
