//! Change events
//!
//! The store broadcasts an event synchronously after every visible commit
//! so a render layer can re-render without polling. Receivers that fall
//! behind the channel capacity miss intermediate events and should re-read
//! current values, which is the natural recovery for a render loop anyway.

use serde_json::Value;

/// What caused a preference value to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// An explicit write through a handle
    Write,
    /// A reset back to the handle's default
    Reset,
    /// A shadow cookie value promoted during reconciliation
    Reconciled,
}

/// A committed change to one preference key
#[derive(Debug, Clone)]
pub struct PreferenceEvent {
    /// The preference key that changed
    pub key: String,
    /// The new current value, as canonical JSON
    pub value: Value,
    /// What caused the change
    pub origin: ChangeOrigin,
}
