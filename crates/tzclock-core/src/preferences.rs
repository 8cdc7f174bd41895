//! Preference domain vocabulary
//!
//! Keys are opaque and caller-supplied; no central registry is enforced.
//! The constants here are the keys the clock frontends actually use, kept
//! in one place so the TUI and any future frontend agree on spelling.

use serde::{Deserialize, Serialize};

/// Key for the user's own timezone (default: the detected host timezone)
pub const USER_TIMEZONE_KEY: &str = "user-timezone";

/// Key for the comparison timezone (default: `"UTC"`)
pub const TARGET_TIMEZONE_KEY: &str = "target-timezone";

/// Key for the selected clock face style
pub const CLOCK_FACE_KEY: &str = "clock-face";

/// Clock face style selectable by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockFace {
    /// Traditional Roman numerals
    #[default]
    Classic,
    /// Clean geometric design
    Modern,
    /// Simple dots and lines
    Minimal,
    /// Digital time display
    Digital,
    /// Elegant with detailed markers
    Luxury,
}

impl ClockFace {
    /// Human-readable name for selector UIs
    pub fn name(&self) -> &'static str {
        match self {
            ClockFace::Classic => "Classic",
            ClockFace::Modern => "Modern",
            ClockFace::Minimal => "Minimal",
            ClockFace::Digital => "Digital",
            ClockFace::Luxury => "Luxury",
        }
    }
}

/// All clock faces, in selector display order
pub const CLOCK_FACES: [ClockFace; 5] = [
    ClockFace::Classic,
    ClockFace::Modern,
    ClockFace::Minimal,
    ClockFace::Digital,
    ClockFace::Luxury,
];
