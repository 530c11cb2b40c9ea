//! Meters that react to score events: streak, combo and achievements.
//!
//! Each system owns its own counters and effects and exposes `update`, `draw`
//! and `reset`. Scoring outcomes come back as plain values so the session can
//! route cues, shake and persistence.

pub mod achievements;
pub mod combo;
pub mod streak;

pub use achievements::{Achievement, AchievementId, Achievements, Rule};
pub use combo::{Combo, ComboUpdate};
pub use streak::{Streak, StreakUpdate};

use crate::color::{GOLD, Rgb, SANTA_RED, PINE, WHITE};

/// Colors used by every celebratory burst.
pub const FESTIVE_PALETTE: [Rgb; 5] = [SANTA_RED, GOLD, PINE, Rgb::hex(0x4169E1), WHITE];
