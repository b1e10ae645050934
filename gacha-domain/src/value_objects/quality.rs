// Quality tier value object

use serde::{Deserialize, Serialize};

/// Rarity tiers that are materialized as pull events. Lower tiers only count
/// as attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Four,
    Five,
}

impl Quality {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            4 => Some(Quality::Four),
            5 => Some(Quality::Five),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Quality::Four => 4,
            Quality::Five => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Four => "4★",
            Quality::Five => "5★",
        }
    }
}
