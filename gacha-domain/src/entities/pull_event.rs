// Pull event entity
// A stored 4★ or 5★ pull with its position and pity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Quality;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullEvent {
    pub name: String,
    pub resource_type: String,
    pub pool_type: u32,
    pub quality: Quality,
    pub timestamp: i64,
    pub sequence_index: u32,
    pub pity: u32,
}

impl fmt::Display for PullEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]{}: {}@{}",
            self.resource_type, self.name, self.pity, self.timestamp
        )
    }
}
