// Runtime configuration entity
// Immutable settings handed to every component at startup

use serde::{Deserialize, Serialize};

use crate::value_objects::PoolType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub executable_name: String,
    pub install_anchor: String,
    pub log_path_suffix: Vec<String>,
    pub log_file: Option<String>,
    pub record_url_marker: String,
    pub api_url: String,
    pub pool_types: Vec<PoolType>,
    pub banner_pool_id: u32,
    pub standard_items: Vec<String>,
    pub request_timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub locate_attempts: u32,
    pub extract_attempts: u32,
}

impl RuntimeConfig {
    pub fn is_standard_item(&self, name: &str) -> bool {
        self.standard_items.iter().any(|item| item == name)
    }
}
