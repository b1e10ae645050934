// Read models handed to the presentation layer

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub count: usize,
    pub ratio: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentPull {
    pub name: String,
    pub resource_type: String,
    pub pity: u32,
    pub sequence_index: u32,
    pub is_standard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSummary {
    pub pool_id: u32,
    pub pool_name: String,
    pub total_attempts: u32,
    pub current_pity: u32,
    pub five_star: TierSummary,
    pub four_star: TierSummary,
    /// 4★ counts keyed by `resource_type` (character, weapon, ...).
    pub four_star_by_resource: BTreeMap<String, usize>,
    pub recent_five_star: Vec<RecentPull>,
    /// Share of recent 5★ that were not standard items. Only set for the
    /// banner pool with at least one 5★.
    pub banner_hit_rate: Option<f64>,
}
