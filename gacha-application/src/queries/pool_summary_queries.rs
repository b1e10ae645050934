use std::collections::BTreeMap;

use gacha_domain::{round_to, PoolType, PullHistory, Quality, RuntimeConfig, RECENT_HISTORY_LIMIT};

use crate::dtos::{PoolSummary, RecentPull, TierSummary};
use crate::session::GachaSession;

/// Summaries of every populated pool, in pool table order.
pub fn summarize_pools(session: &GachaSession) -> Vec<PoolSummary> {
    session
        .histories()
        .iter()
        .map(|entry| summarize_pool(session.config(), &entry.pool, &entry.history))
        .collect()
}

pub fn summarize_pool(config: &RuntimeConfig, pool: &PoolType, history: &PullHistory) -> PoolSummary {
    let is_banner = pool.id == config.banner_pool_id;

    let recent_five_star: Vec<RecentPull> = history
        .recent_history(Quality::Five, RECENT_HISTORY_LIMIT)
        .iter()
        .map(|event| RecentPull {
            name: event.name.clone(),
            resource_type: event.resource_type.clone(),
            pity: event.pity,
            sequence_index: event.sequence_index,
            is_standard: is_banner && config.is_standard_item(&event.name),
        })
        .collect();

    let banner_hit_rate = if is_banner && !recent_five_star.is_empty() {
        let hits = recent_five_star.iter().filter(|pull| !pull.is_standard).count();
        Some(round_to(hits as f64 / recent_five_star.len() as f64, 4))
    } else {
        None
    };

    let mut four_star_by_resource = BTreeMap::new();
    for event in history.events(Quality::Four) {
        *four_star_by_resource
            .entry(event.resource_type.clone())
            .or_insert(0) += 1;
    }

    PoolSummary {
        pool_id: pool.id,
        pool_name: pool.name.clone(),
        total_attempts: history.total_attempts(),
        current_pity: history.current_pity(),
        five_star: tier(history, Quality::Five),
        four_star: tier(history, Quality::Four),
        four_star_by_resource,
        recent_five_star,
        banner_hit_rate,
    }
}

fn tier(history: &PullHistory, quality: Quality) -> TierSummary {
    TierSummary {
        count: history.events(quality).len(),
        ratio: history.ratio(quality),
        average: history.average(quality),
    }
}
