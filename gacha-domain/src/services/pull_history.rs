use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entities::{PullEvent, RawPullRecord};
use crate::error::GachaError;
use crate::utils::{parse_pull_time, round_to};
use crate::value_objects::Quality;

pub const RECENT_HISTORY_LIMIT: usize = 20;

/// Per-pool pull history. Built once by [`PullHistory::load`] and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullHistory {
    total_attempts: u32,
    four_star: Vec<PullEvent>,
    five_star: Vec<PullEvent>,
}

impl PullHistory {
    /// Builds the history from a raw list delivered newest first.
    ///
    /// Every record advances the sequence counter, including the 1-3★ filler
    /// that is never stored. A 4★ measures its pity from the last 4★ or 5★,
    /// a 5★ from the last 5★ only.
    pub fn load(records: &[RawPullRecord]) -> Result<Self, GachaError> {
        let mut history = PullHistory::default();
        let mut sequence_index = 0u32;

        for record in records.iter().rev() {
            sequence_index += 1;
            debug!(
                attempt = sequence_index,
                item = %record.name,
                quality = record.quality_level,
                "pull"
            );

            let Some(quality) = Quality::from_level(record.quality_level) else {
                if record.quality_level > 5 {
                    warn!(item = %record.name, quality = record.quality_level, "untracked quality level");
                }
                continue;
            };

            let baseline = pity_baseline(quality, &history.four_star, &history.five_star);
            let event = PullEvent {
                name: record.name.clone(),
                resource_type: record.resource_type.clone(),
                pool_type: record.card_pool_type.unwrap_or_default(),
                quality,
                timestamp: parse_pull_time(&record.time)?,
                sequence_index,
                pity: sequence_index - baseline,
            };
            debug!(event = %event, "stored {}", quality.as_str());
            match quality {
                Quality::Four => history.four_star.push(event),
                Quality::Five => history.five_star.push(event),
            }
        }

        history.total_attempts = sequence_index;
        info!(
            attempts = history.total_attempts,
            four_star = history.four_star.len(),
            five_star = history.five_star.len(),
            "loaded pull history"
        );
        Ok(history)
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    /// Events of one tier in ascending sequence order.
    pub fn events(&self, quality: Quality) -> &[PullEvent] {
        match quality {
            Quality::Four => &self.four_star,
            Quality::Five => &self.five_star,
        }
    }

    pub fn ratio(&self, quality: Quality) -> f64 {
        let events = self.events(quality);
        if events.is_empty() || self.total_attempts == 0 {
            return 0.0;
        }
        round_to(events.len() as f64 / f64::from(self.total_attempts), 6)
    }

    pub fn average(&self, quality: Quality) -> f64 {
        let events = self.events(quality);
        if events.is_empty() {
            return 0.0;
        }
        let total: u64 = events.iter().map(|event| u64::from(event.pity)).sum();
        round_to(total as f64 / events.len() as f64, 2)
    }

    /// Pulls since the latest 5★, or all attempts when there is none.
    pub fn current_pity(&self) -> u32 {
        match self.five_star.last() {
            Some(last) => self.total_attempts - last.sequence_index,
            None => self.total_attempts,
        }
    }

    /// The newest `limit` events of a tier, oldest first.
    pub fn recent_history(&self, quality: Quality, limit: usize) -> &[PullEvent] {
        let events = self.events(quality);
        &events[events.len().saturating_sub(limit)..]
    }
}

fn pity_baseline(quality: Quality, four_star: &[PullEvent], five_star: &[PullEvent]) -> u32 {
    let last_five = five_star.last().map_or(0, |event| event.sequence_index);
    match quality {
        Quality::Five => last_five,
        Quality::Four => {
            let last_four = four_star.last().map_or(0, |event| event.sequence_index);
            last_four.max(last_five)
        }
    }
}
