//! Caller-side pull history and counters.

use crate::core::constants::RARITY_COUNT;
use crate::engine::PullResult;
use crate::items::Rarity;
use serde::{Deserialize, Serialize};

/// Aggregate counters over any number of pulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullStats {
    pub total_pulls: u64,
    pub by_rarity: [u64; RARITY_COUNT],
    pub pity_triggers: u64,
    pub new_items: u64,
    pub duplicates: u64,
    pub featured_hits: u64,
    /// Pulls since the last legendary, including the current streak.
    pub current_legendary_gap: u64,
    /// Longest run of pulls ending in (and counting) a legendary.
    pub max_legendary_gap: u64,
}

impl PullStats {
    pub fn record(&mut self, result: &PullResult) {
        self.total_pulls += 1;
        self.by_rarity[result.rarity.index()] += 1;
        if result.pity_triggered {
            self.pity_triggers += 1;
        }
        if result.is_new {
            self.new_items += 1;
        } else {
            self.duplicates += 1;
        }
        if result.is_featured {
            self.featured_hits += 1;
        }

        self.current_legendary_gap += 1;
        if result.rarity == Rarity::Legendary {
            self.max_legendary_gap = self.max_legendary_gap.max(self.current_legendary_gap);
            self.current_legendary_gap = 0;
        }
    }

    pub fn count(&self, rarity: Rarity) -> u64 {
        self.by_rarity[rarity.index()]
    }

    pub fn legendary_hits(&self) -> u64 {
        self.count(Rarity::Legendary)
    }

    /// Empirical frequency of `rarity`, 0 when nothing was pulled.
    pub fn rate(&self, rarity: Rarity) -> f64 {
        if self.total_pulls == 0 {
            0.0
        } else {
            self.count(rarity) as f64 / self.total_pulls as f64
        }
    }

    /// Folds another player's counters into this one. Gaps are per-player
    /// streaks, so only the maximum carries over.
    pub fn merge(&mut self, other: &PullStats) {
        self.total_pulls += other.total_pulls;
        for (mine, theirs) in self.by_rarity.iter_mut().zip(other.by_rarity.iter()) {
            *mine += theirs;
        }
        self.pity_triggers += other.pity_triggers;
        self.new_items += other.new_items;
        self.duplicates += other.duplicates;
        self.featured_hits += other.featured_hits;
        self.max_legendary_gap = self.max_legendary_gap.max(other.max_legendary_gap);
    }
}

/// Ordered pull log with running counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullHistory {
    results: Vec<PullResult>,
    stats: PullStats,
}

impl PullHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: PullResult) {
        self.stats.record(&result);
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = PullResult>) {
        for result in results {
            self.push(result);
        }
    }

    pub fn results(&self) -> &[PullResult] {
        &self.results
    }

    pub fn stats(&self) -> &PullStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Most recent `n` results, oldest first.
    pub fn recent(&self, n: usize) -> &[PullResult] {
        let start = self.results.len().saturating_sub(n);
        &self.results[start..]
    }

    /// Pulls made since the last result of at least `rarity`, or `None` if
    /// there has never been one.
    pub fn pulls_since(&self, rarity: Rarity) -> Option<usize> {
        self.results
            .iter()
            .rev()
            .position(|r| r.rarity >= rarity)
    }
}
