use crate::items::{ItemId, Rarity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One drawn reward. History accumulation is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullResult {
    pub item_id: ItemId,
    pub rarity: Rarity,
    pub is_new: bool,
    pub is_duplicate: bool,
    pub pity_triggered: bool,
    /// The item came from the banner's featured subset.
    #[serde(default)]
    pub is_featured: bool,
    pub timestamp: DateTime<Utc>,
}

/// Result of a single pull plus the counter the caller must persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullOutcome {
    pub result: PullResult,
    pub next_pity_counter: u32,
}

/// Ordered results of a batch with the state threaded through it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub results: Vec<PullResult>,
    pub pity_counter: u32,
    pub owned: BTreeSet<ItemId>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn new_items(&self) -> impl Iterator<Item = &PullResult> {
        self.results.iter().filter(|r| r.is_new)
    }

    pub fn duplicates(&self) -> impl Iterator<Item = &PullResult> {
        self.results.iter().filter(|r| r.is_duplicate)
    }

    /// Highest rarity in the batch, if any pulls were made.
    pub fn best_rarity(&self) -> Option<Rarity> {
        self.results.iter().map(|r| r.rarity).max()
    }
}
