//! Per-(player, banner) pity counter.
//!
//! The counter is owned and persisted by the caller. The engine reads it by
//! value and hands back the next value; it never stores it.

use crate::core::error::GachaError;
use crate::items::Rarity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    pub banner_id: String,
    pub pulls_since_last_legendary: u32,
}

impl PityState {
    pub fn new(banner_id: impl Into<String>) -> Self {
        Self {
            banner_id: banner_id.into(),
            pulls_since_last_legendary: 0,
        }
    }

    /// Accepts a counter from an untyped source (imported save, mod data).
    /// Values past `u32::MAX` saturate.
    pub fn from_raw(banner_id: impl Into<String>, raw: i64) -> Result<Self, GachaError> {
        if raw < 0 {
            return Err(GachaError::NegativePityCounter(raw));
        }
        let pulls = u32::try_from(raw).unwrap_or(u32::MAX);
        Ok(Self {
            banner_id: banner_id.into(),
            pulls_since_last_legendary: pulls,
        })
    }

    /// The next pull is forced to legendary.
    pub fn is_guaranteed(&self, threshold: u32) -> bool {
        is_pity_pull(self.pulls_since_last_legendary, threshold)
    }

    /// Pulls left before the guarantee, counting the guaranteed pull itself.
    pub fn pulls_until_guaranteed(&self, threshold: u32) -> u32 {
        threshold
            .saturating_sub(self.pulls_since_last_legendary)
            .max(1)
    }

    /// State after a pull of `rarity`.
    pub fn advanced(&self, rarity: Rarity) -> Self {
        Self {
            banner_id: self.banner_id.clone(),
            pulls_since_last_legendary: next_pity_counter(self.pulls_since_last_legendary, rarity),
        }
    }
}

/// `counter + 1 >= threshold`: this pull completes the pity window.
pub fn is_pity_pull(counter: u32, threshold: u32) -> bool {
    counter.saturating_add(1) >= threshold
}

/// Resets on legendary, otherwise counts up.
pub fn next_pity_counter(counter: u32, rarity: Rarity) -> u32 {
    if rarity == Rarity::Legendary {
        0
    } else {
        counter.saturating_add(1)
    }
}
