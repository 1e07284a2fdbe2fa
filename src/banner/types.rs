use crate::core::constants::{
    DEFAULT_COST_PER_PULL, DEFAULT_PITY_THRESHOLD, RATE_SUM_EPSILON, STANDARD_COMMON_RATE,
    STANDARD_EPIC_RATE, STANDARD_LEGENDARY_RATE, STANDARD_RARE_RATE, STANDARD_UNCOMMON_RATE,
};
use crate::core::error::GachaError;
use crate::items::{ItemId, Rarity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Probability of each rarity tier for a single non-pity pull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl RateTable {
    pub fn new(common: f64, uncommon: f64, rare: f64, epic: f64, legendary: f64) -> Self {
        Self {
            common,
            uncommon,
            rare,
            epic,
            legendary,
        }
    }

    /// 60 / 25 / 10 / 4 / 1 percent.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_COMMON_RATE,
            STANDARD_UNCOMMON_RATE,
            STANDARD_RARE_RATE,
            STANDARD_EPIC_RATE,
            STANDARD_LEGENDARY_RATE,
        )
    }

    /// Builds a table from `(rarity, rate)` pairs; tiers not listed get 0.
    /// A tier listed twice keeps its last rate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Rarity, f64)>) -> Self {
        let mut table = Self::new(0.0, 0.0, 0.0, 0.0, 0.0);
        for (rarity, rate) in pairs {
            *table.slot_mut(rarity) = rate;
        }
        table
    }

    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }

    fn slot_mut(&mut self, rarity: Rarity) -> &mut f64 {
        match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Rare => &mut self.rare,
            Rarity::Epic => &mut self.epic,
            Rarity::Legendary => &mut self.legendary,
        }
    }

    /// Sum in draw order, matching the accumulation the engine performs.
    pub fn sum(&self) -> f64 {
        Rarity::DRAW_ORDER.iter().map(|r| self.get(*r)).sum()
    }

    /// Every rate is finite, inside [0, 1], and the total is 1 within epsilon.
    pub fn is_valid(&self) -> bool {
        Rarity::ALL
            .iter()
            .all(|r| self.get(*r).is_finite() && (0.0..=1.0).contains(&self.get(*r)))
            && (self.sum() - 1.0).abs() <= RATE_SUM_EPSILON
    }

    pub fn validated(self) -> Result<Self, GachaError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GachaError::InvalidRateTable { sum: self.sum() })
        }
    }

    /// Tiers with a positive rate.
    pub fn positive_tiers(&self) -> impl Iterator<Item = Rarity> + '_ {
        Rarity::ALL.into_iter().filter(move |r| self.get(*r) > 0.0)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Half-open interval `[starts_at, ends_at)` during which a banner is offered.
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityWindow {
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl ActivityWindow {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn between(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.starts_at.map_or(true, |start| now >= start)
            && self.ends_at.map_or(true, |end| now < end)
    }

    /// True when both bounds are set and the window is empty.
    pub fn is_inverted(&self) -> bool {
        matches!((self.starts_at, self.ends_at), (Some(start), Some(end)) if end <= start)
    }
}

fn default_version() -> u32 {
    1
}

fn default_pity_threshold() -> u32 {
    DEFAULT_PITY_THRESHOLD
}

fn default_cost_per_pull() -> u64 {
    DEFAULT_COST_PER_PULL
}

/// An offering: rates, eligible items, rate-up and pity configuration.
///
/// Banners are treated as immutable once published; a balance change is a
/// new banner value with a higher `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub rate_table: RateTable,
    pub item_pool: Vec<ItemId>,
    #[serde(default)]
    pub featured_item_ids: BTreeSet<ItemId>,
    /// Fraction of a tier's mass reserved for its featured items.
    #[serde(default)]
    pub featured_rate_up_share: f64,
    #[serde(default = "default_pity_threshold")]
    pub pity_threshold: u32,
    #[serde(default = "default_cost_per_pull")]
    pub cost_per_pull: u64,
    #[serde(default)]
    pub window: ActivityWindow,
}

impl Banner {
    pub fn new(id: impl Into<String>, rate_table: RateTable, item_pool: Vec<ItemId>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            version: 1,
            rate_table,
            item_pool,
            featured_item_ids: BTreeSet::new(),
            featured_rate_up_share: 0.0,
            pity_threshold: DEFAULT_PITY_THRESHOLD,
            cost_per_pull: DEFAULT_COST_PER_PULL,
            window: ActivityWindow::always(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_featured<I, S>(mut self, ids: I, share: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        self.featured_item_ids = ids.into_iter().map(Into::into).collect();
        self.featured_rate_up_share = share;
        self
    }

    pub fn with_pity_threshold(mut self, threshold: u32) -> Self {
        self.pity_threshold = threshold;
        self
    }

    pub fn with_cost(mut self, cost_per_pull: u64) -> Self {
        self.cost_per_pull = cost_per_pull;
        self
    }

    pub fn with_window(mut self, window: ActivityWindow) -> Self {
        self.window = window;
        self
    }

    pub fn is_featured(&self, item_id: &str) -> bool {
        self.featured_item_ids.contains(item_id)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.window.contains(now)
    }
}
