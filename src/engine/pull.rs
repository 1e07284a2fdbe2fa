//! Single-pull algorithm.
//!
//! Random values are consumed in a fixed order per pull:
//! 1. one `random()` for the rarity, skipped when pity forces legendary
//! 2. one `random()` for featured-vs-regular, only when the banner has a
//!    positive rate-up share and the drawn tier contains featured items
//! 3. one `pick` for the item within the chosen subset
//!
//! Replaying the same seeded stream therefore reproduces the same pulls.

use super::types::{BatchOutcome, PullOutcome, PullResult};
use crate::banner::{Banner, RateTable};
use crate::core::constants::RARITY_COUNT;
use crate::core::error::GachaError;
use crate::items::{Catalog, GachaItem, ItemId, Rarity};
use crate::pity::{is_pity_pull, next_pity_counter};
use crate::rng::RngProvider;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

/// Pool items of one rarity, split by featured status. Pool order is kept so
/// a given roll always maps to the same item.
#[derive(Debug, Default)]
struct Tier<'a> {
    all: Vec<&'a GachaItem>,
    featured: Vec<&'a GachaItem>,
    regular: Vec<&'a GachaItem>,
}

/// A banner resolved against its catalog, ready to draw.
#[derive(Debug)]
pub struct PullEngine<'a> {
    banner: &'a Banner,
    tiers: [Tier<'a>; RARITY_COUNT],
}

impl<'a> PullEngine<'a> {
    /// Resolves every pool id against the catalog. Fails with
    /// `UnknownItemReference` for a missing id and `InvalidRateTable` for a
    /// table that does not sum to one. Repeated pool entries count once.
    pub fn new(banner: &'a Banner, catalog: &'a Catalog) -> Result<Self, GachaError> {
        banner.rate_table.validated()?;

        let mut tiers: [Tier<'a>; RARITY_COUNT] = Default::default();
        let mut seen = HashSet::new();
        for item_id in &banner.item_pool {
            if !seen.insert(item_id.as_str()) {
                continue;
            }
            let item = catalog
                .get(item_id)
                .ok_or_else(|| GachaError::UnknownItemReference {
                    banner_id: banner.id.clone(),
                    item_id: item_id.clone(),
                })?;
            let tier = &mut tiers[item.rarity.index()];
            tier.all.push(item);
            if banner.is_featured(item_id) {
                tier.featured.push(item);
            } else {
                tier.regular.push(item);
            }
        }

        Ok(Self { banner, tiers })
    }

    pub fn banner(&self) -> &Banner {
        self.banner
    }

    /// Number of resolved pool items of `rarity`.
    pub fn tier_size(&self, rarity: Rarity) -> usize {
        self.tiers[rarity.index()].all.len()
    }

    /// Draws one item. On error nothing has been decided and the caller's
    /// pity and ownership state must stay as they were.
    pub fn draw_one<R: RngProvider + ?Sized>(
        &self,
        pity_counter: u32,
        owned: &BTreeSet<ItemId>,
        rng: &mut R,
        at: DateTime<Utc>,
    ) -> Result<PullOutcome, GachaError> {
        let pity_triggered = is_pity_pull(pity_counter, self.banner.pity_threshold);
        let rarity = if pity_triggered {
            Rarity::Legendary
        } else {
            roll_rarity(&self.banner.rate_table, rng.random())
        };

        let (item, is_featured) = self.pick_item(rarity, rng)?;
        let is_new = !owned.contains(&item.id);
        let next_pity_counter = next_pity_counter(pity_counter, rarity);

        tracing::debug!(
            banner = %self.banner.id,
            item = %item.id,
            %rarity,
            pity_triggered,
            is_featured,
            next_pity_counter,
            "pull"
        );

        Ok(PullOutcome {
            result: PullResult {
                item_id: item.id.clone(),
                rarity,
                is_new,
                is_duplicate: !is_new,
                pity_triggered,
                is_featured,
                timestamp: at,
            },
            next_pity_counter,
        })
    }

    /// `count` sequential pulls with pity and ownership threaded between
    /// them, so a second copy inside the same batch is a duplicate. The batch
    /// is all-or-nothing: an error discards every pull made so far.
    pub fn draw_batch<R: RngProvider + ?Sized>(
        &self,
        pity_counter: u32,
        owned: &BTreeSet<ItemId>,
        count: u32,
        rng: &mut R,
        at: DateTime<Utc>,
    ) -> Result<BatchOutcome, GachaError> {
        let mut batch = BatchOutcome {
            results: Vec::with_capacity(count as usize),
            pity_counter,
            owned: owned.clone(),
        };
        for _ in 0..count {
            let outcome = self.draw_one(batch.pity_counter, &batch.owned, rng, at)?;
            batch.pity_counter = outcome.next_pity_counter;
            batch.owned.insert(outcome.result.item_id.clone());
            batch.results.push(outcome.result);
        }
        Ok(batch)
    }

    fn pick_item<R: RngProvider + ?Sized>(
        &self,
        rarity: Rarity,
        rng: &mut R,
    ) -> Result<(&'a GachaItem, bool), GachaError> {
        let tier = &self.tiers[rarity.index()];
        let empty = || GachaError::EmptyTierPool {
            banner_id: self.banner.id.clone(),
            rarity,
        };
        if tier.all.is_empty() {
            return Err(empty());
        }

        let share = self.banner.featured_rate_up_share;
        if share > 0.0 && !tier.featured.is_empty() {
            let roll = rng.random();
            let from_featured = tier.regular.is_empty() || roll < share;
            let subset = if from_featured {
                &tier.featured
            } else {
                &tier.regular
            };
            let item = rng.pick(subset).copied().ok_or_else(empty)?;
            return Ok((item, from_featured));
        }

        let item = rng.pick(&tier.all).copied().ok_or_else(empty)?;
        Ok((item, self.banner.is_featured(&item.id)))
    }
}

/// Maps a uniform roll to a rarity by walking tiers highest first and taking
/// the first whose cumulative rate exceeds `roll`. A roll that lands in the
/// rounding gap below 1.0 goes to the last tier with positive mass.
pub fn roll_rarity(table: &RateTable, roll: f64) -> Rarity {
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for rarity in Rarity::DRAW_ORDER {
        let rate = table.get(rarity);
        if rate <= 0.0 {
            continue;
        }
        cumulative += rate;
        last_positive = Some(rarity);
        if roll < cumulative {
            return rarity;
        }
    }
    last_positive.unwrap_or(Rarity::Common)
}

/// One pull against `banner`. Builds a [`PullEngine`] per call; hold an
/// engine instead when drawing repeatedly.
pub fn draw_one<R: RngProvider + ?Sized>(
    banner: &Banner,
    catalog: &Catalog,
    pity_counter: u32,
    owned: &BTreeSet<ItemId>,
    rng: &mut R,
    at: DateTime<Utc>,
) -> Result<PullOutcome, GachaError> {
    PullEngine::new(banner, catalog)?.draw_one(pity_counter, owned, rng, at)
}

/// `count` pulls against `banner`, threading pity and ownership.
pub fn draw_batch<R: RngProvider + ?Sized>(
    banner: &Banner,
    catalog: &Catalog,
    pity_counter: u32,
    owned: &BTreeSet<ItemId>,
    count: u32,
    rng: &mut R,
    at: DateTime<Utc>,
) -> Result<BatchOutcome, GachaError> {
    PullEngine::new(banner, catalog)?.draw_batch(pity_counter, owned, count, rng, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{seeded, ScriptedRng};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            GachaItem::new("c1", Rarity::Common, "C1", "staff"),
            GachaItem::new("c2", Rarity::Common, "C2", "staff"),
            GachaItem::new("u1", Rarity::Uncommon, "U1", "staff"),
            GachaItem::new("r1", Rarity::Rare, "R1", "staff"),
            GachaItem::new("e1", Rarity::Epic, "E1", "staff"),
            GachaItem::new("l1", Rarity::Legendary, "L1", "staff"),
            GachaItem::new("l2", Rarity::Legendary, "L2", "staff"),
            GachaItem::new("l3", Rarity::Legendary, "L3", "staff"),
        ])
        .unwrap()
    }

    fn banner() -> Banner {
        Banner::new(
            "test",
            RateTable::standard(),
            ["c1", "c2", "u1", "r1", "e1", "l1", "l2", "l3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_roll_rarity_walks_highest_first() {
        let table = RateTable::standard();
        // cumulative: legendary .01, epic .05, rare .15, uncommon .40, common 1.0
        assert_eq!(roll_rarity(&table, 0.0), Rarity::Legendary);
        assert_eq!(roll_rarity(&table, 0.009), Rarity::Legendary);
        assert_eq!(roll_rarity(&table, 0.01), Rarity::Epic);
        assert_eq!(roll_rarity(&table, 0.049), Rarity::Epic);
        assert_eq!(roll_rarity(&table, 0.10), Rarity::Rare);
        assert_eq!(roll_rarity(&table, 0.30), Rarity::Uncommon);
        assert_eq!(roll_rarity(&table, 0.5), Rarity::Common);
        assert_eq!(roll_rarity(&table, 0.999_999), Rarity::Common);
    }

    #[test]
    fn test_roll_rarity_rounding_gap_goes_to_last_positive_tier() {
        // Sums to 1 - 5e-7, inside tolerance.
        let table = RateTable::from_pairs([(Rarity::Rare, 0.5), (Rarity::Legendary, 0.499_999_5)]);
        assert!(table.is_valid());
        assert_eq!(roll_rarity(&table, 0.999_999_9), Rarity::Rare);
    }

    #[test]
    fn test_roll_rarity_ignores_construction_order() {
        let a = RateTable::from_pairs([(Rarity::Common, 0.7), (Rarity::Legendary, 0.3)]);
        let b = RateTable::from_pairs([(Rarity::Legendary, 0.3), (Rarity::Common, 0.7)]);
        for i in 0..100 {
            let roll = i as f64 / 100.0;
            assert_eq!(roll_rarity(&a, roll), roll_rarity(&b, roll));
        }
    }

    #[test]
    fn test_new_rejects_unknown_pool_item() {
        let mut banner = banner();
        banner.item_pool.push("ghost".to_string());
        let err = PullEngine::new(&banner, &catalog()).unwrap_err();
        assert_eq!(
            err,
            GachaError::UnknownItemReference {
                banner_id: "test".to_string(),
                item_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_new_rejects_bad_rate_table() {
        let mut banner = banner();
        banner.rate_table.common = 0.5;
        let catalog = catalog();
        assert!(matches!(
            PullEngine::new(&banner, &catalog),
            Err(GachaError::InvalidRateTable { .. })
        ));
    }

    #[test]
    fn test_duplicate_pool_entries_count_once() {
        let mut banner = banner();
        banner.item_pool.push("c1".to_string());
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        assert_eq!(engine.tier_size(Rarity::Common), 2);
    }

    #[test]
    fn test_pity_pull_consumes_no_rarity_roll() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        // Only the item pick is consumed; 0.99 picks the last legendary.
        let mut rng = ScriptedRng::new([0.99]);
        let outcome = engine
            .draw_one(89, &BTreeSet::new(), &mut rng, at())
            .unwrap();
        assert_eq!(rng.consumed(), 1);
        assert_eq!(outcome.result.rarity, Rarity::Legendary);
        assert_eq!(outcome.result.item_id, "l3");
        assert!(outcome.result.pity_triggered);
        assert_eq!(outcome.next_pity_counter, 0);
    }

    #[test]
    fn test_normal_pull_consumes_rarity_then_item() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let mut rng = ScriptedRng::new([0.5, 0.75]);
        let outcome = engine.draw_one(3, &BTreeSet::new(), &mut rng, at()).unwrap();
        assert_eq!(rng.consumed(), 2);
        assert_eq!(outcome.result.rarity, Rarity::Common);
        assert_eq!(outcome.result.item_id, "c2");
        assert!(!outcome.result.pity_triggered);
        assert_eq!(outcome.next_pity_counter, 4);
        assert_eq!(outcome.result.timestamp, at());
    }

    #[test]
    fn test_featured_roll_consumed_only_when_tier_has_featured() {
        let banner = banner().with_featured(["l1"], 0.5);
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();

        // Common tier has no featured items: rarity + pick only.
        let mut rng = ScriptedRng::new([0.5, 0.0]);
        engine.draw_one(0, &BTreeSet::new(), &mut rng, at()).unwrap();
        assert_eq!(rng.consumed(), 2);

        // Legendary tier: rarity + featured roll + pick.
        let mut rng = ScriptedRng::new([0.0, 0.4, 0.0]);
        let outcome = engine.draw_one(0, &BTreeSet::new(), &mut rng, at()).unwrap();
        assert_eq!(rng.consumed(), 3);
        assert_eq!(outcome.result.item_id, "l1");
        assert!(outcome.result.is_featured);

        // Featured roll above the share falls to the regular subset.
        let mut rng = ScriptedRng::new([0.0, 0.6, 0.0]);
        let outcome = engine.draw_one(0, &BTreeSet::new(), &mut rng, at()).unwrap();
        assert_eq!(outcome.result.item_id, "l2");
        assert!(!outcome.result.is_featured);
    }

    #[test]
    fn test_all_featured_tier_always_picks_featured() {
        let banner = banner().with_featured(["e1"], 0.1);
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        // roll .02 -> epic; featured roll .9 would go regular, but there is none
        let mut rng = ScriptedRng::new([0.02, 0.9, 0.0]);
        let outcome = engine.draw_one(0, &BTreeSet::new(), &mut rng, at()).unwrap();
        assert_eq!(outcome.result.item_id, "e1");
        assert!(outcome.result.is_featured);
    }

    #[test]
    fn test_empty_tier_fails_without_substituting() {
        let banner = Banner::new(
            "gap",
            RateTable::from_pairs([(Rarity::Common, 0.5), (Rarity::Epic, 0.5)]),
            vec!["c1".into()],
        );
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let mut rng = ScriptedRng::new([0.1]);
        let err = engine.draw_one(0, &BTreeSet::new(), &mut rng, at()).unwrap_err();
        assert_eq!(
            err,
            GachaError::EmptyTierPool {
                banner_id: "gap".to_string(),
                rarity: Rarity::Epic
            }
        );
    }

    #[test]
    fn test_duplicate_classification() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let owned: BTreeSet<ItemId> = ["c1".to_string()].into_iter().collect();

        let mut rng = ScriptedRng::new([0.5, 0.0]);
        let dup = engine.draw_one(0, &owned, &mut rng, at()).unwrap().result;
        assert_eq!(dup.item_id, "c1");
        assert!(dup.is_duplicate && !dup.is_new);

        let mut rng = ScriptedRng::new([0.5, 0.9]);
        let fresh = engine.draw_one(0, &owned, &mut rng, at()).unwrap().result;
        assert_eq!(fresh.item_id, "c2");
        assert!(fresh.is_new && !fresh.is_duplicate);
    }

    #[test]
    fn test_batch_marks_repeat_within_batch_as_duplicate() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let mut rng = ScriptedRng::new([0.5, 0.0]);
        let batch = engine
            .draw_batch(0, &BTreeSet::new(), 3, &mut rng, at())
            .unwrap();
        let flags: Vec<bool> = batch.results.iter().map(|r| r.is_new).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert_eq!(batch.pity_counter, 3);
        assert_eq!(batch.owned.len(), 1);
    }

    #[test]
    fn test_batch_of_zero_returns_inputs() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let owned: BTreeSet<ItemId> = ["r1".to_string()].into_iter().collect();
        let batch = engine.draw_batch(17, &owned, 0, &mut seeded(1), at()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.pity_counter, 17);
        assert_eq!(batch.owned, owned);
        assert_eq!(batch.best_rarity(), None);
    }

    #[test]
    fn test_free_functions_match_engine() {
        let banner = banner();
        let catalog = catalog();
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let owned = BTreeSet::new();

        let via_engine = engine.draw_batch(0, &owned, 20, &mut seeded(8), at()).unwrap();
        let via_fn = draw_batch(&banner, &catalog, 0, &owned, 20, &mut seeded(8), at()).unwrap();
        assert_eq!(via_engine, via_fn);

        let one = draw_one(&banner, &catalog, 0, &owned, &mut seeded(8), at()).unwrap();
        assert_eq!(one.result, via_engine.results[0]);
    }
}
