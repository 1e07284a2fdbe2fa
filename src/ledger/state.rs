use crate::core::error::GachaError;
use crate::engine::{BatchOutcome, PullEngine};
use crate::items::ItemId;
use crate::pity::PityState;
use crate::rng::RngProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything the engine needs persisted for one player: a pity counter per
/// banner and the set of owned item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGachaState {
    pub player_id: String,
    pub pity: BTreeMap<String, PityState>,
    pub owned: BTreeSet<ItemId>,
}

impl PlayerGachaState {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Self::default()
        }
    }

    /// Current counter for a banner; zero if the player never pulled on it.
    pub fn pity_for(&self, banner_id: &str) -> u32 {
        self.pity
            .get(banner_id)
            .map_or(0, |p| p.pulls_since_last_legendary)
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.owned.contains(item_id)
    }

    /// Runs a batch and commits the new pity counter and ownership only when
    /// every pull succeeded. `&mut self` makes read-draw-persist a single
    /// step for this value; callers sharing a player across threads still
    /// need their own lock around it.
    pub fn pull<R: RngProvider + ?Sized>(
        &mut self,
        engine: &PullEngine<'_>,
        count: u32,
        rng: &mut R,
        at: DateTime<Utc>,
    ) -> Result<BatchOutcome, GachaError> {
        let banner_id = engine.banner().id.as_str();
        let batch = engine.draw_batch(self.pity_for(banner_id), &self.owned, count, rng, at)?;

        self.pity
            .entry(banner_id.to_string())
            .or_insert_with(|| PityState::new(banner_id))
            .pulls_since_last_legendary = batch.pity_counter;
        self.owned.clone_from(&batch.owned);
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::{Banner, RateTable};
    use crate::items::{Catalog, GachaItem, Rarity};
    use crate::rng::{seeded, ScriptedRng};

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            GachaItem::new("c", Rarity::Common, "C", "staff"),
            GachaItem::new("l", Rarity::Legendary, "L", "staff"),
        ])
        .unwrap()
    }

    #[test]
    fn test_pull_commits_pity_and_ownership() {
        let catalog = catalog();
        let banner = Banner::new(
            "b",
            RateTable::from_pairs([(Rarity::Common, 0.9), (Rarity::Legendary, 0.1)]),
            vec!["c".into(), "l".into()],
        )
        .with_pity_threshold(1000);
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let mut player = PlayerGachaState::new("p1");

        // 0.5 -> common, then the item pick; three commons in a row
        let mut rng = ScriptedRng::new([0.5]);
        let batch = player.pull(&engine, 3, &mut rng, Utc::now()).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(player.pity_for("b"), 3);
        assert!(player.owns("c"));
        assert!(!player.owns("l"));
        assert!(batch.results[0].is_new);
        assert!(batch.results[1].is_duplicate);
    }

    #[test]
    fn test_failed_pull_leaves_state_untouched() {
        let catalog = catalog();
        // Epic has mass but no items: the roll below lands in it.
        let banner = Banner::new(
            "b",
            RateTable::from_pairs([
                (Rarity::Common, 0.5),
                (Rarity::Epic, 0.4),
                (Rarity::Legendary, 0.1),
            ]),
            vec!["c".into(), "l".into()],
        );
        let engine = PullEngine::new(&banner, &catalog).unwrap();
        let mut player = PlayerGachaState::new("p1");
        player.owned.insert("c".to_string());
        player.pity.insert("b".to_string(), PityState::new("b").advanced(Rarity::Common));
        let before = player.clone();

        // first pull: 0.95 -> common (ok), pick; second pull: 0.2 -> epic (empty)
        let mut rng = ScriptedRng::new([0.95, 0.0, 0.2]);
        let err = player.pull(&engine, 2, &mut rng, Utc::now()).unwrap_err();
        assert!(matches!(err, GachaError::EmptyTierPool { rarity: Rarity::Epic, .. }));
        assert_eq!(player, before);
    }

    #[test]
    fn test_pity_tracked_per_banner() {
        let catalog = catalog();
        let rates = RateTable::from_pairs([(Rarity::Common, 0.99), (Rarity::Legendary, 0.01)]);
        let a = Banner::new("a", rates, vec!["c".into(), "l".into()]);
        let b = Banner::new("b", rates, vec!["c".into(), "l".into()]);
        let engine_a = PullEngine::new(&a, &catalog).unwrap();
        let engine_b = PullEngine::new(&b, &catalog).unwrap();

        let mut player = PlayerGachaState::new("p1");
        let mut rng = seeded(5);
        let batch_a = player.pull(&engine_a, 5, &mut rng, Utc::now()).unwrap();
        assert_eq!(player.pity_for("a"), batch_a.pity_counter);
        assert_eq!(player.pity_for("b"), 0);
        player.pull(&engine_b, 1, &mut rng, Utc::now()).unwrap();
        assert!(player.pity.contains_key("b"));
    }
}
