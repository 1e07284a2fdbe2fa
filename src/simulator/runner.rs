//! Runs seeded players through the real pull engine.

use super::config::SimConfig;
use super::report::{PlayerRun, SimReport};
use crate::core::error::GachaError;
use crate::engine::PullEngine;
use crate::history::PullStats;
use crate::items::Rarity;
use crate::ledger::PlayerGachaState;
use crate::rng::{from_entropy, seeded};
use chrono::Utc;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, engine: &PullEngine<'_>) -> Result<SimReport, GachaError> {
    let banner = engine.banner();
    let at = Utc::now();
    let batch_size = config.batch_size.max(1);
    let mut runs = Vec::with_capacity(config.num_players as usize);

    for player_index in 0..config.num_players {
        let mut rng = match config.seed {
            Some(seed) => seeded(seed.wrapping_add(player_index as u64)),
            None => from_entropy(),
        };

        let mut player = PlayerGachaState::new(format!("sim-{player_index}"));
        let mut stats = PullStats::default();
        let mut remaining = config.pulls_per_player;
        while remaining > 0 {
            let count = remaining.min(batch_size);
            let batch = player.pull(engine, count, &mut rng, at)?;
            for result in &batch.results {
                stats.record(result);
            }
            remaining -= count;
        }

        let run = PlayerRun {
            player_index,
            final_pity: player.pity_for(&banner.id),
            distinct_items: player.owned.len(),
            stats,
        };
        if config.verbosity >= 2 {
            tracing::info!(
                player = player_index,
                legendaries = run.stats.legendary_hits(),
                pity_triggers = run.stats.pity_triggers,
                distinct = run.distinct_items,
                "player finished"
            );
        }
        runs.push(run);
    }

    let pool_size = Rarity::ALL.iter().map(|r| engine.tier_size(*r)).sum();
    let report = SimReport::from_runs(
        &banner.id,
        banner.rate_table,
        banner.pity_threshold,
        pool_size,
        runs,
    );
    if config.verbosity >= 1 {
        tracing::info!(
            banner = %report.banner_id,
            players = report.num_players,
            pulls = report.totals.total_pulls,
            legendaries = report.totals.legendary_hits(),
            "simulation finished"
        );
    }
    Ok(report)
}
