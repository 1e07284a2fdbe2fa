//! Simulation configuration.

use crate::core::constants::{DEFAULT_BATCH_SIZE, SIM_DEFAULT_PLAYERS, SIM_DEFAULT_PULLS_PER_PLAYER};

/// Configuration for a Monte Carlo pull simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent simulated players
    pub num_players: u32,

    /// Pulls each player makes
    pub pulls_per_player: u32,

    /// Pulls per batch; the last batch may be shorter
    pub batch_size: u32,

    /// Random seed for reproducibility (None = random). Player `i` uses `seed + i`.
    pub seed: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per player)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_players: SIM_DEFAULT_PLAYERS,
            pulls_per_player: SIM_DEFAULT_PULLS_PER_PLAYER,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// One player making many single pulls: checks the declared rate table.
    pub fn distribution_check(total_pulls: u32, seed: u64) -> Self {
        Self {
            num_players: 1,
            pulls_per_player: total_pulls,
            batch_size: 1,
            seed: Some(seed),
            verbosity: 0,
        }
    }

    /// Many players pulling past the pity threshold: checks the guarantee.
    pub fn pity_check(pity_threshold: u32, seed: u64) -> Self {
        Self {
            num_players: 200,
            pulls_per_player: pity_threshold.saturating_mul(3),
            seed: Some(seed),
            verbosity: 0,
            ..Default::default()
        }
    }

    pub fn total_pulls(&self) -> u64 {
        self.num_players as u64 * self.pulls_per_player as u64
    }
}
