//! Monte Carlo pull simulation.
//!
//! Drives many seeded players through the real engine to compare observed
//! rarity frequencies and dry streaks against a banner's declared rates.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{PlayerRun, SimReport};
pub use runner::run_simulation;
