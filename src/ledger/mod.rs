//! Per-player persisted state: pity counters, owned items and the save file.

pub mod save;
pub mod state;

pub use save::*;
pub use state::*;
