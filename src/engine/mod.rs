//! The pull engine: pure draw functions over explicit inputs.
//!
//! No I/O and no shared state. Callers that let two requests touch the same
//! (player, banner) pity counter must serialize "read counter, draw, persist"
//! themselves; see `ledger::PlayerGachaState::pull` for the in-memory form.

pub mod pull;
pub mod types;

pub use pull::*;
pub use types::*;
