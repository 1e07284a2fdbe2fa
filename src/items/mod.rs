//! Item catalog: rarity tiers, catalog entries and the id lookup table.

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
