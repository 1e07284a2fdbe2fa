//! Gacha - reward draw engine.
//!
//! Turns a banner, a player's pity counter, their owned items and an injected
//! random source into reward draws. The engine itself is pure: callers own
//! and persist the pity counter and ownership set, and supply the generator
//! so seeded runs replay bit-for-bit.
//!
//! ```
//! use gacha::content::{load, standard_pack};
//! use gacha::engine::PullEngine;
//! use gacha::ledger::PlayerGachaState;
//! use gacha::rng::seeded;
//!
//! let content = load(standard_pack()).unwrap();
//! let banner = content.registry.get("standard").unwrap();
//! let engine = PullEngine::new(&banner, &content.catalog).unwrap();
//!
//! let mut player = PlayerGachaState::new("player-1");
//! let batch = player.pull(&engine, 10, &mut seeded(42), chrono::Utc::now()).unwrap();
//! assert_eq!(batch.results.len(), 10);
//! ```

pub mod banner;
pub mod content;
pub mod core;
pub mod engine;
pub mod history;
pub mod items;
pub mod ledger;
pub mod pity;
pub mod rng;
pub mod simulator;

pub use crate::banner::{Banner, BannerRegistry, RateTable};
pub use crate::core::error::{GachaError, SaveError};
pub use crate::engine::{draw_batch, draw_one, BatchOutcome, PullEngine, PullOutcome, PullResult};
pub use crate::items::{Catalog, GachaItem, ItemId, Rarity};
pub use crate::pity::PityState;
pub use crate::rng::RngProvider;
