use crate::banner::ValidationReport;
use crate::items::Rarity;
use thiserror::Error;

/// Errors raised by catalog construction, banner publishing and the pull engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GachaError {
    #[error("rate table sums to {sum}, expected 1.0")]
    InvalidRateTable { sum: f64 },

    #[error("banner '{banner_id}' has no eligible {rarity} items")]
    EmptyTierPool { banner_id: String, rarity: Rarity },

    #[error("banner '{banner_id}' references unknown item '{item_id}'")]
    UnknownItemReference { banner_id: String, item_id: String },

    #[error("pity counter cannot be negative (got {0})")]
    NegativePityCounter(i64),

    #[error("item '{0}' is defined more than once")]
    DuplicateItem(String),

    #[error("banner '{banner_id}' failed validation: {report}")]
    InvalidBanner {
        banner_id: String,
        report: ValidationReport,
    },

    #[error("banner '{banner_id}' version {offered} does not supersede live version {live}")]
    StaleBannerVersion {
        banner_id: String,
        offered: u32,
        live: u32,
    },

    #[error("unknown banner '{0}'")]
    UnknownBanner(String),
}

/// Errors raised while reading or writing player saves and content packs.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error("could not determine a save directory")]
    NoSaveDirectory,
}
