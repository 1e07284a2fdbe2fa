// Probability tables
pub const RATE_SUM_EPSILON: f64 = 1e-6;
pub const RARITY_COUNT: usize = 5;

// Standard banner rates (common, uncommon, rare, epic, legendary)
pub const STANDARD_COMMON_RATE: f64 = 0.60;
pub const STANDARD_UNCOMMON_RATE: f64 = 0.25;
pub const STANDARD_RARE_RATE: f64 = 0.10;
pub const STANDARD_EPIC_RATE: f64 = 0.04;
pub const STANDARD_LEGENDARY_RATE: f64 = 0.01;

// Pity and batching
pub const DEFAULT_PITY_THRESHOLD: u32 = 90;
pub const DEFAULT_BATCH_SIZE: u32 = 10;
pub const DEFAULT_COST_PER_PULL: u64 = 160;

// Player save file
pub const SAVE_VERSION_MAGIC: u64 = 0x4741_4348_4153_0001;
pub const SAVE_FILE_NAME: &str = "gacha.dat";
pub const SAVE_DIR_APPLICATION: &str = "gacha";

// Simulation defaults
pub const SIM_DEFAULT_PLAYERS: u32 = 1000;
pub const SIM_DEFAULT_PULLS_PER_PLAYER: u32 = 200;
