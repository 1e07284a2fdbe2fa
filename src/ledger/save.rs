use super::state::PlayerGachaState;
use crate::core::constants::{SAVE_DIR_APPLICATION, SAVE_FILE_NAME, SAVE_VERSION_MAGIC};
use crate::core::error::SaveError;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Reads and writes one player's gacha state in a checksummed binary file.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Save file for `player_id` under the platform config directory.
    ///
    /// The file name is derived from a hash of the id so arbitrary player ids
    /// map to safe, distinct paths.
    pub fn new(player_id: &str) -> Result<Self, SaveError> {
        let project_dirs =
            ProjectDirs::from("", "", SAVE_DIR_APPLICATION).ok_or(SaveError::NoSaveDirectory)?;
        let dir = project_dirs.config_dir().join("players");
        fs::create_dir_all(&dir)?;
        Ok(Self {
            save_path: dir.join(player_file_name(player_id)),
        })
    }

    /// Uses an explicit file path; parent directories are created on save.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - bincode-encoded state (variable length)
    /// - SHA256 over the three fields above (32 bytes)
    pub fn save(&self, state: &PlayerGachaState) -> Result<(), SaveError> {
        let data = bincode::serialize(state)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        if let Some(parent) = self.save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        tracing::debug!(path = %self.save_path.display(), bytes = data.len(), "gacha state saved");
        Ok(())
    }

    /// Loads and verifies a save. Any version or checksum mismatch is an
    /// error; a corrupted file never yields a partially-read state.
    pub fn load(&self) -> Result<PlayerGachaState, SaveError> {
        let mut file = fs::File::open(&self.save_path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        // Header, payload and checksum must account for the whole file.
        let expected_len = 8 + 4 + u64::from(data_len) + 32;
        if file.metadata()?.len() != expected_len {
            return Err(SaveError::ChecksumMismatch);
        }

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(SaveError::ChecksumMismatch);
        }

        Ok(bincode::deserialize(&data)?)
    }

    /// Loads the save, or a fresh state when no file exists yet.
    pub fn load_or_new(&self, player_id: &str) -> Result<PlayerGachaState, SaveError> {
        if self.save_exists() {
            self.load()
        } else {
            Ok(PlayerGachaState::new(player_id))
        }
    }
}

fn player_file_name(player_id: &str) -> String {
    let digest = Sha256::digest(player_id.as_bytes());
    let prefix: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}-{SAVE_FILE_NAME}")
}
