//! Test Store Manager
//!
//! Provides isolated state files for testing:
//! - Temporary data directories that are automatically cleaned up
//! - Trainers opened against that directory
//! - Raw file access for corruption and migration scenarios
//! - Snapshots and restoration

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cubememo_core::storage::STATE_FILE;
use cubememo_core::{Storage, Trainer, TrainerConfig};
use tempfile::TempDir;

/// Manager for test state directories
///
/// Each manager owns its own temporary directory, so trainers opened by
/// different tests never share a state file.
///
/// # Example
///
/// ```rust,ignore
/// let store = TestStoreManager::new_temp();
/// let mut trainer = store.open(now);
/// trainer.set_word("AB", "apple", now)?;
///
/// // reopening sees the saved state
/// let trainer = store.open(now);
/// ```
pub struct TestStoreManager {
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    dir: PathBuf,
    snapshot: Option<String>,
}

impl TestStoreManager {
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("cubememo");
        Self {
            _temp_dir: temp_dir,
            dir,
            snapshot: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    /// Default configuration pointed at this directory
    pub fn config(&self) -> TrainerConfig {
        TrainerConfig {
            data_dir: Some(self.dir.clone()),
            ..TrainerConfig::default()
        }
    }

    pub fn open(&self, now: DateTime<Utc>) -> Trainer {
        self.open_with(self.config(), now)
    }

    /// Open with a custom configuration; the data directory is always this one
    pub fn open_with(&self, config: TrainerConfig, now: DateTime<Utc>) -> Trainer {
        let config = TrainerConfig {
            data_dir: Some(self.dir.clone()),
            ..config
        };
        Trainer::open(config, now).expect("Failed to open trainer")
    }

    pub fn storage(&self) -> Storage {
        Storage::open(Some(self.dir.clone())).expect("Failed to open storage")
    }

    pub fn exists(&self) -> bool {
        self.state_file().exists()
    }

    pub fn read_raw(&self) -> Option<String> {
        std::fs::read_to_string(self.state_file()).ok()
    }

    pub fn write_raw(&self, contents: &str) {
        std::fs::create_dir_all(&self.dir).expect("Failed to create data directory");
        std::fs::write(self.state_file(), contents).expect("Failed to write state file");
    }

    /// Remember the current state file
    pub fn take_snapshot(&mut self) {
        self.snapshot = self.read_raw();
    }

    /// Put the snapshot back. Returns false if there was none.
    pub fn restore_snapshot(&mut self) -> bool {
        match self.snapshot.clone() {
            Some(contents) => {
                self.write_raw(&contents);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        let _ = std::fs::remove_file(self.state_file());
    }
}
