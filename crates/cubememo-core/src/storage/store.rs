//! JSON state persistence

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::timestamp;
use crate::encoding::EncodingTable;
use crate::fsrs::FSRSCard;
use crate::session::DailySession;
use crate::words::MemoryWordDict;

/// Envelope format version
pub const STATE_VERSION: &str = "1.0.0";

/// File name inside the data directory
pub const STATE_FILE: &str = "cubememo.json";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// STATE
// ============================================================================

/// Everything that survives between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerState {
    pub encoding: EncodingTable,
    #[serde(default)]
    pub memory_words: MemoryWordDict,
    #[serde(default)]
    pub cards: Vec<FSRSCard>,
    #[serde(default)]
    pub session: Option<DailySession>,
    #[serde(default)]
    pub current_scramble: Option<String>,
}

impl Default for TrainerState {
    fn default() -> Self {
        Self {
            encoding: EncodingTable::default(),
            memory_words: MemoryWordDict::default(),
            cards: Vec::new(),
            session: None,
            current_scramble: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    version: String,
    data: T,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

/// Serialize a state into its versioned envelope
pub fn encode_state(state: &TrainerState, now: DateTime<Utc>) -> Result<String> {
    let envelope = Envelope {
        version: STATE_VERSION.to_string(),
        data: state,
        last_updated: now,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse an envelope; `None` if the blob is not a usable state
pub fn decode_state(blob: &str) -> Option<TrainerState> {
    match serde_json::from_str::<Envelope<TrainerState>>(blob) {
        Ok(envelope) => {
            if envelope.version != STATE_VERSION {
                debug!(version = %envelope.version, "Loading state from another version");
            }
            Some(envelope.data)
        }
        Err(e) => {
            warn!("Ignoring malformed saved state: {}", e);
            None
        }
    }
}

// ============================================================================
// STORES
// ============================================================================

/// Raw blob persistence
pub trait StateStore: Send + Sync {
    fn load_blob(&self) -> Result<Option<String>>;
    fn save_blob(&self, blob: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// One JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `STATE_FILE` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STATE_FILE))
    }

    /// Platform data directory
    pub fn default_location() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "cubememo", "core").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(Self::in_dir(proj_dirs.data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn load_blob(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_blob(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Mutex::new(Some(blob.to_string())),
        }
    }
}

impl StateStore for MemoryStore {
    fn load_blob(&self) -> Result<Option<String>> {
        let blob = self
            .blob
            .lock()
            .map_err(|_| StorageError::Init("Store lock poisoned".into()))?;
        Ok(blob.clone())
    }

    fn save_blob(&self, blob: &str) -> Result<()> {
        let mut slot = self
            .blob
            .lock()
            .map_err(|_| StorageError::Init("Store lock poisoned".into()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .blob
            .lock()
            .map_err(|_| StorageError::Init("Store lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

// ============================================================================
// STORAGE
// ============================================================================

/// Typed state persistence over any `StateStore`
pub struct Storage {
    store: Box<dyn StateStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(store: impl StateStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// File storage in `dir`, or in the platform data directory
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let store = match dir {
            Some(dir) => FileStore::in_dir(dir),
            None => FileStore::default_location()?,
        };
        debug!(path = %store.path().display(), "Opening state file");
        Ok(Self::new(store))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Saved state, or `None` when nothing usable is stored
    pub fn load(&self) -> Result<Option<TrainerState>> {
        Ok(self
            .store
            .load_blob()?
            .and_then(|blob| decode_state(&blob)))
    }

    pub fn save(&self, state: &TrainerState) -> Result<()> {
        self.save_at(state, Utc::now())
    }

    pub fn save_at(&self, state: &TrainerState, now: DateTime<Utc>) -> Result<()> {
        self.store.save_blob(&encode_state(state, now)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}

// ============================================================================
// TESTS
// ============================================================================
