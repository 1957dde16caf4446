//! Storage Module
//!
//! JSON persistence for the trainer state:
//! - Versioned envelope `{ version, data, lastUpdated }`
//! - File and in-memory blob stores behind `StateStore`
//! - Lenient timestamp parsing for hand-edited or older files

mod store;
pub mod timestamp;

pub use store::{
    decode_state, encode_state, FileStore, MemoryStore, Result, StateStore, Storage,
    StorageError, TrainerState, STATE_FILE, STATE_VERSION,
};
