//! # Cubememo Core
//!
//! Engine for a blindfolded Rubik's cube trainer:
//!
//! - **Facelet model**: 54-sticker cube with table-driven face turns
//! - **Scrambles**: random move sequences without redundant turns
//! - **Encodings**: sticker -> label tables (Zhuyin or Speffz letters)
//! - **Memo analysis**: cycle tracing from the UR / UBL buffers into labels
//! - **FSRS-4.5**: spaced repetition for letter-pair mnemonic words
//! - **Daily sessions**: review-first card selection with a new-card quota
//!
//! ## Quick Start
//!
//! ```rust
//! use cubememo_core::{analyze, CubeEngine, EncodingTable};
//!
//! let engine = CubeEngine::initialized();
//! let state = engine.apply_scramble("R").unwrap();
//! let memo = analyze(&state, &EncodingTable::speffz());
//! assert_eq!(memo.edges, "J V T B");
//! ```
//!
//! Scheduling a letter-pair card:
//!
//! ```rust
//! use chrono::Utc;
//! use cubememo_core::{FSRSCard, FSRSScheduler, LearningState, Rating};
//!
//! let now = Utc::now();
//! let card = FSRSCard::new("ㄅ", "ㄆ", "八爬", now);
//! let next = FSRSScheduler::default().review(&card, Rating::Good, now).card;
//! assert_eq!(next.state, LearningState::Review);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod blindsolve;
pub mod config;
pub mod cube;
pub mod encoding;
pub mod fsrs;
pub mod legacy;
pub mod session;
pub mod storage;
pub mod trainer;
pub mod words;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use blindsolve::{analyze, BlindsolveMemo};
pub use config::TrainerConfig;
pub use cube::{
    format_scramble, invert_sequence, parse_scramble, Color, CornerPosition, CubeEngine,
    EdgePosition, Face, FaceletState, Move, ParseError, Piece, PieceKind, Position,
    ScrambleGenerator, Turn,
};
pub use encoding::{EncodingConvention, EncodingError, EncodingTable, StickerKey};
pub use fsrs::{
    format_interval, FSRSCard, FSRSParameters, FSRSScheduler, LearningState, PreviewResults,
    Rating, ReviewLog, SchedulingCards, SchedulingInfo,
};
pub use legacy::{is_current_format, is_legacy_format, migrate_deck, LegacyFlashcard};
pub use session::{
    select_next_card, CardSelection, DailySession, DailyStats, SelectionReason, SessionManager,
};
pub use storage::{FileStore, MemoryStore, StateStore, Storage, StorageError, TrainerState};
pub use trainer::{ScrambleMemo, Trainer, TrainerError};
pub use words::{MemoryWordDict, PairKey, WordError, UNDEFINED_WORD};
