//! Trainer service
//!
//! Owns the cube engine, scheduler, scramble generator and persisted state.
//! Every mutating operation saves before returning.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::blindsolve::{analyze, BlindsolveMemo};
use crate::config::TrainerConfig;
use crate::cube::{format_scramble, CubeEngine, ParseError, PieceKind, ScrambleGenerator};
use crate::encoding::{EncodingConvention, EncodingError, EncodingTable, StickerKey};
use crate::fsrs::{FSRSCard, FSRSScheduler, LearningState, PreviewResults, Rating, SchedulingInfo};
use crate::legacy::{is_legacy_format, migrate_deck, LegacyDeck};
use crate::session::{preview_next_cards, select_next_card, CardSelection, DailyStats, SessionManager};
use crate::storage::{Storage, StorageError, TrainerState};
use crate::words::{initialize_cards, sync_cards, MemoryWordDict, PairKey, WordError};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("Unknown card: {0}")]
    UnknownCard(String),
    #[error("Not a legacy deck")]
    NotLegacyDeck,
    #[error("Invalid scramble: {0}")]
    Parse(#[from] ParseError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Word error: {0}")]
    Word(#[from] WordError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid legacy deck: {0}")]
    Legacy(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrainerError>;

/// A fresh scramble and its memo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleMemo {
    pub scramble: String,
    pub memo: BlindsolveMemo,
}

// ============================================================================
// TRAINER
// ============================================================================

#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
    engine: CubeEngine,
    scheduler: FSRSScheduler,
    generator: ScrambleGenerator,
    storage: Storage,
    state: TrainerState,
    session: SessionManager,
}

impl Trainer {
    /// Open the state file from `config.data_dir`
    pub fn open(config: TrainerConfig, now: DateTime<Utc>) -> Result<Self> {
        let storage = Storage::open(config.data_dir.clone())?;
        Self::with_storage(config, storage, now)
    }

    pub fn with_storage(config: TrainerConfig, storage: Storage, now: DateTime<Utc>) -> Result<Self> {
        let mut state = match storage.load()? {
            Some(state) => state,
            None => {
                info!(encoding = %config.encoding, "Starting with fresh state");
                TrainerState {
                    encoding: EncodingTable::for_convention(config.encoding),
                    ..TrainerState::default()
                }
            }
        };
        let session =
            SessionManager::with_default_limit(state.session.take(), now, config.new_cards_limit);

        Ok(Self {
            engine: CubeEngine::new(),
            scheduler: FSRSScheduler::new(config.fsrs_parameters()),
            generator: ScrambleGenerator::new(config.scramble_length),
            config,
            storage,
            state,
            session,
        })
    }

    /// Build the move tables
    pub async fn initialize(&self) {
        self.engine.initialize().await;
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn cards(&self) -> &[FSRSCard] {
        &self.state.cards
    }

    pub fn current_scramble(&self) -> Option<&str> {
        self.state.current_scramble.as_deref()
    }

    fn persist(&mut self) -> Result<()> {
        self.state.session = Some(self.session.session().clone());
        self.storage.save(&self.state)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // cube
    // ------------------------------------------------------------------------

    pub fn new_scramble(&mut self) -> Result<ScrambleMemo> {
        let moves = self.generator.generate();
        let scramble = format_scramble(&moves);
        let memo = analyze(&self.engine.scramble_state(&moves), &self.state.encoding);
        self.state.current_scramble = Some(scramble.clone());
        self.persist()?;
        Ok(ScrambleMemo { scramble, memo })
    }

    pub fn memo_for(&self, scramble: &str) -> Result<BlindsolveMemo> {
        let state = self.engine.apply_scramble(scramble)?;
        Ok(analyze(&state, &self.state.encoding))
    }

    pub fn set_label(&mut self, kind: PieceKind, key: &str, label: &str) -> Result<()> {
        let key: StickerKey = key.parse()?;
        self.state.encoding = self.state.encoding.set(kind, key, label)?;
        self.persist()
    }

    pub fn set_encoding(&mut self, convention: EncodingConvention) -> Result<()> {
        self.state.encoding = EncodingTable::for_convention(convention);
        self.persist()
    }

    // ------------------------------------------------------------------------
    // practice
    // ------------------------------------------------------------------------

    pub fn next_card(&mut self, now: DateTime<Utc>) -> Result<CardSelection> {
        let selection = select_next_card(&self.state.cards, &mut self.session, now);
        debug!(reason = %selection.reason, "Selected next card");
        self.persist()?;
        Ok(selection)
    }

    /// Upcoming cards without touching the session
    pub fn upcoming(&self, count: usize, now: DateTime<Utc>) -> Vec<FSRSCard> {
        preview_next_cards(&self.state.cards, &self.session, count, now)
    }

    pub fn rate(&mut self, card_id: &str, rating: Rating, now: DateTime<Utc>) -> Result<SchedulingInfo> {
        let index = self
            .state
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(|| TrainerError::UnknownCard(card_id.to_string()))?;

        self.session.ensure_today(now);
        let before = self.state.cards[index].clone();
        if before.state == LearningState::New {
            self.session.record_new_card(&before.id);
        }
        let info = self.scheduler.review(&before, rating, now);
        self.session.apply_rating(&before, &info.card);
        self.state.cards[index] = info.card.clone();
        debug!(
            card = %card_id,
            rating = %rating,
            from = %before.state,
            to = %info.card.state,
            "Rated card"
        );
        self.persist()?;
        Ok(info)
    }

    pub fn preview(&self, card_id: &str, now: DateTime<Utc>) -> Result<PreviewResults> {
        let card = self
            .state
            .cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| TrainerError::UnknownCard(card_id.to_string()))?;
        Ok(self.scheduler.preview(card, now))
    }

    pub fn learn_more(&mut self, extra: u32, now: DateTime<Utc>) -> Result<()> {
        self.session.ensure_today(now);
        self.session.learn_more(extra);
        self.persist()
    }

    pub fn stats(&mut self, now: DateTime<Utc>) -> DailyStats {
        self.session.ensure_today(now);
        self.session.daily_stats(&self.state.cards, now)
    }

    // ------------------------------------------------------------------------
    // words
    // ------------------------------------------------------------------------

    pub fn set_word(&mut self, key: &str, word: &str, now: DateTime<Utc>) -> Result<()> {
        let key: PairKey = key.parse()?;
        self.state.memory_words.set(key, word);
        self.resync(now)
    }

    /// Merge imported words; returns how many were defined
    pub fn import_words(&mut self, words: &MemoryWordDict, now: DateTime<Utc>) -> Result<usize> {
        self.state.memory_words.merge(words);
        self.resync(now)?;
        Ok(words.defined_count())
    }

    /// Back to the placeholder dictionary, dropping every card
    pub fn reset_words(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.state.memory_words = MemoryWordDict::default();
        self.session.clear_learning_queue();
        self.resync(now)
    }

    /// Forget all review history while keeping the words
    pub fn reset_progress(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.state.cards = initialize_cards(&self.state.memory_words, now);
        self.session = SessionManager::with_default_limit(None, now, self.config.new_cards_limit);
        self.persist()
    }

    /// Replace cards with a migrated SM-2 deck
    pub fn import_legacy(&mut self, raw: &Value, now: DateTime<Utc>) -> Result<usize> {
        if !is_legacy_format(raw) {
            return Err(TrainerError::NotLegacyDeck);
        }
        let deck: LegacyDeck = serde_json::from_value(raw.clone())?;
        let migrated = migrate_deck(&deck, now);
        let count = migrated.len();
        for card in migrated {
            if let Ok(key) = card.id.parse::<PairKey>() {
                self.state.memory_words.set(key, &card.word);
            }
            match self.state.cards.iter_mut().find(|c| c.id == card.id) {
                Some(slot) => *slot = card,
                None => self.state.cards.push(card),
            }
        }
        info!(count, "Migrated legacy cards");
        self.persist()?;
        Ok(count)
    }

    fn resync(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.state.cards = sync_cards(&self.state.cards, &self.state.memory_words, now);
        let ids: Vec<String> = self.session.session().learning_queue.iter().cloned().collect();
        for id in ids {
            if !self.state.cards.iter().any(|c| c.id == id) {
                self.session.remove_from_learning_queue(&id);
            }
        }
        self.persist()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SelectionReason;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap()
    }

    fn trainer() -> Trainer {
        Trainer::with_storage(TrainerConfig::default(), Storage::in_memory(), now()).unwrap()
    }

    #[tokio::test]
    async fn test_scramble_and_memo() {
        let mut trainer = trainer();
        trainer.initialize().await;

        let result = trainer.new_scramble().unwrap();
        assert_eq!(result.scramble.split_whitespace().count(), 20);
        assert!(!result.memo.is_empty());
        assert_eq!(trainer.current_scramble(), Some(result.scramble.as_str()));
        assert_eq!(trainer.memo_for(&result.scramble).unwrap(), result.memo);

        assert!(matches!(trainer.memo_for("R X"), Err(TrainerError::Parse(_))));
    }

    #[test]
    fn test_memo_before_initialize_is_empty() {
        let trainer = trainer();
        assert!(trainer.memo_for("R U").unwrap().is_empty());
    }

    #[test]
    fn test_words_drive_cards() {
        let mut trainer = trainer();
        assert!(trainer.cards().is_empty());

        trainer.set_word("ㄅㄆ", "八爬", now()).unwrap();
        trainer.set_word("ㄇㄈ", "馬飛", now()).unwrap();
        assert_eq!(trainer.cards().len(), 2);

        assert!(matches!(
            trainer.set_word("ㄅ", "x", now()),
            Err(TrainerError::Word(_))
        ));

        trainer.set_word("ㄇㄈ", "", now()).unwrap();
        assert_eq!(trainer.cards().len(), 1);

        trainer.reset_words(now()).unwrap();
        assert!(trainer.cards().is_empty());
    }

    #[test]
    fn test_practice_loop() {
        let mut trainer = trainer();
        trainer.set_word("ㄅㄆ", "八爬", now()).unwrap();

        let selection = trainer.next_card(now()).unwrap();
        assert_eq!(selection.reason, SelectionReason::New);
        let card = selection.card.unwrap();

        let info = trainer.rate(&card.id, Rating::Good, now()).unwrap();
        assert_eq!(info.card.state, LearningState::Review);
        assert_eq!(info.card.scheduled_days, 3);
        assert_eq!(trainer.session().session().new_cards_today, 1);

        let stats = trainer.stats(now());
        assert!(stats.completed_today);
        assert_eq!(trainer.next_card(now()).unwrap().reason, SelectionReason::None);

        let later = now() + Duration::days(3);
        let selection = trainer.next_card(later).unwrap();
        assert_eq!(selection.reason, SelectionReason::Review);
        trainer.rate(&card.id, Rating::Again, later).unwrap();
        assert_eq!(trainer.cards()[0].lapses, 1);
        assert_eq!(trainer.session().session().reviews_completed, 1);

        assert!(matches!(
            trainer.rate("zz", Rating::Good, later),
            Err(TrainerError::UnknownCard(_))
        ));
    }

    #[test]
    fn test_rating_unselected_new_card_counts_once() {
        let mut trainer = trainer();
        trainer.set_word("ㄅㄆ", "八爬", now()).unwrap();
        trainer.rate("ㄅㄆ", Rating::Again, now()).unwrap();
        trainer.rate("ㄅㄆ", Rating::Again, now()).unwrap();
        assert_eq!(trainer.session().session().new_cards_today, 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let store = std::sync::Arc::new(MemoryStore::new());

        struct Shared(std::sync::Arc<MemoryStore>);
        impl crate::storage::StateStore for Shared {
            fn load_blob(&self) -> crate::storage::Result<Option<String>> {
                self.0.load_blob()
            }
            fn save_blob(&self, blob: &str) -> crate::storage::Result<()> {
                self.0.save_blob(blob)
            }
            fn clear(&self) -> crate::storage::Result<()> {
                self.0.clear()
            }
        }

        let config = TrainerConfig {
            encoding: EncodingConvention::Speffz,
            ..TrainerConfig::default()
        };
        let mut first =
            Trainer::with_storage(config.clone(), Storage::new(Shared(store.clone())), now())
                .unwrap();
        first.set_word("AB", "apple bee", now()).unwrap();
        first.learn_more(5, now()).unwrap();
        first.set_label(PieceKind::Edge, "UF-U", "Q").unwrap();

        let second =
            Trainer::with_storage(TrainerConfig::default(), Storage::new(Shared(store)), now())
                .unwrap();
        assert_eq!(second.cards().len(), 1);
        assert_eq!(second.session().session().new_cards_limit, 15);
        let key: StickerKey = "UF-U".parse().unwrap();
        assert_eq!(second.state().encoding.get(PieceKind::Edge, &key), Some("Q"));
    }

    #[test]
    fn test_fresh_state_uses_configured_encoding() {
        let config = TrainerConfig {
            encoding: EncodingConvention::Speffz,
            new_cards_limit: 4,
            ..TrainerConfig::default()
        };
        let trainer = Trainer::with_storage(config, Storage::in_memory(), now()).unwrap();
        assert_eq!(trainer.state().encoding.convention(), Some(EncodingConvention::Speffz));
        assert_eq!(trainer.session().session().new_cards_limit, 4);
    }

    #[test]
    fn test_set_label_errors() {
        let mut trainer = trainer();
        assert!(matches!(
            trainer.set_label(PieceKind::Corner, "UF-U", "A"),
            Err(TrainerError::Encoding(_))
        ));
        assert!(matches!(
            trainer.set_label(PieceKind::Edge, "UF-U", "ABCD"),
            Err(TrainerError::Encoding(_))
        ));
    }

    #[test]
    fn test_import_legacy() {
        let mut trainer = trainer();
        let deck = json!({
            "ㄅㄆ": {"id": "ㄅㄆ", "code1": "ㄅ", "code2": "ㄆ", "word": "八爬",
                     "nextReviewDate": 0, "interval": 4320, "reviewCount": 4, "lastReviewed": 0}
        });
        assert_eq!(trainer.import_legacy(&deck, now()).unwrap(), 1);
        assert_eq!(trainer.cards()[0].state, LearningState::Review);
        let key: PairKey = "ㄅㄆ".parse().unwrap();
        assert_eq!(trainer.state().memory_words.get(&key), Some("八爬"));

        assert!(matches!(
            trainer.import_legacy(&json!([]), now()),
            Err(TrainerError::NotLegacyDeck)
        ));
    }

    #[test]
    fn test_reset_progress_keeps_words() {
        let mut trainer = trainer();
        trainer.set_word("ㄅㄆ", "八爬", now()).unwrap();
        trainer.rate("ㄅㄆ", Rating::Easy, now()).unwrap();
        trainer.reset_progress(now()).unwrap();
        assert_eq!(trainer.cards().len(), 1);
        assert_eq!(trainer.cards()[0].state, LearningState::New);
        assert_eq!(trainer.session().session().new_cards_today, 0);
    }
}
