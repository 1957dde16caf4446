//! Journey: state survives restarts
//!
//! Progress, session counters and the encoding table are written to the
//! state file and read back by the next process. Damaged files start
//! fresh; legacy decks and spreadsheet grids import into the same state.

use cubememo_core::storage::{decode_state, encode_state};
use cubememo_core::{
    EncodingConvention, EncodingTable, LearningState, MemoryWordDict, Rating, TrainerError,
};
use cubememo_e2e_tests::harness::TestStoreManager;
use cubememo_e2e_tests::mocks::{TestClock, TestDataFactory};
use serde_json::{json, Value};

#[test]
fn test_reopen_keeps_cards_session_and_encoding() {
    let store = TestStoreManager::new_temp();
    let mut clock = TestClock::default();

    let mut trainer = store.open(clock.now());
    trainer.set_encoding(EncodingConvention::Speffz).unwrap();
    trainer.set_word("ㄅㄆ", "八爬", clock.now()).unwrap();
    trainer.set_word("ㄇㄈ", "馬飛", clock.now()).unwrap();
    trainer.rate("ㄅㄆ", Rating::Again, clock.now()).unwrap();
    let cards = trainer.cards().to_vec();
    let session = trainer.session().session().clone();
    drop(trainer);
    assert!(store.exists());

    clock.advance_minutes(5);
    let trainer = store.open(clock.now());
    assert_eq!(trainer.cards(), cards.as_slice());
    assert_eq!(trainer.session().session(), &session);
    assert_eq!(trainer.state().encoding, EncodingTable::speffz());
    assert!(trainer.session().is_in_learning_queue("ㄅㄆ"));
    assert_eq!(trainer.memo_for("R").unwrap().edges, "J V T B");
}

#[test]
fn test_saved_file_is_a_versioned_envelope() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer
        .import_words(&TestDataFactory::dictionary(3), clock.now())
        .unwrap();

    let raw: Value = serde_json::from_str(&store.read_raw().unwrap()).unwrap();
    assert_eq!(raw["version"], "1.0.0");
    assert!(raw["lastUpdated"].is_string());
    assert_eq!(raw["data"]["cards"].as_array().unwrap().len(), 3);
    assert!(raw["data"]["cards"][0]["due"].is_string());
    assert!(raw["data"]["memoryWords"].is_object());
}

#[test]
fn test_state_round_trips_byte_for_byte() {
    let store = TestStoreManager::new_temp();
    let mut clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer
        .import_words(&TestDataFactory::dictionary(6), clock.now())
        .unwrap();
    for _ in 0..3 {
        let card = trainer.next_card(clock.now()).unwrap().card.unwrap();
        trainer.rate(&card.id, Rating::Hard, clock.now()).unwrap();
        clock.advance_minutes(3);
    }
    drop(trainer);

    let first = store.read_raw().unwrap();
    let state = decode_state(&first).unwrap();
    let saved_at = clock.now();
    let encoded = encode_state(&state, saved_at).unwrap();
    let again = encode_state(&decode_state(&encoded).unwrap(), saved_at).unwrap();
    assert_eq!(encoded, again);

    let storage = store.storage();
    storage.save_at(&state, saved_at).unwrap();
    assert_eq!(store.read_raw().unwrap(), encoded);
}

#[test]
fn test_corrupt_file_starts_fresh() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    store.write_raw("{\"version\": \"1.0.0\", \"data\": [");

    let mut trainer = store.open(clock.now());
    assert!(trainer.cards().is_empty());
    assert_eq!(
        trainer.state().encoding,
        EncodingTable::for_convention(EncodingConvention::Primary)
    );

    // the next save replaces the damaged file
    trainer.set_word("ㄅㄆ", "八爬", clock.now()).unwrap();
    let trainer = store.open(clock.now());
    assert_eq!(trainer.cards().len(), 1);
}

#[test]
fn test_snapshot_restores_progress() {
    let mut store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer.set_word("ㄅㄆ", "八爬", clock.now()).unwrap();
    trainer.rate("ㄅㄆ", Rating::Good, clock.now()).unwrap();
    drop(trainer);
    store.take_snapshot();

    let mut trainer = store.open(clock.now());
    trainer.reset_progress(clock.now()).unwrap();
    assert_eq!(trainer.cards()[0].state, LearningState::New);
    drop(trainer);

    assert!(store.restore_snapshot());
    let trainer = store.open(clock.now());
    assert_eq!(trainer.cards()[0].state, LearningState::Review);

    store.clear();
    assert!(!store.exists());
}

#[test]
fn test_legacy_deck_import() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());

    let count = trainer
        .import_legacy(&TestDataFactory::legacy_deck(clock.now()), clock.now())
        .unwrap();
    assert_eq!(count, 3);

    let state_of = |id: &str| {
        trainer
            .cards()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.state)
            .unwrap()
    };
    assert_eq!(state_of("ㄅㄆ"), LearningState::New);
    assert_eq!(state_of("ㄇㄈ"), LearningState::Learning);
    assert_eq!(state_of("ㄉㄊ"), LearningState::Review);

    let review = trainer.cards().iter().find(|c| c.id == "ㄉㄊ").unwrap();
    assert_eq!(review.scheduled_days, 7);
    assert_eq!(review.stability, 7.0);
    assert_eq!(trainer.state().memory_words.defined_count(), 3);

    let err = trainer
        .import_legacy(&json!([{"id": "ㄅㄆ"}]), clock.now())
        .unwrap_err();
    assert!(matches!(err, TrainerError::NotLegacyDeck));
}

#[test]
fn test_word_grid_import() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());

    let dict = MemoryWordDict::from_grid(&TestDataFactory::word_grid());
    assert_eq!(dict.defined_count(), 3);
    assert_eq!(trainer.import_words(&dict, clock.now()).unwrap(), 3);

    let mut ids: Vec<&str> = trainer.cards().iter().map(|c| c.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["ㄅㄇ", "ㄅㄈ", "ㄆㄇ"]);
    let word = |key: &str| trainer.state().memory_words.get(&key.parse().unwrap()).map(str::to_string);
    assert_eq!(word("ㄅㄇ").as_deref(), Some("八馬"));
    assert_eq!(word("ㄆㄈ").as_deref(), Some("未定"));
}
