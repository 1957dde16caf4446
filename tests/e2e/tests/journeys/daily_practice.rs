//! Journey: a few days of letter-pair practice
//!
//! Words are imported, new cards are introduced up to the daily quota,
//! ratings move cards through learning into review and the quota resets
//! on the next day.

use cubememo_core::{LearningState, MemoryWordDict, Rating, SelectionReason};
use cubememo_core::session::{MSG_COMPLETED, MSG_QUOTA_REACHED};
use cubememo_e2e_tests::harness::TestStoreManager;
use cubememo_e2e_tests::mocks::{TestClock, TestDataFactory};

#[test]
fn test_first_day_quota_and_learning_steps() {
    let store = TestStoreManager::new_temp();
    let mut clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer
        .import_words(&TestDataFactory::dictionary(15), clock.now())
        .unwrap();
    assert_eq!(trainer.cards().len(), 15);

    // introduce ten cards, each rated Again once
    let mut introduced = Vec::new();
    for i in 1..=10 {
        let selection = trainer.next_card(clock.now()).unwrap();
        assert_eq!(selection.reason, SelectionReason::New);
        assert_eq!(selection.message, format!("New card {}/10", i));
        let card = selection.card.unwrap();
        let info = trainer.rate(&card.id, Rating::Again, clock.now()).unwrap();
        assert_eq!(info.card.state, LearningState::Learning);
        introduced.push(card.id);
    }

    // nothing is due for a minute and the quota is spent
    let selection = trainer.next_card(clock.now()).unwrap();
    assert_eq!(selection.reason, SelectionReason::None);
    assert_eq!(selection.message, MSG_QUOTA_REACHED);

    // learning cards come back after their step
    clock.advance_minutes(2);
    for _ in 0..10 {
        let selection = trainer.next_card(clock.now()).unwrap();
        assert_eq!(selection.reason, SelectionReason::Learning);
        let card = selection.card.unwrap();
        assert!(introduced.contains(&card.id));
        let info = trainer.rate(&card.id, Rating::Good, clock.now()).unwrap();
        assert_eq!(info.card.state, LearningState::Review);
    }

    let stats = trainer.stats(clock.now());
    assert_eq!(stats.learning_count, 0);
    assert_eq!(stats.new_cards_today, 10);
    assert_eq!(stats.new_count, 0);
    assert_eq!(stats.total_new, 5);
    assert!(trainer.session().session().learning_queue.is_empty());

    // learn more opens the remaining cards without resetting counts
    trainer.learn_more(5, clock.now()).unwrap();
    for _ in 0..5 {
        let selection = trainer.next_card(clock.now()).unwrap();
        assert_eq!(selection.reason, SelectionReason::New);
        trainer
            .rate(&selection.card.unwrap().id, Rating::Good, clock.now())
            .unwrap();
    }
    let selection = trainer.next_card(clock.now()).unwrap();
    assert_eq!(selection.message, MSG_COMPLETED);
    assert!(trainer.stats(clock.now()).completed_today);
}

#[test]
fn test_first_good_rating_schedules_three_days() {
    let store = TestStoreManager::new_temp();
    let mut clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer.set_word("ㄅㄆ", "八爬", clock.now()).unwrap();

    let info = trainer.rate("ㄅㄆ", Rating::Good, clock.now()).unwrap();
    assert_eq!(info.card.state, LearningState::Review);
    assert_eq!(info.card.scheduled_days, 3);

    clock.advance_days(1);
    assert_eq!(
        trainer.next_card(clock.now()).unwrap().message,
        MSG_COMPLETED
    );

    clock.advance_days(2);
    let selection = trainer.next_card(clock.now()).unwrap();
    assert_eq!(selection.reason, SelectionReason::Review);

    let preview = trainer.preview("ㄅㄆ", clock.now()).unwrap();
    assert_eq!(preview.again, "10 min");

    let again = trainer.rate("ㄅㄆ", Rating::Again, clock.now()).unwrap();
    assert_eq!(again.card.state, LearningState::Relearning);
    assert_eq!(again.card.lapses, 1);
    assert_eq!(again.review_log.state, LearningState::Review);
    assert_eq!(trainer.session().session().reviews_completed, 1);
}

#[test]
fn test_quota_resets_on_a_new_day() {
    let store = TestStoreManager::new_temp();
    let mut clock = TestClock::default();
    let mut dict = MemoryWordDict::empty();
    for (i, pair) in TestDataFactory::pairs(30).into_iter().enumerate() {
        dict.set(pair, &format!("w{}", i));
    }

    let mut trainer = store.open(clock.now());
    trainer.import_words(&dict, clock.now()).unwrap();
    for _ in 0..10 {
        let card = trainer.next_card(clock.now()).unwrap().card.unwrap();
        trainer.rate(&card.id, Rating::Easy, clock.now()).unwrap();
    }
    assert!(!trainer.session().can_learn_new_cards());
    drop(trainer);

    // a new process on the next day
    clock.advance_days(1);
    let mut trainer = store.open(clock.now());
    let session = trainer.session().session().clone();
    assert_eq!(session.date, clock.now().date_naive());
    assert_eq!(session.new_cards_today, 0);
    assert_eq!(session.reviews_completed, 0);

    let selection = trainer.next_card(clock.now()).unwrap();
    assert_eq!(selection.reason, SelectionReason::New);
    assert_eq!(selection.message, "New card 1/10");
}

#[test]
fn test_upcoming_does_not_spend_quota() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer
        .import_words(&TestDataFactory::dictionary(4), clock.now())
        .unwrap();

    let upcoming = trainer.upcoming(10, clock.now());
    assert_eq!(upcoming.len(), 4);
    assert_eq!(trainer.session().session().new_cards_today, 0);
}
