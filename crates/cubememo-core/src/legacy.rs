//! Legacy deck migration
//!
//! Older saves kept SM-2 style flashcards keyed by pair (`interval` in
//! minutes, `reviewCount`, millisecond timestamps). They are converted into
//! FSRS cards by inferring a learning state from the review count.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fsrs::{Domain, FSRSCard, LearningState, MAX_STABILITY, MIN_STABILITY};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Reviews after which a legacy card counts as graduated
const GRADUATED_REVIEWS: u32 = 3;

/// Difficulty assigned to migrated cards
const MIGRATED_DIFFICULTY: f64 = 5.0;

/// SM-2 era flashcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFlashcard {
    pub id: String,
    pub code1: String,
    pub code2: String,
    pub word: String,
    /// Epoch milliseconds
    pub next_review_date: i64,
    /// Minutes
    pub interval: f64,
    pub review_count: u32,
    /// Epoch milliseconds, 0 if never reviewed
    #[serde(default)]
    pub last_reviewed: i64,
}

pub type LegacyDeck = BTreeMap<String, LegacyFlashcard>;

fn from_millis(millis: i64, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(fallback)
}

pub fn migrate_card(old: &LegacyFlashcard, now: DateTime<Utc>) -> FSRSCard {
    let mut card = FSRSCard::new(&old.code1, &old.code2, &old.word, now);
    card.id = old.id.clone();
    let interval_days = old.interval / MINUTES_PER_DAY;

    if old.review_count > 0 {
        card.reps = old.review_count;
        card.difficulty = MIGRATED_DIFFICULTY;
        card.due = from_millis(old.next_review_date, now);
        if old.review_count < GRADUATED_REVIEWS {
            card.state = LearningState::Learning;
            card.stability = Domain::Stability.sanitize(interval_days, MIN_STABILITY);
        } else {
            card.state = LearningState::Review;
            card.stability = Domain::Stability.sanitize(interval_days, 1.0).max(1.0);
            card.scheduled_days = interval_days.round().clamp(0.0, MAX_STABILITY) as u32;
        }
    }

    if old.last_reviewed > 0 {
        let last = from_millis(old.last_reviewed, now);
        card.last_review = Some(last);
        card.elapsed_days = (now - last).num_days().max(0) as u32;
    } else if old.review_count > 0 {
        card.last_review = Some(now);
    }
    card
}

pub fn migrate_deck(deck: &LegacyDeck, now: DateTime<Utc>) -> Vec<FSRSCard> {
    deck.values().map(|old| migrate_card(old, now)).collect()
}

/// A pair-keyed object of SM-2 cards
pub fn is_legacy_format(data: &Value) -> bool {
    let Some(first) = data.as_object().and_then(|map| map.values().next()) else {
        return false;
    };
    first.get("nextReviewDate").is_some()
        && first.get("interval").is_some_and(Value::is_number)
        && first.get("stability").is_none()
}

/// An array of FSRS cards (an empty array qualifies)
pub fn is_current_format(data: &Value) -> bool {
    let Some(cards) = data.as_array() else {
        return false;
    };
    cards.first().is_none_or(|first| {
        ["stability", "difficulty", "state"]
            .iter()
            .all(|field| first.get(field).is_some())
    })
}
