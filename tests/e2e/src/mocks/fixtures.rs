//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Dictionaries with a chosen number of defined words
//! - Cards in any learning state
//! - Legacy decks and spreadsheet grids for import paths
//! - A manual clock for multi-day scenarios

use chrono::{DateTime, Duration, TimeZone, Utc};
use cubememo_core::encoding::PRIMARY_ALPHABET;
use cubememo_core::{FSRSCard, LearningState, MemoryWordDict, PairKey};
use serde_json::{json, Value};

/// Manually advanced clock
#[derive(Debug, Clone, Copy)]
pub struct TestClock {
    now: DateTime<Utc>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::at(2026, 3, 2, 9)
    }
}

impl TestClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            now: Utc
                .with_ymd_and_hms(year, month, day, hour, 0, 0)
                .single()
                .expect("valid test date"),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn advance_minutes(&mut self, minutes: i64) -> DateTime<Utc> {
        self.now += Duration::minutes(minutes);
        self.now
    }

    pub fn advance_days(&mut self, days: i64) -> DateTime<Utc> {
        self.now += Duration::days(days);
        self.now
    }
}

/// Factory for creating test data
pub struct TestDataFactory;

impl TestDataFactory {
    /// The first `count` ordered pairs over the primary alphabet
    pub fn pairs(count: usize) -> Vec<PairKey> {
        let mut pairs = Vec::new();
        for first in PRIMARY_ALPHABET {
            for second in PRIMARY_ALPHABET {
                if let Ok(pair) = format!("{}{}", first, second).parse() {
                    pairs.push(pair);
                }
            }
        }
        pairs.truncate(count);
        pairs
    }

    /// Default dictionary with `count` words filled in
    pub fn dictionary(count: usize) -> MemoryWordDict {
        let mut dict = MemoryWordDict::default();
        for (i, pair) in Self::pairs(count).into_iter().enumerate() {
            dict.set(pair, &format!("word-{}", i));
        }
        dict
    }

    pub fn card(id: &str, state: LearningState, due: DateTime<Utc>) -> FSRSCard {
        let pair: PairKey = id.parse().expect("two-character id");
        let mut card = FSRSCard::new(&pair.code1(), &pair.code2(), "test", due);
        if state != LearningState::New {
            card.state = state;
            card.stability = 4.0;
            card.difficulty = 5.0;
            card.reps = 2;
            card.scheduled_days = 4;
            card.last_review = Some(due - Duration::days(4));
        }
        card
    }

    /// SM-2 deck: one unseen card, one early card, one graduated card
    pub fn legacy_deck(now: DateTime<Utc>) -> Value {
        let millis = |dt: DateTime<Utc>| dt.timestamp_millis();
        json!({
            "ㄅㄆ": {"id": "ㄅㄆ", "code1": "ㄅ", "code2": "ㄆ", "word": "八爬",
                     "nextReviewDate": millis(now), "interval": 0,
                     "reviewCount": 0, "lastReviewed": 0},
            "ㄇㄈ": {"id": "ㄇㄈ", "code1": "ㄇ", "code2": "ㄈ", "word": "馬飛",
                     "nextReviewDate": millis(now + Duration::hours(1)), "interval": 60,
                     "reviewCount": 1, "lastReviewed": millis(now - Duration::hours(1))},
            "ㄉㄊ": {"id": "ㄉㄊ", "code1": "ㄉ", "code2": "ㄊ", "word": "刀踢",
                     "nextReviewDate": millis(now + Duration::days(7)), "interval": 10080,
                     "reviewCount": 5, "lastReviewed": millis(now - Duration::days(7))}
        })
    }

    /// Spreadsheet export: header of first codes, one row per second code
    pub fn word_grid() -> String {
        ["\tㄅ\tㄆ", "ㄇ\t八馬\t爬馬", "ㄈ\t八飛\t未定"].join("\n")
    }
}
