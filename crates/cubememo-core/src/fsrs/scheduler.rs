//! FSRS card scheduling
//!
//! Cards move `new -> learning -> review`, and `review -> relearning -> review`
//! on a lapse. `schedule_candidates` computes all four possible outcomes of a
//! review; the caller keeps the one matching the user's rating.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::algorithm::{
    fuzz_interval, initial_difficulty, initial_stability, next_difficulty, next_forget_stability,
    next_interval, next_recall_stability, retrievability, short_term_stability, Weights,
    DEFAULT_MAXIMUM_INTERVAL, DEFAULT_RETENTION, FSRS45_WEIGHTS, LEARNING_STEPS, RELEARNING_STEPS,
};
use crate::storage::timestamp;

/// Floor for Easy intervals graduating out of (re)learning
const EASY_GRADUATION_DAYS: u32 = 4;

// ============================================================================
// RATING / STATE
// ============================================================================

/// Review grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_f64(self) -> f64 {
        self as i32 as f64
    }

    /// Zero-based position (Again = 0)
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    /// Accepts names (`good`) and numbers (`3`)
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Some(Rating::Again),
            "hard" | "2" => Some(Rating::Hard),
            "good" | "3" => Some(Rating::Good),
            "easy" | "4" => Some(Rating::Easy),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card learning phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningState {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl LearningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::New => "new",
            LearningState::Learning => "learning",
            LearningState::Review => "review",
            LearningState::Relearning => "relearning",
        }
    }

    /// Learning or relearning
    pub fn is_learning(&self) -> bool {
        matches!(self, LearningState::Learning | LearningState::Relearning)
    }
}

impl fmt::Display for LearningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CARD
// ============================================================================

/// Flashcard for one letter pair.
///
/// New cards carry zero stability and difficulty; both are set by the first
/// rating and stay finite and bounded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FSRSCard {
    /// Pair key, `code1` followed by `code2`
    pub id: String,
    pub code1: String,
    pub code2: String,
    pub word: String,
    pub state: LearningState,
    #[serde(with = "timestamp")]
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u32,
    pub scheduled_days: u32,
    pub reps: u32,
    pub lapses: u32,
    #[serde(default, with = "timestamp::option")]
    pub last_review: Option<DateTime<Utc>>,
    /// Day of the first rating
    #[serde(default)]
    pub introduced_date: Option<NaiveDate>,
}

impl FSRSCard {
    /// New card, due immediately
    pub fn new(code1: &str, code2: &str, word: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}{}", code1, code2),
            code1: code1.to_string(),
            code2: code2.to_string(),
            word: word.to_string(),
            state: LearningState::New,
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            last_review: None,
            introduced_date: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    /// Whole days since the last review (0 if never reviewed)
    pub fn days_since_review(&self, now: DateTime<Utc>) -> u32 {
        self.last_review
            .map(|last| (now - last).num_days().max(0) as u32)
            .unwrap_or(0)
    }

    /// Modeled recall probability at `now`; 0 for cards never studied
    pub fn retrievability(&self, now: DateTime<Utc>) -> f64 {
        match self.state {
            LearningState::New => 0.0,
            _ => retrievability(self.days_since_review(now) as f64, self.stability),
        }
    }
}

/// Record of one review, taken from the card as it was before the review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub rating: Rating,
    pub state: LearningState,
    #[serde(with = "timestamp")]
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u32,
    pub last_elapsed_days: u32,
    pub scheduled_days: u32,
    #[serde(with = "timestamp")]
    pub review: DateTime<Utc>,
}

/// One candidate outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingInfo {
    pub card: FSRSCard,
    pub review_log: ReviewLog,
}

/// All four candidate outcomes of a review
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingCards {
    pub again: SchedulingInfo,
    pub hard: SchedulingInfo,
    pub good: SchedulingInfo,
    pub easy: SchedulingInfo,
}

impl SchedulingCards {
    pub fn get(&self, rating: Rating) -> &SchedulingInfo {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }

    /// Keep the outcome for `rating`, discarding the rest
    pub fn select(self, rating: Rating) -> SchedulingInfo {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }
}

/// Human-readable next interval for each rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResults {
    pub again: String,
    pub hard: String,
    pub good: String,
    pub easy: String,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Scheduler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FSRSParameters {
    pub request_retention: f64,
    /// Days
    pub maximum_interval: u32,
    pub w: Weights,
    pub enable_fuzz: bool,
}

impl Default for FSRSParameters {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            w: FSRS45_WEIGHTS,
            enable_fuzz: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FSRSScheduler {
    params: FSRSParameters,
}

impl FSRSScheduler {
    pub fn new(params: FSRSParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FSRSParameters {
        &self.params
    }

    pub fn schedule_candidates(&self, card: &FSRSCard, now: DateTime<Utc>) -> SchedulingCards {
        self.schedule_candidates_with_rng(card, now, &mut rand::rng())
    }

    /// All four outcomes; `rng` is only used when fuzz is enabled
    pub fn schedule_candidates_with_rng<R: Rng + ?Sized>(
        &self,
        card: &FSRSCard,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SchedulingCards {
        let elapsed_days = match card.state {
            LearningState::New => 0,
            _ => card.days_since_review(now),
        };

        let mut base = card.clone();
        base.elapsed_days = elapsed_days;
        base.last_review = Some(now);
        base.reps += 1;
        if base.introduced_date.is_none() {
            base.introduced_date = Some(now.date_naive());
        }

        let [again, hard, good, easy] = match card.state {
            LearningState::New => self.schedule_new(&base, now, rng),
            LearningState::Learning | LearningState::Relearning => {
                self.schedule_learning(&base, now, rng)
            }
            LearningState::Review => self.schedule_review(&base, card, now, rng),
        };

        let log = |rating: Rating, next: &FSRSCard| ReviewLog {
            rating,
            state: card.state,
            due: card.due,
            stability: card.stability,
            difficulty: card.difficulty,
            elapsed_days,
            last_elapsed_days: card.elapsed_days,
            scheduled_days: next.scheduled_days,
            review: now,
        };

        SchedulingCards {
            again: SchedulingInfo {
                review_log: log(Rating::Again, &again),
                card: again,
            },
            hard: SchedulingInfo {
                review_log: log(Rating::Hard, &hard),
                card: hard,
            },
            good: SchedulingInfo {
                review_log: log(Rating::Good, &good),
                card: good,
            },
            easy: SchedulingInfo {
                review_log: log(Rating::Easy, &easy),
                card: easy,
            },
        }
    }

    /// Outcome for a single rating
    pub fn review(&self, card: &FSRSCard, rating: Rating, now: DateTime<Utc>) -> SchedulingInfo {
        self.schedule_candidates(card, now).select(rating)
    }

    /// Formatted waiting time for each rating
    pub fn preview(&self, card: &FSRSCard, now: DateTime<Utc>) -> PreviewResults {
        let candidates = self.schedule_candidates(card, now);
        let describe = |info: &SchedulingInfo| {
            let minutes = (info.card.due - now).num_minutes();
            format_interval(info.card.scheduled_days, Some(minutes))
        };
        PreviewResults {
            again: describe(&candidates.again),
            hard: describe(&candidates.hard),
            good: describe(&candidates.good),
            easy: describe(&candidates.easy),
        }
    }

    fn schedule_new<R: Rng + ?Sized>(
        &self,
        base: &FSRSCard,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> [FSRSCard; 4] {
        let w = &self.params.w;
        let state_for = |rating| (initial_difficulty(rating, w), initial_stability(rating, w));

        let (d, s) = state_for(Rating::Again);
        let again = step(base, LearningState::Learning, d, s, LEARNING_STEPS[0], now);

        let (d, s) = state_for(Rating::Hard);
        let hard = step(base, LearningState::Learning, d, s, LEARNING_STEPS[1], now);

        let (d, s) = state_for(Rating::Good);
        let good_interval = self.interval(s, rng);
        let good = graduate(base, d, s, good_interval, now);

        let (d, s) = state_for(Rating::Easy);
        let easy_interval = self
            .interval(s, rng)
            .max(good_interval)
            .max(EASY_GRADUATION_DAYS);
        let easy = graduate(base, d, s, self.cap(easy_interval), now);

        [again, hard, good, easy]
    }

    fn schedule_learning<R: Rng + ?Sized>(
        &self,
        base: &FSRSCard,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> [FSRSCard; 4] {
        let w = &self.params.w;
        let state_for = |rating| {
            (
                next_difficulty(base.difficulty, rating, w),
                short_term_stability(base.stability, rating, w),
            )
        };
        let (again_step, hard_step) = match base.state {
            LearningState::Relearning => (RELEARNING_STEPS[0], RELEARNING_STEPS[0]),
            _ => (LEARNING_STEPS[0], LEARNING_STEPS[1]),
        };

        let (d, s) = state_for(Rating::Again);
        let again = step(base, base.state, d, s, again_step, now);

        let (d, s) = state_for(Rating::Hard);
        let hard = step(base, base.state, d, s, hard_step, now);

        let (d, s) = state_for(Rating::Good);
        let good_interval = self.interval(s, rng);
        let good = graduate(base, d, s, good_interval, now);

        let (d, s) = state_for(Rating::Easy);
        let easy_interval = self
            .interval(s, rng)
            .max(good_interval)
            .max(EASY_GRADUATION_DAYS);
        let easy = graduate(base, d, s, self.cap(easy_interval), now);

        [again, hard, good, easy]
    }

    fn schedule_review<R: Rng + ?Sized>(
        &self,
        base: &FSRSCard,
        previous: &FSRSCard,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> [FSRSCard; 4] {
        let w = &self.params.w;
        let (d, s) = (previous.difficulty, previous.stability);
        let r = retrievability(base.elapsed_days as f64, s);
        let last_interval = previous.scheduled_days as f64;

        let again_d = next_difficulty(d, Rating::Again, w);
        let again_s = next_forget_stability(d, s, r, w);
        let mut again = step(
            base,
            LearningState::Relearning,
            again_d,
            again_s,
            RELEARNING_STEPS[0],
            now,
        );
        again.lapses += 1;

        let recall = |rating| {
            (
                next_difficulty(d, rating, w),
                next_recall_stability(d, s, r, rating, w),
            )
        };

        let (hard_d, hard_s) = recall(Rating::Hard);
        let hard_interval = self
            .interval(hard_s, rng)
            .min((last_interval * 1.2).round() as u32)
            .max(1);
        let hard = graduate(base, hard_d, hard_s, hard_interval, now);

        let (good_d, good_s) = recall(Rating::Good);
        let good_interval = self.interval(good_s, rng);
        let good = graduate(base, good_d, good_s, good_interval, now);

        let (easy_d, easy_s) = recall(Rating::Easy);
        let easy_interval = self
            .interval(easy_s, rng)
            .max((last_interval * 1.3).round() as u32)
            .max(good_interval);
        let easy = graduate(base, easy_d, easy_s, self.cap(easy_interval), now);

        [again, hard, good, easy]
    }

    fn interval<R: Rng + ?Sized>(&self, stability: f64, rng: &mut R) -> u32 {
        let days = next_interval(
            stability,
            self.params.request_retention,
            self.params.maximum_interval,
        );
        if self.params.enable_fuzz {
            self.cap(fuzz_interval(days, rng))
        } else {
            days
        }
    }

    fn cap(&self, days: u32) -> u32 {
        days.clamp(1, self.params.maximum_interval.max(1))
    }
}

/// Short-step outcome, due in `minutes`
fn step(
    base: &FSRSCard,
    state: LearningState,
    difficulty: f64,
    stability: f64,
    minutes: i64,
    now: DateTime<Utc>,
) -> FSRSCard {
    FSRSCard {
        state,
        difficulty,
        stability,
        scheduled_days: 0,
        due: now + Duration::minutes(minutes),
        ..base.clone()
    }
}

/// Review-state outcome, due in `days`
fn graduate(
    base: &FSRSCard,
    difficulty: f64,
    stability: f64,
    days: u32,
    now: DateTime<Utc>,
) -> FSRSCard {
    FSRSCard {
        state: LearningState::Review,
        difficulty,
        stability,
        scheduled_days: days,
        due: now + Duration::days(days as i64),
        ..base.clone()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Started cards whose due time has passed, earliest first
pub fn get_due_cards(cards: &[FSRSCard], now: DateTime<Utc>) -> Vec<&FSRSCard> {
    let mut due: Vec<&FSRSCard> = cards
        .iter()
        .filter(|c| c.state != LearningState::New && c.is_due(now))
        .collect();
    due.sort_by_key(|c| c.due);
    due
}

pub fn get_new_cards(cards: &[FSRSCard]) -> Vec<&FSRSCard> {
    cards
        .iter()
        .filter(|c| c.state == LearningState::New)
        .collect()
}

/// Cards in learning or relearning
pub fn get_learning_cards(cards: &[FSRSCard]) -> Vec<&FSRSCard> {
    cards.iter().filter(|c| c.state.is_learning()).collect()
}

pub fn get_review_cards(cards: &[FSRSCard]) -> Vec<&FSRSCard> {
    cards
        .iter()
        .filter(|c| c.state == LearningState::Review)
        .collect()
}

/// Short description of a waiting time.
///
/// `minutes` wins when given and under an hour.
pub fn format_interval(days: u32, minutes: Option<i64>) -> String {
    if let Some(minutes) = minutes.filter(|m| *m < 60) {
        return format!("{} min", minutes.max(0));
    }
    match days {
        0 => "<1 day".to_string(),
        1 => "1 day".to_string(),
        2..=29 => format!("{} days", days),
        30..=364 => format!("{} mo", (days as f64 / 30.0).round() as u32),
        _ => format!("{} yr", (days as f64 / 365.0).round() as u32),
    }
}

// ============================================================================
// TESTS
// ============================================================================
