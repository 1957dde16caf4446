//! Daily Session Policy
//!
//! Decides which card to study next and enforces the daily new-card quota.
//!
//! Priority:
//! 1. review cards that are due (earliest first)
//! 2. due learning / relearning cards
//! 3. a random new card, while today's quota allows
//!
//! Counters reset when the UTC date changes; the limit survives the reset.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fsrs::{get_due_cards, get_learning_cards, get_new_cards, FSRSCard, LearningState};
use crate::storage::timestamp;

/// New cards per day unless configured otherwise
pub const DEFAULT_NEW_CARDS_LIMIT: u32 = 10;

// ============================================================================
// SESSION
// ============================================================================

/// Per-day study counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySession {
    /// UTC calendar day
    pub date: NaiveDate,
    pub new_cards_today: u32,
    pub new_cards_limit: u32,
    pub reviews_completed: u32,
    #[serde(default)]
    pub learning_queue: BTreeSet<String>,
    /// Cards already counted against today's quota
    #[serde(default)]
    pub introduced_today: BTreeSet<String>,
    #[serde(with = "timestamp")]
    pub session_start: DateTime<Utc>,
}

impl DailySession {
    pub fn new(now: DateTime<Utc>, new_cards_limit: u32) -> Self {
        Self {
            date: now.date_naive(),
            new_cards_today: 0,
            new_cards_limit: new_cards_limit.max(1),
            reviews_completed: 0,
            learning_queue: BTreeSet::new(),
            introduced_today: BTreeSet::new(),
            session_start: now,
        }
    }
}

/// Snapshot of today's workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub due_count: usize,
    /// New cards still available today
    pub new_count: usize,
    pub learning_count: usize,
    pub total_new: usize,
    pub total_review: usize,
    pub new_cards_today: u32,
    pub new_cards_remaining: u32,
    pub reviews_completed: u32,
    pub completed_today: bool,
}

/// Owns the current day's session
#[derive(Debug, Clone)]
pub struct SessionManager {
    session: DailySession,
}

impl SessionManager {
    pub fn new(stored: Option<DailySession>, now: DateTime<Utc>) -> Self {
        Self::with_default_limit(stored, now, DEFAULT_NEW_CARDS_LIMIT)
    }

    /// `default_limit` applies only when there is no stored session
    pub fn with_default_limit(
        stored: Option<DailySession>,
        now: DateTime<Utc>,
        default_limit: u32,
    ) -> Self {
        let session = stored.unwrap_or_else(|| DailySession::new(now, default_limit));
        let mut manager = Self { session };
        manager.ensure_today(now);
        manager
    }

    /// Reset counters if the stored day is not today. Returns true on rollover.
    pub fn ensure_today(&mut self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        if self.session.date == today {
            return false;
        }
        debug!(
            from = %self.session.date,
            to = %today,
            "Daily session rolled over"
        );
        self.session = DailySession::new(now, self.session.new_cards_limit);
        true
    }

    pub fn session(&self) -> &DailySession {
        &self.session
    }

    pub fn into_session(self) -> DailySession {
        self.session
    }

    pub fn daily_stats(&self, cards: &[FSRSCard], now: DateTime<Utc>) -> DailyStats {
        let due_count = get_due_cards(cards, now)
            .iter()
            .filter(|c| c.state == LearningState::Review)
            .count();
        let learning_count = get_learning_cards(cards).len();
        let total_new = get_new_cards(cards).len();
        let total_review = cards
            .iter()
            .filter(|c| c.state == LearningState::Review)
            .count();
        let new_cards_remaining = self.new_cards_remaining();
        let new_count = total_new.min(new_cards_remaining as usize);

        DailyStats {
            due_count,
            new_count,
            learning_count,
            total_new,
            total_review,
            new_cards_today: self.session.new_cards_today,
            new_cards_remaining,
            reviews_completed: self.session.reviews_completed,
            completed_today: due_count == 0 && learning_count == 0 && new_count == 0,
        }
    }

    pub fn new_cards_remaining(&self) -> u32 {
        self.session
            .new_cards_limit
            .saturating_sub(self.session.new_cards_today)
    }

    /// Count a new card against the quota (once per card per day) and queue it
    pub fn record_new_card(&mut self, card_id: &str) {
        if self.session.introduced_today.insert(card_id.to_string()) {
            self.session.new_cards_today += 1;
        }
        self.add_to_learning_queue(card_id);
    }

    pub fn record_review(&mut self) {
        self.session.reviews_completed += 1;
    }

    pub fn add_to_learning_queue(&mut self, card_id: &str) {
        self.session.learning_queue.insert(card_id.to_string());
    }

    pub fn remove_from_learning_queue(&mut self, card_id: &str) {
        self.session.learning_queue.remove(card_id);
    }

    pub fn is_in_learning_queue(&self, card_id: &str) -> bool {
        self.session.learning_queue.contains(card_id)
    }

    pub fn clear_learning_queue(&mut self) {
        self.session.learning_queue.clear();
    }

    pub fn can_learn_new_cards(&self) -> bool {
        self.session.new_cards_today < self.session.new_cards_limit
    }

    pub fn set_new_cards_limit(&mut self, limit: u32) {
        self.session.new_cards_limit = limit.max(1);
    }

    /// Raise today's limit by `extra`
    pub fn learn_more(&mut self, extra: u32) {
        let limit = self.session.new_cards_limit.saturating_add(extra);
        self.set_new_cards_limit(limit);
    }

    /// Queue bookkeeping after a card moved from `before` to `after`
    pub fn apply_rating(&mut self, before: &FSRSCard, after: &FSRSCard) {
        if after.state.is_learning() {
            self.add_to_learning_queue(&after.id);
        } else {
            self.remove_from_learning_queue(&after.id);
        }
        if before.state == LearningState::Review {
            self.record_review();
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Why a card was chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SelectionReason {
    Review,
    Learning,
    New,
    None,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::Review => "review",
            SelectionReason::Learning => "learning",
            SelectionReason::New => "new",
            SelectionReason::None => "none",
        }
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSelection {
    pub card: Option<FSRSCard>,
    pub reason: SelectionReason,
    pub message: String,
}

impl CardSelection {
    fn pick(card: &FSRSCard, reason: SelectionReason, message: String) -> Self {
        Self {
            card: Some(card.clone()),
            reason,
            message,
        }
    }

    fn none(message: &str) -> Self {
        Self {
            card: None,
            reason: SelectionReason::None,
            message: message.to_string(),
        }
    }
}

pub const MSG_COMPLETED: &str = "All done for today. See you tomorrow!";
pub const MSG_QUOTA_REACHED: &str =
    "Today's new cards are done; come back later for the learning queue";
pub const MSG_NOTHING_DUE: &str = "No cards due right now";

pub fn select_next_card(
    cards: &[FSRSCard],
    manager: &mut SessionManager,
    now: DateTime<Utc>,
) -> CardSelection {
    select_next_card_with_rng(cards, manager, now, &mut rand::rng())
}

pub fn select_next_card_with_rng<R: Rng + ?Sized>(
    cards: &[FSRSCard],
    manager: &mut SessionManager,
    now: DateTime<Utc>,
    rng: &mut R,
) -> CardSelection {
    manager.ensure_today(now);
    let due = get_due_cards(cards, now);

    let reviews: Vec<&FSRSCard> = due
        .iter()
        .copied()
        .filter(|c| c.state == LearningState::Review)
        .collect();
    if let Some(card) = reviews.first() {
        return CardSelection::pick(
            card,
            SelectionReason::Review,
            format!("Review due card ({} more)", reviews.len() - 1),
        );
    }

    let learning: Vec<&FSRSCard> = due
        .iter()
        .copied()
        .filter(|c| c.state.is_learning() && manager.is_in_learning_queue(&c.id))
        .collect();
    if let Some(card) = learning.first() {
        return CardSelection::pick(
            card,
            SelectionReason::Learning,
            format!("Learning queue card ({} more)", learning.len() - 1),
        );
    }

    // an introduced but unrated card is offered again before a fresh one
    let new_cards = get_new_cards(cards);
    let chosen = if manager.can_learn_new_cards() {
        new_cards
            .iter()
            .find(|c| manager.session().introduced_today.contains(&c.id))
            .or_else(|| new_cards.choose(rng))
            .copied()
    } else {
        None
    };
    if let Some(card) = chosen {
        manager.record_new_card(&card.id);
        let session = manager.session();
        debug!(card = %card.id, "Introduced new card");
        return CardSelection::pick(
            card,
            SelectionReason::New,
            format!(
                "New card {}/{}",
                session.new_cards_today, session.new_cards_limit
            ),
        );
    }

    let stats = manager.daily_stats(cards, now);
    if stats.completed_today {
        CardSelection::none(MSG_COMPLETED)
    } else if !manager.can_learn_new_cards() {
        CardSelection::none(MSG_QUOTA_REACHED)
    } else {
        CardSelection::none(MSG_NOTHING_DUE)
    }
}

/// Upcoming cards, in selection order. The real session is left untouched.
pub fn preview_next_cards(
    cards: &[FSRSCard],
    manager: &SessionManager,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<FSRSCard> {
    let mut scratch = manager.clone();
    let mut remaining = cards.to_vec();
    let mut rng = rand::rng();
    let mut selected = Vec::new();

    while selected.len() < count {
        let Some(card) = select_next_card_with_rng(&remaining, &mut scratch, now, &mut rng).card
        else {
            break;
        };
        remaining.retain(|c| c.id != card.id);
        selected.push(card);
    }
    selected
}

// ============================================================================
// TESTS
// ============================================================================
