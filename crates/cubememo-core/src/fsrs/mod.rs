//! FSRS-4.5 (Free Spaced Repetition Scheduler) Module
//!
//! Schedules letter-pair flashcards.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core Formulas:
//! - Retrievability: R = 0.9^(t / S)
//! - Interval: t = S/FACTOR * (R^(1/DECAY) - 1) with DECAY = -0.5, FACTOR = 19/81
//!
//! ## States:
//! - `new` cards have never been rated
//! - `learning` / `relearning` cards repeat within minutes
//! - `review` cards wait whole days

mod algorithm;
mod safe;
mod scheduler;

pub use algorithm::{
    fuzz_interval,
    initial_difficulty,
    initial_stability,
    next_difficulty,
    next_forget_stability,
    next_interval,
    next_recall_stability,
    // Core functions
    retrievability,
    short_term_stability,
    Weights,
    DECAY,
    DEFAULT_MAXIMUM_INTERVAL,
    DEFAULT_RETENTION,
    FACTOR,
    // Constants
    FSRS45_WEIGHTS,
    LEARNING_STEPS,
    MAX_DIFFICULTY,
    MAX_STABILITY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
    RELEARNING_STEPS,
    WEIGHT_COUNT,
};

pub use safe::Domain;

pub use scheduler::{
    format_interval, get_due_cards, get_learning_cards, get_new_cards, get_review_cards,
    FSRSCard, FSRSParameters, FSRSScheduler, LearningState, PreviewResults, Rating, ReviewLog,
    SchedulingCards, SchedulingInfo,
};
