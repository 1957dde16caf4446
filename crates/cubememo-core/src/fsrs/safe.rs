//! Numeric validation boundary for the FSRS model
//!
//! Every stability, difficulty, retrievability and interval value produced by
//! the model passes through `Domain::sanitize`. Non-finite values are replaced
//! by a fallback (with a warning); finite values are clamped into range.

use super::algorithm::{MAX_DIFFICULTY, MAX_STABILITY, MIN_DIFFICULTY, MIN_STABILITY};

/// Value domain of a model quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Stability,
    Difficulty,
    Retrievability,
    /// Interval in days
    Interval,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Stability => "stability",
            Domain::Difficulty => "difficulty",
            Domain::Retrievability => "retrievability",
            Domain::Interval => "interval",
        }
    }

    /// Inclusive bounds
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Domain::Stability => (MIN_STABILITY, MAX_STABILITY),
            Domain::Difficulty => (MIN_DIFFICULTY, MAX_DIFFICULTY),
            Domain::Retrievability => (0.0, 1.0),
            Domain::Interval => (1.0, MAX_STABILITY),
        }
    }

    /// Used when both the value and its fallback are unusable
    fn last_resort(self) -> f64 {
        match self {
            Domain::Stability => MIN_STABILITY,
            Domain::Difficulty => 5.0,
            Domain::Retrievability => 0.9,
            Domain::Interval => 1.0,
        }
    }

    pub fn sanitize(self, value: f64, fallback: f64) -> f64 {
        let (lo, hi) = self.bounds();
        let value = if value.is_finite() {
            value
        } else {
            tracing::warn!(
                quantity = self.name(),
                value,
                fallback,
                "Non-finite FSRS value replaced"
            );
            if fallback.is_finite() {
                fallback
            } else {
                self.last_resort()
            }
        };
        value.clamp(lo, hi)
    }
}
