//! FSRS-4.5 model functions
//!
//! Pure functions over explicit weights. All outputs go through
//! `Domain::sanitize`, so callers always receive finite, bounded values.

use rand::Rng;

use super::safe::Domain;
use super::scheduler::Rating;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of model weights
pub const WEIGHT_COUNT: usize = 19;

/// Model weights
pub type Weights = [f64; WEIGHT_COUNT];

/// Default FSRS-4.5 weights
pub const FSRS45_WEIGHTS: Weights = [
    0.4072, 1.1829, 3.1262, 15.4722, 7.2102, 0.5316, 1.0651, 0.0234, 1.616, 0.1544, 1.0824,
    1.9813, 0.0953, 0.2975, 2.2042, 0.2407, 2.9466, 0.5034, 0.6567,
];

/// Target recall probability at the due date
pub const DEFAULT_RETENTION: f64 = 0.9;

/// Longest interval in days
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;

/// Power-curve decay used by the interval formula
pub const DECAY: f64 = -0.5;

/// Chosen so that the interval equals the stability at 90% retention
pub const FACTOR: f64 = 19.0 / 81.0;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;
pub const MIN_STABILITY: f64 = 0.1;
pub const MAX_STABILITY: f64 = 36500.0;

/// Learning steps in minutes
pub const LEARNING_STEPS: [i64; 2] = [1, 10];

/// Relearning steps in minutes
pub const RELEARNING_STEPS: [i64; 1] = [10];

// ============================================================================
// MODEL
// ============================================================================

/// Difficulty after the first rating
pub fn initial_difficulty(rating: Rating, w: &Weights) -> f64 {
    let raw = w[4] - (rating.as_f64() - 3.0) * w[5];
    Domain::Difficulty.sanitize(raw, w[4])
}

/// Stability after the first rating
pub fn initial_stability(rating: Rating, w: &Weights) -> f64 {
    let raw = w[rating.index()].max(MIN_STABILITY);
    Domain::Stability.sanitize(raw, MIN_STABILITY)
}

/// Recall probability after `elapsed_days` at `stability`: `0.9^(t/S)`
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    let raw = 0.9_f64.powf(elapsed_days / stability);
    Domain::Retrievability.sanitize(raw, DEFAULT_RETENTION)
}

/// Difficulty update with mean reversion towards the Good-rating default
pub fn next_difficulty(difficulty: f64, rating: Rating, w: &Weights) -> f64 {
    let shifted = difficulty - w[6] * (rating.as_f64() - 3.0);
    let raw = w[7] * w[4] + (1.0 - w[7]) * shifted;
    Domain::Difficulty.sanitize(raw, difficulty)
}

/// Stability after a successful review (Hard, Good or Easy)
pub fn next_recall_stability(
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
    w: &Weights,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * (((1.0 - retrievability) * w[10]).exp() - 1.0)
        * hard_penalty
        * easy_bonus;
    let raw = stability * (1.0 + growth);
    Domain::Stability.sanitize(raw, stability)
}

/// Stability after a lapse; never exceeds the previous stability
pub fn next_forget_stability(
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    w: &Weights,
) -> f64 {
    let raw = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * ((1.0 - retrievability) * w[14]).exp();
    Domain::Stability.sanitize(raw.min(stability), stability)
}

/// Stability change for a same-day review in the (re)learning phase
pub fn short_term_stability(stability: f64, rating: Rating, w: &Weights) -> f64 {
    let raw = stability * (w[17] * (rating.as_f64() - 3.0 + w[18])).exp();
    Domain::Stability.sanitize(raw, stability)
}

/// Interval in whole days that hits `request_retention`, within `[1, maximum_interval]`
pub fn next_interval(stability: f64, request_retention: f64, maximum_interval: u32) -> u32 {
    let raw = stability / FACTOR * (request_retention.powf(1.0 / DECAY) - 1.0);
    let days = Domain::Interval.sanitize(raw.round(), 1.0);
    (days as u32).clamp(1, maximum_interval.max(1))
}

/// Spread an interval by ±5% so cards introduced together drift apart.
///
/// Intervals under 2.5 days are returned unchanged.
pub fn fuzz_interval<R: Rng + ?Sized>(interval: u32, rng: &mut R) -> u32 {
    if (interval as f64) < 2.5 {
        return interval;
    }
    let low = ((interval as f64 * 0.95).round() as u32).max(2);
    let high = ((interval as f64 * 1.05).round() as u32).max(low);
    rng.random_range(low..=high)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const W: &Weights = &FSRS45_WEIGHTS;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_initial_values() {
        assert!(approx_eq(initial_stability(Rating::Again, W), 0.4072, 1e-9));
        assert!(approx_eq(initial_stability(Rating::Good, W), 3.1262, 1e-9));
        assert!(approx_eq(initial_stability(Rating::Easy, W), 15.4722, 1e-9));

        assert!(approx_eq(initial_difficulty(Rating::Good, W), 7.2102, 1e-9));
        assert!(approx_eq(
            initial_difficulty(Rating::Again, W),
            7.2102 + 2.0 * 0.5316,
            1e-9
        ));
        assert!(initial_difficulty(Rating::Easy, W) < initial_difficulty(Rating::Hard, W));
    }

    #[test]
    fn test_retrievability_curve() {
        assert!(approx_eq(retrievability(0.0, 5.0), 1.0, 1e-12));
        assert!(approx_eq(retrievability(5.0, 5.0), 0.9, 1e-12));
        assert!(retrievability(10.0, 5.0) < retrievability(5.0, 5.0));
        // zero stability collapses to zero recall, not NaN
        assert_eq!(retrievability(3.0, 0.0), 0.0);
        // 0/0 is replaced
        assert_eq!(retrievability(0.0, 0.0), DEFAULT_RETENTION);
    }

    #[test]
    fn test_interval_equals_stability_at_default_retention() {
        for s in [1.0, 3.1262, 15.4722, 100.0, 1234.3] {
            assert_eq!(next_interval(s, 0.9, DEFAULT_MAXIMUM_INTERVAL), s.round() as u32);
        }
        // higher retention means shorter intervals
        assert!(next_interval(100.0, 0.95, 36500) < next_interval(100.0, 0.9, 36500));
        // bounds
        assert_eq!(next_interval(0.01, 0.9, 36500), 1);
        assert_eq!(next_interval(1e9, 0.9, 365), 365);
        assert_eq!(next_interval(f64::NAN, 0.9, 365), 1);
    }

    #[test]
    fn test_next_difficulty_direction() {
        let d = 5.0;
        assert!(next_difficulty(d, Rating::Again, W) > d);
        assert!(next_difficulty(d, Rating::Easy, W) < d);
        assert!(next_difficulty(10.0, Rating::Again, W) <= MAX_DIFFICULTY);
        assert!(next_difficulty(1.0, Rating::Easy, W) >= MIN_DIFFICULTY);
    }

    #[test]
    fn test_recall_stability_ordering() {
        let (d, s, r) = (5.0, 10.0, 0.9);
        let hard = next_recall_stability(d, s, r, Rating::Hard, W);
        let good = next_recall_stability(d, s, r, Rating::Good, W);
        let easy = next_recall_stability(d, s, r, Rating::Easy, W);
        assert!(hard > s);
        assert!(hard < good);
        assert!(good < easy);
    }

    #[test]
    fn test_forget_stability_shrinks() {
        let s = 30.0;
        let forgotten = next_forget_stability(5.0, s, 0.5, W);
        assert!(forgotten < s);
        assert!(forgotten >= MIN_STABILITY);
    }

    #[test]
    fn test_short_term_stability() {
        let s = 3.0;
        assert!(short_term_stability(s, Rating::Again, W) < s);
        assert!(short_term_stability(s, Rating::Good, W) > s);
    }

    #[test]
    fn test_extreme_inputs_stay_finite() {
        for elapsed in [0.0, 1.0, 365.0, 10_000.0, 100_000.0] {
            for s in [0.0, MIN_STABILITY, 1.0, 1000.0, MAX_STABILITY] {
                let r = retrievability(elapsed, s);
                assert!(r.is_finite() && (0.0..=1.0).contains(&r));
                for rating in Rating::ALL {
                    let next = next_recall_stability(5.0, s, r, rating, W);
                    assert!(next.is_finite() && next >= MIN_STABILITY && next <= MAX_STABILITY);
                }
                let lapse = next_forget_stability(10.0, s, r, W);
                assert!(lapse.is_finite() && lapse >= MIN_STABILITY);
            }
        }
    }

    #[test]
    fn test_fuzz_interval_range() {
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(fuzz_interval(1, &mut rng), 1);
        assert_eq!(fuzz_interval(2, &mut rng), 2);
        for _ in 0..100 {
            let fuzzed = fuzz_interval(100, &mut rng);
            assert!((95..=105).contains(&fuzzed));
        }
        for _ in 0..20 {
            let fuzzed = fuzz_interval(3, &mut rng);
            assert!((2..=3).contains(&fuzzed));
        }
    }
}
