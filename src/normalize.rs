//! Dynamic min/max normalization onto a 0..100 scale.
//!
//! Scores are relative to the values of the current candidate set, so they
//! must be recomputed for every set and never cached across requests.

/// Returned when a set cannot discriminate (fewer than two values, or no variance).
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// Map `value` to 0..=100 relative to the min/max of `all_values`.
pub fn normalize(value: f64, all_values: &[f64], direction: Direction) -> f64 {
    if all_values.len() < 2 {
        return NEUTRAL_SCORE;
    }

    let (min, max) = all_values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if min == max {
        return NEUTRAL_SCORE;
    }

    let span = max - min;
    let score = match direction {
        Direction::LowerIsBetter => (max - value) / span * 100.0,
        Direction::HigherIsBetter => (value - min) / span * 100.0,
    };
    score.clamp(0.0, 100.0)
}
