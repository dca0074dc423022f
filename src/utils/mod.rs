pub mod metrics;
pub mod validation;

pub const MIN_RATING: f32 = 1.0;
pub const MAX_RATING: f32 = 5.0;

/// Clamps a prediction into the rating scale `[1.0, 5.0]`.
pub fn clamp_rating(value: f32) -> f32 {
    MIN_RATING.max(MAX_RATING.min(value))
}

/// Empirical-Bayes shrinkage of `sum / count` toward `prior` with `strength`
/// pseudo-observations. Falls back to `prior` exactly when `count` is zero.
pub fn shrunk_mean(prior: f32, strength: f32, sum: f32, count: usize) -> f32 {
    (prior * strength + sum) / (strength + count as f32)
}
