use crate::models::*;
use crate::utils::clamp_rating;

/// Prediction of a training record after folding in `factor`.
///
/// A `running_sum` of exactly `0.0` means no factor has been folded in yet,
/// in which case the baseline seed is used instead.
pub(crate) fn partial_prediction(
    baseline: &Baseline,
    factors: &FactorMatrices,
    item_id: ItemId,
    user_id: UserId,
    running_sum: f32,
    factor: usize,
) -> f32 {
    let mut result = running_sum;
    if result == 0.0 {
        result = baseline.seed(item_id, user_id);
    }

    clamp_rating(result + factors.product(factor, item_id, user_id))
}

/// Full prediction over every factor. The running sum is clamped after each
/// factor, not only at the end, so the result depends on factor order.
///
/// Ids are not checked here; callers go through `RatingModel::predict`.
pub(crate) fn full_prediction(
    baseline: &Baseline,
    factors: &FactorMatrices,
    item_id: ItemId,
    user_id: UserId,
) -> f32 {
    let mut result = baseline.seed(item_id, user_id);

    for factor in 0..factors.num_factors() {
        result = clamp_rating(result + factors.product(factor, item_id, user_id));
    }

    result
}

/// Expected contribution of the factors not yet trained while fitting `factor`.
pub fn default_prediction(total_factors: usize, factor: usize, base: f32) -> f32 {
    let uncomputed_factors = total_factors - factor + 1;
    uncomputed_factors as f32 * base * base
}
