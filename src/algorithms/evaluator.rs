use crate::algorithms::RatingModel;
use crate::error::Result;
use crate::models::{EvaluationReport, Rating};
use crate::utils::metrics::ErrorAccumulator;
use crate::utils::validation::ensure_non_empty;
use tracing::info;

/// RMSE of `model` over a held-out rating list.
pub fn evaluate<M: RatingModel + ?Sized>(model: &M, ratings: &[Rating]) -> Result<f32> {
    evaluate_report(model, ratings).map(|report| report.rmse)
}

pub fn evaluate_report<M: RatingModel + ?Sized>(
    model: &M,
    ratings: &[Rating],
) -> Result<EvaluationReport> {
    ensure_non_empty(ratings, "evaluation set")?;

    let mut errors = ErrorAccumulator::new();
    for rating in ratings {
        let predicted = model.predict(rating.item_id, rating.user_id)?;
        errors.record(predicted, rating.rating as f32);
    }

    let report = errors.report()?;
    info!(
        "Evaluated {} ratings: RMSE {:.6}, MAE {:.6}",
        report.count, report.rmse, report.mae
    );
    Ok(report)
}
