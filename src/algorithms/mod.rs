pub mod baseline;
pub mod evaluator;
pub mod initializer;
pub mod optimizer;
pub mod predictor;
pub mod trainer;

use crate::error::{FactorecError, IdKind, Result};
use crate::models::*;
use crate::utils::clamp_rating;
use crate::utils::validation::{validate_item_id, validate_user_id};

pub use evaluator::{evaluate, evaluate_report};
pub use trainer::Trainer;

/// Anything that can produce a clamped rating estimate for an `(item, user)` pair.
pub trait RatingModel {
    fn predict(&self, item_id: ItemId, user_id: UserId) -> Result<f32>;
}

impl RatingModel for TrainedModel {
    fn predict(&self, item_id: ItemId, user_id: UserId) -> Result<f32> {
        validate_item_id(item_id, &self.capacity)?;
        validate_user_id(user_id, &self.capacity)?;
        Ok(predictor::full_prediction(
            &self.baseline,
            &self.factors,
            item_id,
            user_id,
        ))
    }
}

/// Baseline-only prediction, `clamp(item_mean + user_mean)`.
impl RatingModel for Baseline {
    fn predict(&self, item_id: ItemId, user_id: UserId) -> Result<f32> {
        if item_id >= self.items.len() {
            return Err(FactorecError::out_of_range(
                IdKind::Item,
                item_id,
                self.items.len(),
            ));
        }
        if user_id >= self.users.len() {
            return Err(FactorecError::out_of_range(
                IdKind::User,
                user_id,
                self.users.len(),
            ));
        }
        Ok(clamp_rating(self.seed(item_id, user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, TrainingConfig};

    fn trained() -> TrainedModel {
        let capacity = ModelConfig {
            max_users: 3,
            max_items: 3,
            max_factors: 2,
        };
        let settings = TrainingConfig {
            min_tries: 10,
            ..TrainingConfig::default()
        };
        let ratings = vec![
            Rating::new(0, 0, 5, 0),
            Rating::new(0, 1, 1, 0),
            Rating::new(1, 0, 4, 0),
            Rating::new(2, 2, 3, 0),
        ];
        Trainer::new(capacity, settings).unwrap().train(ratings).unwrap()
    }

    #[test]
    fn test_trained_model_predictions_are_clamped() {
        let model = trained();
        for item_id in 0..3 {
            for user_id in 0..3 {
                let value = model.predict(item_id, user_id).unwrap();
                assert!((1.0..=5.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_trained_model_rejects_out_of_range_ids() {
        let model = trained();
        assert!(matches!(
            model.predict(3, 0),
            Err(FactorecError::OutOfRangeIdentifier {
                kind: IdKind::Item,
                ..
            })
        ));
        assert!(matches!(
            model.predict(0, 3),
            Err(FactorecError::OutOfRangeIdentifier {
                kind: IdKind::User,
                ..
            })
        ));
    }

    #[test]
    fn test_baseline_model_matches_seed() {
        let model = trained();
        let expected = clamp_rating(model.baseline.seed(1, 2));
        assert_eq!(model.baseline.predict(1, 2).unwrap(), expected);
        assert!(model.baseline.predict(0, 9).is_err());
    }
}
