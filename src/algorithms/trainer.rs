use crate::algorithms::baseline::compute_baselines;
use crate::algorithms::initializer::initialize_factor_matrices;
use crate::algorithms::optimizer::Sgd;
use crate::algorithms::predictor::{default_prediction, partial_prediction};
use crate::config::{ModelConfig, TrainingConfig};
use crate::error::{FactorecError, Result};
use crate::models::*;
use crate::utils::clamp_rating;
use crate::utils::metrics::ErrorAccumulator;
use tracing::{debug, info, trace};

/// Greedy per-factor SGD trainer.
///
/// Factors are fitted one at a time. Each factor is swept over the whole
/// training set at least `min_tries` times and afterwards for as long as the
/// training RMSE keeps dropping by at least `convergence_epsilon`. Its
/// contribution is then folded into every record's running sum and never
/// revisited.
#[derive(Debug, Clone)]
pub struct Trainer {
    capacity: ModelConfig,
    settings: TrainingConfig,
}

impl Trainer {
    pub fn new(capacity: ModelConfig, settings: TrainingConfig) -> Result<Self> {
        capacity.validate()?;
        settings.validate()?;
        Ok(Self { capacity, settings })
    }

    pub fn capacity(&self) -> &ModelConfig {
        &self.capacity
    }

    pub fn train(&self, ratings: Vec<Rating>) -> Result<TrainedModel> {
        self.train_with_report(ratings).map(|(model, _)| model)
    }

    pub fn train_with_report(
        &self,
        ratings: Vec<Rating>,
    ) -> Result<(TrainedModel, TrainingReport)> {
        let mut store = RatingStore::new(ratings, &self.capacity)?;
        self.train_store(&mut store)
    }

    /// Trains over an existing store, leaving every record's running sum
    /// holding the prediction of all factors. Sums left by an earlier run are
    /// cleared first.
    pub fn train_store(
        &self,
        store: &mut RatingStore,
    ) -> Result<(TrainedModel, TrainingReport)> {
        if store.is_empty() {
            return Err(FactorecError::invalid_input("empty training set"));
        }
        store.reset_running_sums();

        let baseline = compute_baselines(store, &self.capacity, self.settings.shrinkage as f32)?;
        let mut factors = initialize_factor_matrices(&self.capacity, self.settings.base as f32);
        let sgd = Sgd::new(self.settings.learning_rate, self.settings.regularization);

        info!(
            "Computing {} factors over {} ratings",
            self.capacity.max_factors,
            store.len()
        );

        let mut report = TrainingReport::default();
        for factor in 0..self.capacity.max_factors {
            let summary = self.train_factor(factor, store, &baseline, &mut factors, &sgd)?;
            info!(
                "Factor {} computed after {} sweeps, training RMSE {:.6}",
                factor + 1,
                summary.sweeps,
                summary.final_rmse
            );
            report.factors.push(summary);

            fold_factor(factor, store, &baseline, &factors);
        }

        let model = TrainedModel {
            capacity: self.capacity,
            baseline,
            factors,
        };

        Ok((model, report))
    }

    fn train_factor(
        &self,
        factor: usize,
        store: &RatingStore,
        baseline: &Baseline,
        factors: &mut FactorMatrices,
        sgd: &Sgd,
    ) -> Result<FactorSummary> {
        let default = default_prediction(
            self.capacity.max_factors,
            factor,
            self.settings.base as f32,
        );
        let epsilon = self.settings.convergence_epsilon as f32;

        debug!("Training factor {} (default prediction {:.4})", factor + 1, default);

        let mut rmse = self.settings.initial_rmse as f32;
        let mut tries = 0usize;
        let mut rmse_trace = Vec::new();
        let mut errors = ErrorAccumulator::new();

        loop {
            let previous = rmse;
            errors.reset();

            for record in store.records() {
                let rating = &record.rating;
                let prediction = partial_prediction(
                    baseline,
                    factors,
                    rating.item_id,
                    rating.user_id,
                    record.running_sum(),
                    factor,
                );
                let prediction = clamp_rating(prediction + default);
                let error = rating.rating as f32 - prediction;
                errors.record_error(error);

                sgd.step(factors, factor, rating.item_id, rating.user_id, error);
            }

            rmse = errors.rmse()?;
            tries += 1;
            rmse_trace.push(rmse);
            trace!("Factor {} sweep {}: RMSE {:.6}", factor + 1, tries, rmse);

            if !should_continue(tries, self.settings.min_tries, rmse, previous, epsilon) {
                break;
            }
        }

        Ok(FactorSummary {
            factor,
            sweeps: tries,
            final_rmse: rmse,
            rmse_trace,
        })
    }
}

/// Stopping rule: always run `min_tries` sweeps, then keep going while RMSE
/// improves by at least `epsilon`. A NaN RMSE stops the loop.
pub fn should_continue(
    tries: usize,
    min_tries: usize,
    rmse: f32,
    previous: f32,
    epsilon: f32,
) -> bool {
    tries < min_tries || rmse + epsilon <= previous
}

fn fold_factor(
    factor: usize,
    store: &mut RatingStore,
    baseline: &Baseline,
    factors: &FactorMatrices,
) {
    for record in store.records_mut() {
        let rating = record.rating;
        let value = partial_prediction(
            baseline,
            factors,
            rating.item_id,
            rating.user_id,
            record.running_sum(),
            factor,
        );
        record.set_running_sum(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(max_factors: usize) -> ModelConfig {
        ModelConfig {
            max_users: 4,
            max_items: 4,
            max_factors,
        }
    }

    fn settings(min_tries: usize) -> TrainingConfig {
        TrainingConfig {
            min_tries,
            ..TrainingConfig::default()
        }
    }

    fn sample_ratings() -> Vec<Rating> {
        vec![
            Rating::new(1, 1, 5, 0),
            Rating::new(1, 2, 1, 0),
            Rating::new(2, 1, 4, 0),
            Rating::new(2, 2, 2, 0),
        ]
    }

    #[test]
    fn test_should_continue() {
        assert!(should_continue(1, 5, 2.0, 1.0, 0.0001));
        assert!(should_continue(5, 5, 0.5, 1.0, 0.0001));
        assert!(!should_continue(5, 5, 0.99995, 1.0, 0.0001));
        assert!(!should_continue(5, 5, f32::NAN, 1.0, 0.0001));
    }

    #[test]
    fn test_empty_training_set_is_invalid_input() {
        let trainer = Trainer::new(capacity(1), settings(5)).unwrap();
        let result = trainer.train(Vec::new());
        assert!(matches!(result, Err(FactorecError::InvalidInput { .. })));
    }

    #[test]
    fn test_out_of_range_item_is_rejected() {
        let trainer = Trainer::new(capacity(1), settings(5)).unwrap();
        let result = trainer.train(vec![Rating::new(0, 4, 3, 0)]);
        assert!(matches!(
            result,
            Err(FactorecError::OutOfRangeIdentifier { id: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut bad = settings(5);
        bad.min_tries = 0;
        assert!(Trainer::new(capacity(1), bad).is_err());
        assert!(Trainer::new(capacity(0), settings(5)).is_err());
    }

    #[test]
    fn test_report_has_one_summary_per_factor() {
        let trainer = Trainer::new(capacity(3), settings(5)).unwrap();
        let (_, report) = trainer.train_with_report(sample_ratings()).unwrap();

        assert_eq!(report.factors.len(), 3);
        for (index, summary) in report.factors.iter().enumerate() {
            assert_eq!(summary.factor, index);
            assert!(summary.sweeps >= 5);
            assert_eq!(summary.rmse_trace.len(), summary.sweeps);
            assert_eq!(summary.rmse_trace.last(), Some(&summary.final_rmse));
        }
    }

    #[test]
    fn test_stopping_rule_after_min_tries() {
        let epsilon = TrainingConfig::default().convergence_epsilon as f32;
        let trainer = Trainer::new(capacity(2), settings(3)).unwrap();
        let (_, report) = trainer.train_with_report(sample_ratings()).unwrap();

        for summary in &report.factors {
            let trace = &summary.rmse_trace;
            // every sweep past min_tries that continued had to improve by epsilon
            for k in 3..trace.len() {
                assert!(trace[k - 1] + epsilon <= trace[k - 2]);
            }
            // and the loop stopped because the last sweep did not
            let last = trace.len() - 1;
            assert!(last < 2 || trace[last] + epsilon > trace[last - 1]);
        }
    }

    #[test]
    fn test_running_sums_hold_clamped_predictions() {
        let trainer = Trainer::new(capacity(2), settings(5)).unwrap();
        let mut store = RatingStore::new(sample_ratings(), trainer.capacity()).unwrap();
        trainer.train_store(&mut store).unwrap();

        for record in store.records() {
            let value = record.running_sum();
            assert!((1.0..=5.0).contains(&value));
        }
    }

    #[test]
    fn test_retraining_same_store_is_reproducible() {
        let trainer = Trainer::new(capacity(2), settings(5)).unwrap();
        let mut store = RatingStore::new(sample_ratings(), trainer.capacity()).unwrap();

        let (first, first_report) = trainer.train_store(&mut store).unwrap();
        let first_sums: Vec<f32> = store.records().iter().map(|r| r.running_sum()).collect();
        let (second, second_report) = trainer.train_store(&mut store).unwrap();
        let second_sums: Vec<f32> = store.records().iter().map(|r| r.running_sum()).collect();

        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
        assert_eq!(first_sums, second_sums);

        let fresh = trainer.train(sample_ratings()).unwrap();
        assert_eq!(first, fresh);
    }

    #[test]
    fn test_training_only_moves_rated_entries() {
        let trainer = Trainer::new(capacity(1), settings(5)).unwrap();
        let model = trainer.train(sample_ratings()).unwrap();

        assert_eq!(model.factors.item_embedding(0, 0), 0.1);
        assert_eq!(model.factors.user_embedding(0, 3), 0.1);
        assert_ne!(model.factors.item_embedding(0, 1), 0.1);
        assert_ne!(model.factors.user_embedding(0, 2), 0.1);
    }
}
