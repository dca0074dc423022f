use crate::models::{FactorMatrices, ItemId, UserId};

/// Plain SGD with L2 regularisation on a single factor's item and user entries.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    learning_rate: f32,
    regularization: f32,
}

impl Sgd {
    pub fn new(learning_rate: f64, regularization: f64) -> Self {
        Self {
            learning_rate: learning_rate as f32,
            regularization: regularization as f32,
        }
    }

    /// Applies one update for the observed `error = rating - prediction`.
    ///
    /// The user entry is updated first; the item update then uses the user
    /// value from before that update.
    pub fn step(
        &self,
        factors: &mut FactorMatrices,
        factor: usize,
        item_id: ItemId,
        user_id: UserId,
        error: f32,
    ) {
        let user_value = factors.user_factors[(factor, user_id)];
        let item_value = factors.item_factors[(factor, item_id)];

        let user_diff = error * item_value - self.regularization * user_value;
        factors.user_factors[(factor, user_id)] += self.learning_rate * user_diff;

        let item_diff = error * user_value - self.regularization * item_value;
        factors.item_factors[(factor, item_id)] += self.learning_rate * item_diff;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::initializer::initialize_factor_matrices;
    use crate::config::ModelConfig;
    use approx::assert_relative_eq;

    fn factors() -> FactorMatrices {
        let capacity = ModelConfig {
            max_users: 2,
            max_items: 2,
            max_factors: 2,
        };
        initialize_factor_matrices(&capacity, 0.1)
    }

    #[test]
    fn test_step_uses_pre_update_user_value() {
        let mut factors = factors();
        factors.user_factors[(0, 1)] = 0.5;
        factors.item_factors[(0, 0)] = 0.2;

        let sgd = Sgd::new(0.1, 0.02);
        sgd.step(&mut factors, 0, 0, 1, 2.0);

        // user: 0.5 + 0.1 * (2.0 * 0.2 - 0.02 * 0.5)
        assert_relative_eq!(factors.user_factors[(0, 1)], 0.539, epsilon = 1e-6);
        // item: 0.2 + 0.1 * (2.0 * 0.5 - 0.02 * 0.2), using the old user value
        assert_relative_eq!(factors.item_factors[(0, 0)], 0.2996, epsilon = 1e-6);
    }

    #[test]
    fn test_step_touches_only_one_factor() {
        let mut factors = factors();
        let sgd = Sgd::new(0.001, 0.02);
        sgd.step(&mut factors, 1, 1, 0, 1.5);

        assert_eq!(factors.user_factors[(0, 0)], 0.1);
        assert_eq!(factors.item_factors[(0, 1)], 0.1);
        assert!(factors.user_factors[(1, 0)] > 0.1);
        assert!(factors.item_factors[(1, 1)] > 0.1);
        assert_eq!(factors.user_factors[(1, 1)], 0.1);
    }

    #[test]
    fn test_zero_error_only_decays() {
        let mut factors = factors();
        let sgd = Sgd::new(0.01, 0.5);
        sgd.step(&mut factors, 0, 0, 0, 0.0);

        assert_relative_eq!(factors.user_factors[(0, 0)], 0.0995, epsilon = 1e-7);
        assert_relative_eq!(factors.item_factors[(0, 0)], 0.0995, epsilon = 1e-7);
    }
}
