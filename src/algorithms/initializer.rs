use crate::config::ModelConfig;
use crate::models::FactorMatrices;
use nalgebra::DMatrix;
use tracing::debug;

pub fn constant(rows: usize, cols: usize, value: f32) -> DMatrix<f32> {
    DMatrix::from_element(rows, cols, value)
}

/// Fills both factor tables with `base`. No randomness, so training is
/// reproducible for identical input.
pub fn initialize_factor_matrices(capacity: &ModelConfig, base: f32) -> FactorMatrices {
    debug!(
        "Initialising factor matrices: {} factors x {} items, {} factors x {} users",
        capacity.max_factors, capacity.max_items, capacity.max_factors, capacity.max_users
    );

    FactorMatrices {
        item_factors: constant(capacity.max_factors, capacity.max_items, base),
        user_factors: constant(capacity.max_factors, capacity.max_users, base),
    }
}
