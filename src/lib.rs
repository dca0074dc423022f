pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use algorithms::{evaluate, evaluate_report, RatingModel, Trainer};
pub use config::Config;
pub use error::{FactorecError, IdKind, Result};
pub use models::*;

/// Trains a model on `ratings` with the capacity and constants from `config`.
pub fn train(ratings: Vec<Rating>, config: &Config) -> Result<TrainedModel> {
    Trainer::new(config.model, config.training.clone())?.train(ratings)
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
