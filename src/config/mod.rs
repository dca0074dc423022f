use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FactorecError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub training_path: PathBuf,
    pub test_path: PathBuf,
}

/// Capacity bounds for the dense factor matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub max_users: usize,
    pub max_items: usize,
    pub max_factors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Initial value of every factor matrix entry.
    pub base: f64,
    pub learning_rate: f64,
    pub regularization: f64,
    pub min_tries: usize,
    pub convergence_epsilon: f64,
    /// Pseudo-count blending per-entity means toward the global mean.
    pub shrinkage: f64,
    /// Sentinel "previous RMSE" before the first sweep of a factor.
    pub initial_rmse: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                training_path: PathBuf::from("data/train.txt"),
                test_path: PathBuf::from("data/test.txt"),
            },
            model: ModelConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_users: 1000,
            max_items: 1700,
            max_factors: 30,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            base: 0.1,
            learning_rate: 0.001,
            regularization: 0.02,
            min_tries: 200,
            convergence_epsilon: 0.0001,
            shrinkage: 15.0,
            initial_rmse: 1000.0,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("FACTOREC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.training.validate()
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_users == 0 || self.max_items == 0 {
            return Err(FactorecError::invalid_input(
                "user and item capacity must be greater than 0",
            ));
        }
        if self.max_factors == 0 {
            return Err(FactorecError::invalid_input(
                "number of factors must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("base", self.base),
            ("learning_rate", self.learning_rate),
            ("convergence_epsilon", self.convergence_epsilon),
            ("initial_rmse", self.initial_rmse),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FactorecError::invalid_input(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("regularization", self.regularization),
            ("shrinkage", self.shrinkage),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FactorecError::invalid_input(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }

        if self.min_tries == 0 {
            return Err(FactorecError::invalid_input(
                "min_tries must be greater than 0",
            ));
        }
        Ok(())
    }
}
