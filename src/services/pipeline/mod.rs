use crate::algorithms::{evaluate_report, Trainer};
use crate::config::Config;
use crate::models::{EvaluationReport, TrainingReport};
use crate::services::loader::load_ratings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub training_count: usize,
    pub test_count: usize,
    pub training: TrainingReport,
    pub baseline: EvaluationReport,
    pub model: EvaluationReport,
    pub elapsed_ms: u128,
}

impl PipelineReport {
    pub fn rmse(&self) -> f32 {
        self.model.rmse
    }
}

/// Loads the training set, trains, then scores the held-out set.
pub fn run(config: &Config) -> Result<PipelineReport> {
    let started = Instant::now();
    config.validate().context("Invalid configuration")?;

    let training = load_ratings(&config.data.training_path).with_context(|| {
        format!(
            "Failed to load training set {}",
            config.data.training_path.display()
        )
    })?;
    info!("Total training set count: {}", training.len());
    let training_count = training.len();

    let trainer = Trainer::new(config.model, config.training.clone())?;
    let (model, training_report) = trainer
        .train_with_report(training)
        .context("Training failed")?;

    let test = load_ratings(&config.data.test_path).with_context(|| {
        format!("Failed to load test set {}", config.data.test_path.display())
    })?;
    info!("Total test set count: {}", test.len());

    let baseline = evaluate_report(&model.baseline, &test).context("Baseline evaluation failed")?;
    let scored = evaluate_report(&model, &test).context("Model evaluation failed")?;

    info!(
        "Baseline RMSE {:.6}, model RMSE {:.6}",
        baseline.rmse, scored.rmse
    );

    Ok(PipelineReport {
        training_count,
        test_count: test.len(),
        training: training_report,
        baseline,
        model: scored,
        elapsed_ms: started.elapsed().as_millis(),
    })
}
