use crate::error::{FactorecError, Result};
use crate::models::EvaluationReport;

/// Running squared and absolute error totals over a stream of predictions.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator {
    count: usize,
    squared_error: f32,
    absolute_error: f32,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, predicted: f32, actual: f32) {
        self.record_error(actual - predicted);
    }

    pub fn record_error(&mut self, error: f32) {
        self.squared_error += error * error;
        self.absolute_error += error.abs();
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn squared_error(&self) -> f32 {
        self.squared_error
    }

    pub fn rmse(&self) -> Result<f32> {
        self.ensure_observed()?;
        Ok((self.squared_error / self.count as f32).sqrt())
    }

    pub fn mae(&self) -> Result<f32> {
        self.ensure_observed()?;
        Ok(self.absolute_error / self.count as f32)
    }

    pub fn report(&self) -> Result<EvaluationReport> {
        Ok(EvaluationReport {
            count: self.count,
            rmse: self.rmse()?,
            mae: self.mae()?,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn ensure_observed(&self) -> Result<()> {
        if self.count == 0 {
            return Err(FactorecError::invalid_input(
                "cannot compute an error mean over zero ratings",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rmse_and_mae() {
        let mut acc = ErrorAccumulator::new();
        acc.record(4.0, 5.0);
        acc.record(3.0, 1.0);

        assert_eq!(acc.count(), 2);
        assert_relative_eq!(acc.squared_error(), 5.0);
        assert_relative_eq!(acc.rmse().unwrap(), 2.5f32.sqrt());
        assert_relative_eq!(acc.mae().unwrap(), 1.5);
    }

    #[test]
    fn test_empty_accumulator_is_invalid() {
        let acc = ErrorAccumulator::new();
        assert!(matches!(acc.rmse(), Err(FactorecError::InvalidInput { .. })));
        assert!(acc.report().is_err());
    }

    #[test]
    fn test_reset() {
        let mut acc = ErrorAccumulator::new();
        acc.record_error(2.0);
        acc.reset();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.squared_error(), 0.0);
    }
}
