//! Regression error metrics.

use serde::{Deserialize, Serialize};

/// Error metrics of predictions against true values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute all metrics. Both slices must have the same length.
    pub fn calculate(y_true: &[f64], y_pred: &[f64]) -> Self {
        let mse = Self::mean_squared_error(y_true, y_pred);
        Self {
            mae: Self::mean_absolute_error(y_true, y_pred),
            mse,
            rmse: mse.sqrt(),
            n_samples: y_true.len(),
        }
    }

    /// (1/n) * Σ|y_true - y_pred|
    pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).abs())
            .sum::<f64>()
            / n
    }

    /// (1/n) * Σ(y_true - y_pred)²
    pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
        let n = y_true.len() as f64;
        y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum::<f64>()
            / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::calculate(&y, &y);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.n_samples, 3);
    }

    #[test]
    fn known_errors() {
        let t = [1.0, 2.0, 3.0, 4.0];
        let p = [2.0, 2.0, 1.0, 4.0];
        let m = RegressionMetrics::calculate(&t, &p);
        // |errors| = 1, 0, 2, 0
        assert_eq!(m.mae, 0.75);
        assert_eq!(m.mse, 1.25);
        assert!((m.rmse - 1.25f64.sqrt()).abs() < 1e-12);
    }
}
