//! Rolling volatility: sample standard deviation of simple returns.
//!
//! The return series is missing at index 0, so with a window of `w` the first
//! defined value is at index `w`. Uses the n-1 denominator.

use super::{Indicator, Returns};

#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
}

impl Volatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self { window }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        "Volatility"
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        let returns = Returns::new().compute(series);
        let n = returns.len();
        let mut result = vec![None; n];

        for i in (self.window - 1)..n {
            let window: Option<Vec<f64>> =
                returns[(i + 1 - self.window)..=i].iter().copied().collect();
            if let Some(values) = window {
                result[i] = Some(sample_std(&values));
            }
        }

        result
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
