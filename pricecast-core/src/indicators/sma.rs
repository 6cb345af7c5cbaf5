//! Simple Moving Average (SMA).
//!
//! Trailing mean over `period` values. First defined at index period-1.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// SMA written under the `MA_{period}` column.
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("MA_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        let n = series.len();
        let mut result = vec![None; n];

        // Running sum of present values and count of missing ones in the window
        let mut sum = 0.0;
        let mut missing = 0usize;

        for i in 0..n {
            match series[i] {
                Some(v) => sum += v,
                None => missing += 1,
            }
            if i >= self.period {
                match series[i - self.period] {
                    Some(v) => sum -= v,
                    None => missing -= 1,
                }
            }
            if i + 1 >= self.period && missing == 0 {
                result[i] = Some(sum / self.period as f64);
            }
        }

        result
    }
}
