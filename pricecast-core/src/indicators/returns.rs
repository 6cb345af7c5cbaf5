//! Simple returns: `(x[t] - x[t-1]) / x[t-1]`.
//!
//! Missing at t = 0, where either neighbour is missing, or where the previous
//! value is zero.

use super::Indicator;

#[derive(Debug, Clone, Default)]
pub struct Returns;

impl Returns {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Returns {
    fn name(&self) -> &str {
        "Returns"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut result = vec![None; series.len()];
        for i in 1..series.len() {
            if let (Some(prev), Some(cur)) = (series[i - 1], series[i]) {
                if prev != 0.0 {
                    result[i] = Some((cur - prev) / prev);
                }
            }
        }
        result
    }
}
