//! Lag: the series shifted back by a fixed number of rows.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Lag {
    periods: usize,
    name: String,
}

impl Lag {
    /// Lag written under the `Lag_{periods}` column.
    pub fn new(periods: usize) -> Self {
        Self {
            periods,
            name: format!("Lag_{periods}"),
        }
    }
}

impl Indicator for Lag {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.periods
    }

    fn compute(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        (0..series.len())
            .map(|i| i.checked_sub(self.periods).and_then(|j| series[j]))
            .collect()
    }
}
