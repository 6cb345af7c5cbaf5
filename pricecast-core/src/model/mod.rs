//! Regression model: OLS fit, chronological split, error metrics, trainer.

pub mod linear;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use linear::LinearRegression;
pub use metrics::RegressionMetrics;
pub use split::chronological_split;
pub use trainer::{train_model, train_model_with, Evaluation, TrainReport, TrainerConfig};

use thiserror::Error;

/// Errors that can occur while fitting or evaluating a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("insufficient data: {usable} complete rows give {train} train and {test} test rows")]
    InsufficientData {
        usable: usize,
        train: usize,
        test: usize,
    },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("computation error: {0}")]
    Computation(String),
}
