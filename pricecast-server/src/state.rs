//! Shared application state.

use pricecast_core::config::ServerConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `GET /`.
pub const STATUS_MESSAGE: &str = "💹 Real-Time Financial Dashboard API is running.";

/// Payload of `GET /predict`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "Next_Day_Prediction")]
    pub next_day_prediction: f64,
    #[serde(rename = "Symbol")]
    pub symbol: String,
}

/// Read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    status_message: String,
    prediction: Prediction,
}

impl AppState {
    pub fn new(status_message: impl Into<String>, prediction: Prediction) -> Self {
        Self {
            inner: Arc::new(Inner {
                status_message: status_message.into(),
                prediction,
            }),
        }
    }

    /// State serving the placeholder prediction from `[server]` settings.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            STATUS_MESSAGE,
            Prediction {
                next_day_prediction: config.placeholder_prediction,
                symbol: config.placeholder_symbol.clone(),
            },
        )
    }

    pub fn status_message(&self) -> &str {
        &self.inner.status_message
    }

    pub fn prediction(&self) -> &Prediction {
        &self.inner.prediction
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}
