//! Route table and handlers.

use crate::state::{AppState, Prediction};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::debug;

/// Build the router over `state`.
///
/// Both routes ignore query strings and request bodies.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/predict", get(predict))
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> String {
    state.status_message().to_string()
}

async fn predict(State(state): State<AppState>) -> Json<Prediction> {
    debug!(symbol = %state.prediction().symbol, "serving prediction");
    Json(state.prediction().clone())
}
