//! PriceCast Server: HTTP status and prediction endpoints.
//!
//! The service is decoupled from the pipeline: `/predict` answers with the
//! payload held in [`AppState`], which is built once at startup and shared
//! with every handler.

pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, Prediction};

use pricecast_core::config::ServerConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind to the configured address and serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "prediction service listening");

    let app = router(AppState::from_config(config));
    axum::serve(listener, app).await?;
    Ok(())
}
