//! PriceCast Core: price tables, loaders, cleaning, indicators and model training.
//!
//! The pipeline is a chain of pure stages over typed tables:
//! - Data loading from local CSV files or a remote `PriceProvider`
//! - Cleaning (dedupe, drop missing close, chronological order)
//! - Technical-indicator features (moving averages, volatility, returns, lags)
//! - OLS regression with a chronological train/test split
//!
//! Stage outputs are persisted as CSV files between runs (see [`pipeline`]).

pub mod clean;
pub mod config;
pub mod data;
pub mod domain;
pub mod features;
pub mod indicators;
pub mod model;
pub mod pipeline;
