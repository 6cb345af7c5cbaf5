//! PriceCast CLI: run the pipeline stages and the prediction service.
//!
//! Commands:
//! - `download`: fetch daily prices from Yahoo Finance (or the synthetic generator) to the raw CSV
//! - `clean`: dedupe, drop missing closes and sort the raw CSV
//! - `features`: add moving averages, volatility, returns and lags
//! - `train`: fit the regression model and report test-set MAE/RMSE
//! - `run`: all four stages in order
//! - `serve`: start the HTTP prediction service
//!
//! Paths and defaults come from `--config` (TOML) and can be overridden per command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricecast_core::config::PipelineConfig;
use pricecast_core::data::{Period, PriceProvider, SyntheticProvider, YahooProvider};
use pricecast_core::model::TrainReport;
use pricecast_core::pipeline::{clean_stage, download_stage, features_stage, run_all, train_stage};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "pricecast",
    about = "PriceCast: stock price pipeline and prediction service"
)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily prices and save them as the raw CSV.
    Download {
        /// Ticker symbol (e.g., AAPL).
        #[arg(long)]
        symbol: Option<String>,

        /// History window: 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max.
        #[arg(long)]
        period: Option<Period>,

        /// Output CSV path.
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Clean the raw CSV.
    Clean {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add technical-indicator columns to the cleaned CSV.
    Features {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Train the regression model on the feature CSV.
    Train {
        #[arg(long)]
        input: Option<PathBuf>,

        /// Share of rows held out for evaluation, taken from the end.
        #[arg(long)]
        test_fraction: Option<f64>,
    },
    /// Run download, clean, features and train in sequence.
    Run {
        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        period: Option<Period>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Start the HTTP prediction service.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Generate a seeded random walk instead of calling Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for --synthetic.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl SourceArgs {
    fn provider(&self) -> Result<Box<dyn PriceProvider>> {
        if self.synthetic {
            Ok(Box::new(SyntheticProvider::ending_today(self.seed)))
        } else {
            Ok(Box::new(YahooProvider::new()?))
        }
    }
}

fn main() -> Result<()> {
    // Directive targets match by prefix, so this covers pricecast_core and pricecast_server.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env().add_directive("pricecast=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Download {
            symbol,
            period,
            out,
            source,
        } => {
            apply_source_overrides(&mut config, symbol, period);
            let raw_path = out.unwrap_or(config.data.raw_path);
            let provider = source.provider()?;
            let tag = provider.source();
            let rows = download_stage(
                provider.as_ref(),
                &config.data.symbol,
                config.data.period,
                &raw_path,
            )?;
            println!(
                "Downloaded {rows} {tag} rows for {} ({}) to {}",
                config.data.symbol,
                config.data.period,
                raw_path.display()
            );
        }
        Commands::Clean { input, output } => {
            let input = input.unwrap_or(config.data.raw_path);
            let output = output.unwrap_or(config.data.cleaned_path);
            let rows = clean_stage(&input, &output)?;
            println!("Cleaned data: {rows} rows saved to {}", output.display());
        }
        Commands::Features { input, output } => {
            let input = input.unwrap_or(config.data.cleaned_path);
            let output = output.unwrap_or(config.data.features_path);
            let rows = features_stage(&input, &output)?;
            println!("Features: {rows} rows saved to {}", output.display());
        }
        Commands::Train {
            input,
            test_fraction,
        } => {
            if let Some(f) = test_fraction {
                config.model.test_fraction = f;
                config.validate()?;
            }
            let input = input.unwrap_or(config.data.features_path);
            let report = train_stage(&input, &config.model)?;
            print_report(&report);
        }
        Commands::Run {
            symbol,
            period,
            source,
        } => {
            apply_source_overrides(&mut config, symbol, period);
            let provider = source.provider()?;
            let summary = run_all(provider.as_ref(), &config)?;
            println!(
                "Pipeline ({}): {} raw, {} cleaned, {} feature rows",
                summary.source,
                summary.raw_rows,
                summary.cleaned_rows,
                summary.feature_rows
            );
            if summary.source.is_synthetic() {
                println!("Note: synthetic prices, not market data");
            }
            print_report(&summary.report);
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            // Stages use reqwest's blocking client, so the runtime only exists for `serve`.
            let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            runtime.block_on(pricecast_server::serve(&config.server))?;
        }
    }

    Ok(())
}

fn apply_source_overrides(
    config: &mut PipelineConfig,
    symbol: Option<String>,
    period: Option<Period>,
) {
    if let Some(symbol) = symbol {
        config.data.symbol = symbol;
    }
    if let Some(period) = period {
        config.data.period = period;
    }
}

fn print_report(report: &TrainReport) {
    let eval = &report.evaluation;
    println!();
    println!("=== Model Evaluation ===");
    println!("Train rows: {}", eval.n_train);
    println!("Test rows:  {}", eval.n_test);
    if let (Some(start), Some(end)) = (eval.test_start, eval.test_end) {
        println!("Test range: {start} to {end}");
    }
    println!("MAE:  {:.4}", eval.mae);
    println!("RMSE: {:.4}", eval.rmse);
    if let Some(intercept) = report.model.intercept() {
        println!("Intercept: {intercept:.6}");
    }
    for (name, coef) in report.named_coefficients() {
        println!("  {name:<11} {coef:>12.6}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_download_overrides() {
        let cli = Cli::try_parse_from([
            "pricecast",
            "download",
            "--symbol",
            "MSFT",
            "--period",
            "1y",
            "--synthetic",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Download {
                symbol,
                period,
                source,
                ..
            } => {
                assert_eq!(symbol.as_deref(), Some("MSFT"));
                assert_eq!(period, Some(Period::OneYear));
                assert!(source.synthetic);
                assert_eq!(source.seed, 7);
            }
            _ => panic!("expected download"),
        }
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(Cli::try_parse_from(["pricecast", "run", "--period", "3w"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["pricecast", "serve", "--config", "p.toml", "--port", "8080"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));
    }
}
