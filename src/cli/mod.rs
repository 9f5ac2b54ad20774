//! CLI module for the retrieval pipeline
//!
//! Provides subcommands:
//! - `search`: run one request through the pipeline and print the result
//! - `health`: report per-source health

pub mod health;
pub mod search;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Retrieval Pipeline - multi-source search with ranking and relevance filtering
#[derive(Parser)]
#[command(name = "retrieval-pipeline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a search request through retrieval, ranking and refinement
    Search(search::SearchArgs),

    /// Check every configured source
    Health(health::HealthArgs),
}

/// Load `.env`, configuration and logging for a command
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Parse a flag value with the same names the JSON request uses
fn parse_wire_value<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("invalid value '{}'", value))
}
