//! Command-line interface parsing for the Pokedex
//!
//! This module handles parsing of CLI arguments using clap. Every flag can
//! also be set from the environment, and the parsed flags are validated into
//! a `StartupConfig` before anything is constructed from them.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::pokeapi::{DEFAULT_LOCATION_URL, DEFAULT_POKEMON_URL};
use crate::data::Endpoints;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache interval must be at least one millisecond
    #[error("Invalid cache interval: {0}ms. The interval must be greater than zero")]
    InvalidReapDelay(u64),

    /// A base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Pokedex - explore the Pokemon world from your terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex over the PokeAPI")]
#[command(version)]
pub struct Cli {
    /// How long cached API responses are kept, in milliseconds
    ///
    /// Responses live for at least this long and at most twice this long.
    #[arg(long, env = "CACHE_INTERVAL_MS", default_value_t = 60_000, value_name = "MS")]
    pub cache_interval_ms: u64,

    /// Base URL of the location-area endpoint
    #[arg(long, env = "BASE_LOCATION_URL", default_value = DEFAULT_LOCATION_URL)]
    pub location_url: String,

    /// Base URL of the pokemon endpoint
    #[arg(long, env = "BASE_POKEMON_URL", default_value = DEFAULT_POKEMON_URL)]
    pub pokemon_url: String,

    /// Prompt shown before each command
    #[arg(long, env = "APP_PROMPT", default_value = "Pokedex > ")]
    pub prompt: String,

    /// Log level written to stderr (RUST_LOG overrides it)
    #[arg(long, env = "POKEDEX_LOG", default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Minimum lifetime of cached responses and the reaper's sweep period
    pub reap_delay: Duration,
    /// Base URLs used to build request keys
    pub endpoints: Endpoints,
    /// REPL prompt
    pub prompt: String,
    /// Default log level directive
    pub log_level: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            reap_delay: Duration::from_secs(60),
            endpoints: Endpoints::default(),
            prompt: "Pokedex > ".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Checks that `url` is an absolute http(s) URL
///
/// # Returns
/// * `Ok(())` if the URL has an http or https scheme and a host part
/// * `Err(CliError::InvalidBaseUrl)` otherwise
pub fn validate_base_url(url: &str) -> Result<(), CliError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(CliError::InvalidBaseUrl(url.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` when every value is usable
    /// * `Err(CliError)` for a zero cache interval or a non-http base URL
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_interval_ms == 0 {
            return Err(CliError::InvalidReapDelay(cli.cache_interval_ms));
        }
        validate_base_url(&cli.location_url)?;
        validate_base_url(&cli.pokemon_url)?;

        Ok(StartupConfig {
            reap_delay: Duration::from_millis(cli.cache_interval_ms),
            endpoints: Endpoints::new(cli.location_url.as_str(), cli.pokemon_url.as_str()),
            prompt: cli.prompt.clone(),
            log_level: cli.log_level.clone(),
        })
    }
}
