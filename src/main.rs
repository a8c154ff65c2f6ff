//! Pokedex CLI - explore location areas and catch Pokemon from the terminal
//!
//! An interactive REPL over the PokeAPI. Responses are cached in memory for
//! the configured interval so revisiting a page or Pokemon is instant.

use std::io;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use pokedex::app::App;
use pokedex::cache::ResponseCache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::data::PokeApiClient;
use pokedex::{logging, repl};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    logging::init(&config.log_level);
    tracing::debug!(?config, "starting");

    // One cache for the whole process, shared with every command
    let cache = Arc::new(ResponseCache::new(config.reap_delay));
    tracing::debug!(reap_delay = ?cache.reap_delay(), "response cache ready");
    let mut app = App::new(Box::new(PokeApiClient::new()), cache, config.endpoints);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    repl::run(&mut app, stdin, &mut stdout, &config.prompt).await?;

    Ok(())
}
