//! Application state and command handlers for the Pokedex
//!
//! `App` owns the session state and holds the shared response cache and API
//! capability. Each handler runs to completion before the next command is
//! read, and every data-fetching handler reads through `fetch_with_cache`.

use std::io::{self, Write};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::cache::{fetch_with_cache, ResponseCache};
use crate::commands::Command;
use crate::data::{ApiError, Endpoints, LocationArea, LocationPage, Payload, PokeApi, Pokemon};
use crate::session::{PageDirection, Session};

/// Errors a single command can end with
///
/// None of these stop the REPL; they are reported and the loop carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The fetch layer failed; the message is shown as-is
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing command output failed
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// A command that needs an argument was run without one
    #[error("Usage: {command} <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

/// What the REPL should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Probability of a catch succeeding for the given base experience
///
/// Weak Pokemon (low base experience) are easy, strong ones get harder.
pub fn catch_chance(base_experience: u32) -> f64 {
    1.0 / (1.0 + f64::from(base_experience) / 100.0)
}

/// Main application struct managing state and data
pub struct App {
    /// Pagination cursors and caught Pokemon
    pub session: Session,
    /// Response cache shared for the life of the process
    cache: Arc<ResponseCache<Payload>>,
    /// Fetch capability behind the cache
    api: Box<dyn PokeApi>,
    /// Builds the request URLs used as cache keys
    endpoints: Endpoints,
    /// Source of catch rolls
    rng: StdRng,
}

impl App {
    /// Creates a new App with a fresh session
    ///
    /// # Arguments
    /// * `api` - The fetch capability
    /// * `cache` - The process-wide response cache
    /// * `endpoints` - Base URLs for request keys
    pub fn new(
        api: Box<dyn PokeApi>,
        cache: Arc<ResponseCache<Payload>>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            session: Session::new(),
            cache,
            api,
            endpoints,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the catch RNG, for reproducible runs
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// The shared response cache
    pub fn cache(&self) -> &ResponseCache<Payload> {
        &self.cache
    }

    /// Runs one command, writing user-facing output to `out`
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        args: &[String],
        out: &mut W,
    ) -> Result<Flow, CommandError> {
        match command {
            Command::Help => self.help(out),
            Command::Exit => self.exit(out),
            Command::Map => self.page(PageDirection::Forward, out).await,
            Command::MapBack => self.page(PageDirection::Backward, out).await,
            Command::Explore => {
                let area = required_arg(command, args)?;
                self.explore(area, out).await
            }
            Command::Catch => {
                let name = required_arg(command, args)?;
                self.catch(name, out).await
            }
            Command::Inspect => {
                let name = required_arg(command, args)?;
                self.inspect(name, out)
            }
            Command::Pokedex => self.pokedex(out),
        }
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<Flow, CommandError> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for command in Command::all() {
            match command.argument() {
                Some(arg) => writeln!(out, "{} <{}>: {}", command.name(), arg, command.description())?,
                None => writeln!(out, "{}: {}", command.name(), command.description())?,
            }
        }
        Ok(Flow::Continue)
    }

    fn exit<W: Write>(&self, out: &mut W) -> Result<Flow, CommandError> {
        writeln!(out, "Closing the Pokedex... Goodbye!")?;
        self.cache.stop_reaping();
        Ok(Flow::Exit)
    }

    /// One step through the location listing in `direction`
    async fn page<W: Write>(
        &mut self,
        direction: PageDirection,
        out: &mut W,
    ) -> Result<Flow, CommandError> {
        let first_page = self.endpoints.first_locations_page();
        let Some(key) = self.session.cursor.key_for(direction, &first_page) else {
            writeln!(out, "You're on the first page. Use the `map` command instead.")?;
            return Ok(Flow::Continue);
        };

        let page = self.fetch_locations(&key).await?;
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }

        self.session.cursor.advance(&page);
        Ok(Flow::Continue)
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<Flow, CommandError> {
        writeln!(out, "Exploring {area}...")?;

        let key = self.endpoints.location_area(area);
        let area = self.fetch_location_area(&key).await?;

        if area.pokemon_encounters.is_empty() {
            writeln!(out, "No Pokemon found.")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "Found Pokemon:")?;
        for encounter in &area.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        Ok(Flow::Continue)
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<Flow, CommandError> {
        let name = name.to_lowercase();
        writeln!(out, "Throwing a Pokeball at {name}...")?;

        let key = self.endpoints.pokemon(&name);
        let pokemon = self.fetch_pokemon(&key).await?;

        let roll: f64 = self.rng.gen();
        if roll < catch_chance(pokemon.base_experience) {
            writeln!(out, "{} was caught!", pokemon.name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            tracing::info!(pokemon = %pokemon.name, "caught");
            self.session.record_catch(pokemon);
        } else {
            writeln!(out, "{} escaped!", pokemon.name)?;
        }
        Ok(Flow::Continue)
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<Flow, CommandError> {
        let Some(caught) = self.session.caught(name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(Flow::Continue);
        };

        let pokemon = &caught.pokemon;
        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        writeln!(out, "Caught at: {}", caught.caught_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        Ok(Flow::Continue)
    }

    fn pokedex<W: Write>(&self, out: &mut W) -> Result<Flow, CommandError> {
        let names = self.session.caught_names();
        if names.is_empty() {
            writeln!(out, "Your Pokedex is empty. Try the catch command.")?;
            return Ok(Flow::Continue);
        }

        writeln!(out, "Your Pokedex:")?;
        for name in names {
            writeln!(out, " - {name}")?;
        }
        Ok(Flow::Continue)
    }

    async fn fetch_locations(&self, key: &str) -> Result<LocationPage, ApiError> {
        let api = self.api.as_ref();
        let payload = fetch_with_cache(self.cache(), key, |url| async move {
            api.fetch_locations(&url).await.map(Payload::Locations)
        })
        .await?;
        payload.try_into()
    }

    async fn fetch_location_area(&self, key: &str) -> Result<LocationArea, ApiError> {
        let api = self.api.as_ref();
        let payload = fetch_with_cache(self.cache(), key, |url| async move {
            api.fetch_location_area(&url).await.map(Payload::LocationArea)
        })
        .await?;
        payload.try_into()
    }

    async fn fetch_pokemon(&self, key: &str) -> Result<Pokemon, ApiError> {
        let api = self.api.as_ref();
        let payload = fetch_with_cache(self.cache(), key, |url| async move {
            api.fetch_pokemon(&url).await.map(Payload::Pokemon)
        })
        .await?;
        payload.try_into()
    }
}

fn required_arg<'a>(command: Command, args: &'a [String]) -> Result<&'a str, CommandError> {
    args.first()
        .map(String::as_str)
        .ok_or(CommandError::MissingArgument {
            command: command.name(),
            argument: command.argument().unwrap_or("argument"),
        })
}
