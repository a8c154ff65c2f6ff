//! PokeAPI client
//!
//! This module provides the `PokeApi` fetch capability, its reqwest-backed
//! implementation, and the `Endpoints` that turn names into request URLs.
//! Request URLs double as cache keys, so they are built in exactly one place.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{LocationArea, LocationPage, Pokemon};

/// Default base URL for the location-area endpoint
pub const DEFAULT_LOCATION_URL: &str = "https://pokeapi.co/api/v2/location-area";

/// Default base URL for the pokemon endpoint
pub const DEFAULT_POKEMON_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Number of location areas requested per page
const PAGE_SIZE: u32 = 20;

/// Errors that can occur when fetching from the PokeAPI
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure
    #[error("Unexpected failure: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Response failure: HTTP error! Status: {0}")]
    Status(u16),

    /// Body did not match the expected shape
    #[error("Validation failure: {0}")]
    Validation(#[from] serde_json::Error),

    /// A cached payload had a different shape than the caller asked for
    #[error("Unexpected payload: expected {expected}, found {found}")]
    UnexpectedPayload {
        expected: &'static str,
        found: &'static str,
    },
}

/// Capability to resolve a request URL into a typed PokeAPI response
///
/// Implementations perform the actual I/O. Callers go through
/// [`fetch_with_cache`](crate::cache::fetch_with_cache) rather than invoking
/// these directly.
pub trait PokeApi: Send + Sync {
    /// Fetches one page of the location-area listing
    fn fetch_locations<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<LocationPage, ApiError>>;

    /// Fetches a single location area
    fn fetch_location_area<'a>(&'a self, url: &'a str)
        -> BoxFuture<'a, Result<LocationArea, ApiError>>;

    /// Fetches a single Pokemon
    fn fetch_pokemon<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Pokemon, ApiError>>;
}

/// Base URLs the request keys are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    location_url: String,
    pokemon_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_URL, DEFAULT_POKEMON_URL)
    }
}

impl Endpoints {
    /// Creates endpoints from base URLs, dropping any trailing slash
    pub fn new(location_url: impl Into<String>, pokemon_url: impl Into<String>) -> Self {
        Self {
            location_url: trim_slash(location_url.into()),
            pokemon_url: trim_slash(pokemon_url.into()),
        }
    }

    /// Key of the first page of the location listing
    pub fn first_locations_page(&self) -> String {
        format!("{}?limit={}", self.location_url, PAGE_SIZE)
    }

    /// Key of a single location area by name or id
    pub fn location_area(&self, name: &str) -> String {
        format!("{}/{}", self.location_url, name)
    }

    /// Key of a single Pokemon by name or id
    pub fn pokemon(&self, name: &str) -> String {
        format!("{}/{}", self.pokemon_url, name)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Client for the PokeAPI over HTTP
#[derive(Debug, Clone, Default)]
pub struct PokeApiClient {
    client: Client,
}

impl PokeApiClient {
    /// Create a new PokeApiClient with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new PokeApiClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GETs `url` and decodes the body as `T`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        decode(&text)
    }
}

impl PokeApi for PokeApiClient {
    fn fetch_locations<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<LocationPage, ApiError>> {
        self.get_json(url).boxed()
    }

    fn fetch_location_area<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<LocationArea, ApiError>> {
        self.get_json(url).boxed()
    }

    fn fetch_pokemon<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Pokemon, ApiError>> {
        self.get_json(url).boxed()
    }
}

/// Parses a response body into `T`
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(text)?)
}
