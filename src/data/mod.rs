//! Core data models for the Pokedex
//!
//! This module contains the PokeAPI response shapes the commands consume,
//! and the `Payload` union stored in the shared response cache.

pub mod pokeapi;

pub use pokeapi::{ApiError, Endpoints, PokeApi, PokeApiClient};

use serde::{Deserialize, Serialize};

/// A named link to another API resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the location-area listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPage {
    /// Total number of location areas across all pages
    pub count: u32,
    /// URL of the following page, if any
    pub next: Option<String>,
    /// URL of the preceding page, if any
    pub previous: Option<String>,
    /// Location areas on this page, in API order
    pub results: Vec<NamedResource>,
}

/// A single location area and the Pokemon that can be encountered there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    pub id: u32,
    pub name: String,
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// A Pokemon species entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating it; also drives how hard it is to catch
    pub base_experience: u32,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// Every response shape the cache can hold
///
/// Keys are full request URLs, so a given key only ever maps to one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Locations(LocationPage),
    LocationArea(LocationArea),
    Pokemon(Pokemon),
}

impl Payload {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Locations(_) => "location page",
            Payload::LocationArea(_) => "location area",
            Payload::Pokemon(_) => "pokemon",
        }
    }
}

impl TryFrom<Payload> for LocationPage {
    type Error = ApiError;

    fn try_from(payload: Payload) -> Result<Self, Self::Error> {
        match payload {
            Payload::Locations(page) => Ok(page),
            other => Err(ApiError::UnexpectedPayload {
                expected: "location page",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Payload> for LocationArea {
    type Error = ApiError;

    fn try_from(payload: Payload) -> Result<Self, Self::Error> {
        match payload {
            Payload::LocationArea(area) => Ok(area),
            other => Err(ApiError::UnexpectedPayload {
                expected: "location area",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Payload> for Pokemon {
    type Error = ApiError;

    fn try_from(payload: Payload) -> Result<Self, Self::Error> {
        match payload {
            Payload::Pokemon(pokemon) => Ok(pokemon),
            other => Err(ApiError::UnexpectedPayload {
                expected: "pokemon",
                found: other.kind(),
            }),
        }
    }
}
