//! Session state shared by every command
//!
//! Holds the location-listing cursors and the set of caught Pokemon. Both
//! live for the whole process; cursors are only moved by `map`/`mapb` and
//! the caught set only grows through `catch`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::data::{LocationPage, Pokemon};

/// Direction of a pagination step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Forward,
    Backward,
}

/// Next/previous cursors for the location listing
///
/// Starts out with neither cursor set; a forward step from there requests
/// the default first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageCursor {
    /// Resolves the request key for a step in `direction`
    ///
    /// Forward falls back to `first_page` when there is no next cursor.
    /// Backward returns `None` when there is no previous cursor, meaning the
    /// step must not make any request.
    pub fn key_for(&self, direction: PageDirection, first_page: &str) -> Option<String> {
        match direction {
            PageDirection::Forward => Some(
                self.next
                    .clone()
                    .unwrap_or_else(|| first_page.to_string()),
            ),
            PageDirection::Backward => self.previous.clone(),
        }
    }

    /// Replaces both cursors with the links from a fetched page
    pub fn advance(&mut self, page: &LocationPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
    }
}

/// A Pokemon the user has caught
#[derive(Debug, Clone, PartialEq)]
pub struct CaughtPokemon {
    pub pokemon: Pokemon,
    pub caught_at: DateTime<Utc>,
}

/// Per-process session state
#[derive(Debug, Default)]
pub struct Session {
    /// Cursors for the location listing
    pub cursor: PageCursor,
    /// Caught Pokemon keyed by lower-cased name
    caught: HashMap<String, CaughtPokemon>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pokemon` as caught, replacing an earlier catch of the same name
    pub fn record_catch(&mut self, pokemon: Pokemon) {
        let key = pokemon.name.to_lowercase();
        self.caught.insert(
            key,
            CaughtPokemon {
                pokemon,
                caught_at: Utc::now(),
            },
        );
    }

    /// Looks up a caught Pokemon, ignoring case
    pub fn caught(&self, name: &str) -> Option<&CaughtPokemon> {
        self.caught.get(&name.to_lowercase())
    }

    /// Names of every caught Pokemon, sorted
    pub fn caught_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caught.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn caught_count(&self) -> usize {
        self.caught.len()
    }
}
