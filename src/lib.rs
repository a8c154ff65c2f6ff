//! Pokedex CLI Library
//!
//! This module exposes the cache, fetch layer, session state and REPL for use
//! by the binary and in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod data;
pub mod logging;
pub mod repl;
pub mod session;
