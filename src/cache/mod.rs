//! Cache module for API responses
//!
//! This module provides the process-wide response cache, keyed by fully
//! resolved request URL and emptied by a background reaper, plus the
//! `fetch_with_cache` helper every command uses to read through it.

mod fetch;
mod response;

pub use fetch::fetch_with_cache;
pub use response::{CacheEntry, ResponseCache};
