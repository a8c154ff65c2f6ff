//! Cache-aware fetching
//!
//! `fetch_with_cache` is the one path every cacheable read takes: serve a
//! fresh entry if there is one, otherwise run the fetch and remember only
//! successful results.

use std::future::Future;

use super::ResponseCache;

/// Returns the cached value for `key`, or fetches, caches and returns it
///
/// On a hit `fetch_fn` is never called. On a miss `fetch_fn(key)` runs once;
/// a success is stored under `key` before being returned, a failure is
/// returned untouched and leaves the cache as it was, so the next call with
/// the same key fetches again.
///
/// # Arguments
/// * `cache` - The shared response cache
/// * `key` - Fully resolved request URL
/// * `fetch_fn` - Resolves the key to a value or a failure
pub async fn fetch_with_cache<V, E, F, Fut>(
    cache: &ResponseCache<V>,
    key: &str,
    fetch_fn: F,
) -> Result<V, E>
where
    V: Clone + Send + 'static,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(entry) = cache.get(key) {
        tracing::debug!(key, "cache hit");
        return Ok(entry.value);
    }

    tracing::debug!(key, "cache miss");
    let value = fetch_fn(key.to_string()).await?;
    cache.put(key, value.clone());

    Ok(value)
}
