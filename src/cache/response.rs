//! In-memory response cache with a background reaper
//!
//! Provides a `ResponseCache` that stores API payloads keyed by their fully
//! resolved request URL. A tokio task sweeps the map on a fixed period and
//! drops every entry that has been cached for at least that period.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::{self, Instant};

/// A cached payload together with the moment it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// When the payload was put into the cache
    pub cached_at: Instant,
    /// The cached payload
    pub value: V,
}

type Entries<V> = Arc<Mutex<HashMap<String, CacheEntry<V>>>>;

/// Shared response cache with time-based eviction
///
/// Every entry lives for at least `reap_delay` and is removed by the first
/// sweep that finds it at least that old. Since sweeps also run every
/// `reap_delay`, an entry is observable for somewhere between one and two
/// delays after its last `put`.
///
/// Reads never refresh an entry's age.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Entries<V>,
    reap_delay: Duration,
    /// Signals the reaper task to stop; `None` once reaping has been stopped
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + 'static,
{
    /// Creates an empty cache and spawns its reaper task
    ///
    /// # Arguments
    /// * `reap_delay` - Minimum entry lifetime, also used as the sweep period
    ///
    /// # Panics
    /// Panics if `reap_delay` is zero or if called outside a tokio runtime.
    pub fn new(reap_delay: Duration) -> Self {
        let entries: Entries<V> = Arc::new(Mutex::new(HashMap::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        // First sweep one full delay after construction, not immediately
        let mut interval = time::interval_at(Instant::now() + reap_delay, reap_delay);
        let reaper_entries = Arc::clone(&entries);

        tokio::spawn(async move {
            tracing::debug!(?reap_delay, "cache reaper started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        reap(&reaper_entries, reap_delay);
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }

            tracing::debug!("cache reaper stopped");
        });

        Self {
            entries,
            reap_delay,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            cached_at: Instant::now(),
            value,
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Returns a copy of the entry stored under `key`, if it has not been reaped
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.lock().get(key).cloned()
    }

    /// Stops the background reaper
    ///
    /// Calling this more than once is a no-op. Entries already in the cache
    /// stay there and `get`/`put` keep working, but nothing is evicted anymore.
    pub fn stop_reaping(&self) {
        if let Some(tx) = self.shutdown_tx.lock().take() {
            // The task may already be gone if the runtime shut down first
            let _ = tx.send(());
        }
    }

    /// Whether the reaper is still scheduled
    pub fn is_reaping(&self) -> bool {
        self.shutdown_tx.lock().is_some()
    }

    /// The configured minimum entry lifetime
    pub fn reap_delay(&self) -> Duration {
        self.reap_delay
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<V> Drop for ResponseCache<V> {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.get_mut().take() {
            let _ = tx.send(());
        }
    }
}

/// Removes every entry aged at least `reap_delay`, holding the lock for the whole sweep
fn reap<V>(entries: &Mutex<HashMap<String, CacheEntry<V>>>, reap_delay: Duration) {
    let now = Instant::now();
    let mut entries = entries.lock();
    let before = entries.len();

    entries.retain(|_, entry| now.duration_since(entry.cached_at) < reap_delay);

    let reaped = before - entries.len();
    if reaped > 0 {
        tracing::trace!(reaped, remaining = entries.len(), "cache sweep");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_put_then_get_returns_value() {
        let cache = ResponseCache::new(DELAY);

        cache.put("u", json!({ "data": "x" }));

        let entry = cache.get("u").expect("entry should be present");
        assert_eq!(entry.value, json!({ "data": "x" }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_missing_key_returns_none() {
        let cache: ResponseCache<Value> = ResponseCache::new(DELAY);

        assert!(cache.get("never-stored").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_overwrites_existing_entry() {
        let cache = ResponseCache::new(DELAY);

        cache.put("u", json!("first"));
        cache.put("u", json!("second"));

        assert_eq!(cache.get("u").unwrap().value, json!("second"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_entry_reaped_after_wait() {
        let cache = ResponseCache::new(Duration::from_millis(500));
        cache.put("u", json!({ "data": "x" }));

        assert_eq!(cache.get("u").unwrap().value, json!({ "data": "x" }));

        time::sleep(Duration::from_millis(800)).await;

        assert!(cache.get("u").is_none(), "entry should be reaped after 800ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_never_reaped_before_delay() {
        let cache = ResponseCache::new(DELAY);

        // Insert just before the first sweep so it survives that sweep
        time::sleep(Duration::from_millis(400)).await;
        cache.put("late", json!(1));

        // First sweep (t=500) sees age 100, second (t=1000) sees age 600
        time::sleep(DELAY - Duration::from_millis(1)).await;
        assert!(cache.get("late").is_some(), "entry younger than delay must survive");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_reaped_within_two_delays() {
        let cache = ResponseCache::new(DELAY);

        time::sleep(Duration::from_millis(400)).await;
        cache.put("late", json!(1));

        time::sleep(DELAY * 2 + Duration::from_millis(10)).await;
        assert!(cache.get("late").is_none(), "entry older than two delays must be gone");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_does_not_extend_lifetime() {
        let cache = ResponseCache::new(DELAY);
        cache.put("u", json!(1));

        for _ in 0..4 {
            time::sleep(Duration::from_millis(100)).await;
            assert!(cache.get("u").is_some());
        }

        time::sleep(Duration::from_millis(200)).await;
        assert!(cache.get("u").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reput_restarts_lifetime() {
        let cache = ResponseCache::new(DELAY);
        cache.put("u", json!("old"));

        time::sleep(Duration::from_millis(300)).await;
        cache.put("u", json!("new"));

        // Sweep at t=500 sees age 200 for the re-put entry
        time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.get("u").unwrap().value, json!("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_reaping_prevents_eviction() {
        let cache = ResponseCache::new(DELAY);
        cache.put("u", json!(1));

        cache.stop_reaping();
        assert!(!cache.is_reaping());

        time::sleep(DELAY * 4).await;
        assert!(cache.get("u").is_some(), "no eviction after stop_reaping");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_reaping_is_idempotent() {
        let cache = ResponseCache::new(DELAY);

        cache.stop_reaping();
        cache.stop_reaping();
        assert!(!cache.is_reaping());

        // Cache stays usable after stopping
        cache.put("after", json!(2));
        time::sleep(DELAY * 3).await;
        assert_eq!(cache.get("after").unwrap().value, json!(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_at_is_recorded_on_put() {
        let cache = ResponseCache::new(DELAY);

        let before = Instant::now();
        cache.put("u", json!(1));

        let entry = cache.get("u").unwrap();
        assert!(entry.cached_at >= before);
        assert!(entry.cached_at <= Instant::now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_instances_reap_independently() {
        let short = ResponseCache::new(Duration::from_millis(100));
        let long = ResponseCache::new(Duration::from_secs(10));

        short.put("u", json!(1));
        long.put("u", json!(1));

        time::sleep(Duration::from_millis(250)).await;
        assert!(short.get("u").is_none());
        assert!(long.get("u").is_some());
    }

    #[tokio::test]
    async fn test_reap_delay_is_reported() {
        let cache: ResponseCache<Value> = ResponseCache::new(DELAY);

        assert_eq!(cache.reap_delay(), DELAY);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_survive_sweeps() {
        // Tiny delay on the real clock so sweeps run while the workers put
        let delay = Duration::from_millis(5);
        let cache = Arc::new(ResponseCache::new(delay));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    for i in 0..2000 {
                        let key = format!("{t}-{i}");
                        let put_at = Instant::now();
                        cache.put(key.clone(), json!(i));

                        match cache.get(&key) {
                            Some(entry) => assert_eq!(entry.value, json!(i)),
                            // Only a sweep after the entry aged past the delay may remove it
                            None => assert!(
                                put_at.elapsed() >= delay,
                                "entry {key} reaped while younger than the delay"
                            ),
                        }

                        if i % 100 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        time::sleep(Duration::from_millis(30)).await;
        assert!(cache.is_empty(), "every entry should be reaped after the puts stop");
    }
}
