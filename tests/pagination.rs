//! Integration tests for the cached request cycle
//!
//! Drives the public `App` with an in-memory `PokeApi` that records every
//! URL it is asked for, to check which requests reach the fetch layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use pokedex::app::{App, Flow};
use pokedex::cache::{fetch_with_cache, ResponseCache};
use pokedex::commands::Command;
use pokedex::data::{
    ApiError, Endpoints, LocationArea, LocationPage, NamedResource, PokeApi, Pokemon,
};

const FIRST: &str = "http://localhost:9999/location-area?limit=20";

/// Serves canned location pages and records requested URLs
#[derive(Default)]
struct RecordingApi {
    pages: HashMap<String, LocationPage>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl PokeApi for RecordingApi {
    fn fetch_locations<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<LocationPage, ApiError>> {
        self.calls.lock().push(url.to_string());
        let result = self.pages.get(url).cloned().ok_or(ApiError::Status(404));
        async move { result }.boxed()
    }

    fn fetch_location_area<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<LocationArea, ApiError>> {
        self.calls.lock().push(url.to_string());
        async { Err(ApiError::Status(404)) }.boxed()
    }

    fn fetch_pokemon<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Pokemon, ApiError>> {
        self.calls.lock().push(url.to_string());
        async { Err(ApiError::Status(404)) }.boxed()
    }
}

fn page(next: Option<&str>, previous: Option<&str>, names: &[&str]) -> LocationPage {
    LocationPage {
        count: 3,
        next: next.map(str::to_string),
        previous: previous.map(str::to_string),
        results: names
            .iter()
            .map(|name| NamedResource {
                name: name.to_string(),
                url: format!("http://localhost:9999/location-area/{name}/"),
            })
            .collect(),
    }
}

fn build_app(api: RecordingApi) -> (App, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::clone(&api.calls);
    let cache = Arc::new(ResponseCache::new(Duration::from_millis(500)));
    let endpoints = Endpoints::new(
        "http://localhost:9999/location-area",
        "http://localhost:9999/pokemon",
    );
    (App::new(Box::new(api), cache, endpoints), calls)
}

async fn run(app: &mut App, command: Command) -> String {
    let mut out = Vec::new();
    let flow = app.execute(command, &[], &mut out).await.expect("command should succeed");
    assert_eq!(flow, Flow::Continue);
    String::from_utf8(out).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_second_forward_step_requests_next_cursor() {
    let mut api = RecordingApi::default();
    api.pages.insert(FIRST.to_string(), page(Some("B"), None, &["area-1"]));
    api.pages.insert("B".to_string(), page(None, Some(FIRST), &["area-2"]));
    let (mut app, calls) = build_app(api);

    run(&mut app, Command::Map).await;
    let output = run(&mut app, Command::Map).await;

    assert_eq!(output, "area-2\n");
    assert_eq!(*calls.lock(), vec![FIRST.to_string(), "B".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_backward_step_without_previous_makes_no_request() {
    let (mut app, calls) = build_app(RecordingApi::default());

    let output = run(&mut app, Command::MapBack).await;

    assert!(output.contains("first page"));
    assert!(calls.lock().is_empty());
    assert!(app.session.cursor.previous.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_step_hits_cache_and_reproduces_cursors() {
    let mut api = RecordingApi::default();
    api.pages.insert(FIRST.to_string(), page(Some("B"), None, &["area-1"]));
    api.pages.insert("B".to_string(), page(Some("C"), Some(FIRST), &["area-2"]));
    let (mut app, calls) = build_app(api);

    run(&mut app, Command::Map).await;
    run(&mut app, Command::Map).await;
    let cursor_after_forward = app.session.cursor.clone();

    run(&mut app, Command::MapBack).await;
    let output = run(&mut app, Command::Map).await;

    assert_eq!(output, "area-2\n");
    assert_eq!(app.session.cursor, cursor_after_forward);
    assert_eq!(calls.lock().len(), 2, "revisited pages should come from the cache");
}

#[tokio::test(start_paused = true)]
async fn test_page_is_refetched_once_reaped() {
    let mut api = RecordingApi::default();
    api.pages.insert(FIRST.to_string(), page(Some("B"), None, &["area-1"]));
    api.pages.insert("B".to_string(), page(None, Some(FIRST), &["area-2"]));
    let (mut app, calls) = build_app(api);

    run(&mut app, Command::Map).await;
    run(&mut app, Command::Map).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    run(&mut app, Command::MapBack).await;

    assert_eq!(calls.lock().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_with_cache_second_call_within_window_is_silent() {
    let cache: ResponseCache<String> = ResponseCache::new(Duration::from_millis(500));
    let calls = Arc::new(Mutex::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let value = fetch_with_cache(&cache, "u", move |_| async move {
            *calls.lock() += 1;
            Ok::<_, ApiError>("x".to_string())
        })
        .await
        .unwrap();
        assert_eq!(value, "x");
    }

    assert_eq!(*calls.lock(), 1);
}
