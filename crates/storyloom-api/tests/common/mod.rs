//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storyloom_content::domain::story_data::StoryData;
use storyloom_core::clock::Clock;
use storyloom_core::generator::TextGenerator;
use storyloom_core::rng::DeterministicRng;
use storyloom_story::application::manager::SessionManager;
use storyloom_story::config::EngineConfig;
use storyloom_test_support::{FixedClock, MockRng};
use tower::ServiceExt;

use storyloom_api::state::AppState;

/// One fallback character, so `MockRng` always yields the same opening.
pub const STORY_DATA: &str = r#"
settings:
  fantasy:
    description: "living in Larion. "
    characters:
      ranger:
        item1: longbow
        item2: hunting knife
        prompts:
          camp: "You wake beside a dying campfire."
    grammar:
      name: ["{first} {last}"]
      first: [Aric]
      last: [Hale]
"#;

/// Context composed for the ranger above.
pub const RANGER_CONTEXT: &str =
    "You are Aric Hale, a ranger living in Larion. You have a longbow and a hunting knife. ";

/// Prompt composed for the ranger above.
pub const RANGER_PROMPT: &str = "You wake beside a dying campfire.";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router around `backend` with a generous deadline.
pub fn build_test_app(backend: Arc<dyn TextGenerator>) -> Router {
    build_test_app_with_deadline(backend, Duration::from_secs(5))
}

/// Build the full app router around `backend` with a custom deadline.
pub fn build_test_app_with_deadline(backend: Arc<dyn TextGenerator>, deadline: Duration) -> Router {
    let config = EngineConfig {
        deadline,
        ..EngineConfig::default()
    };
    let manager = Arc::new(SessionManager::new(config, backend, fixed_clock()));
    let story_data = Arc::new(StoryData::from_yaml_str(STORY_DATA).unwrap());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));

    storyloom_api::router(AppState::new(manager, story_data, rng, "fantasy"))
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a url-encoded form body and return the response.
pub async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
