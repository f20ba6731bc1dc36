//! Integration tests for the health endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use storyloom_test_support::{FailingGenerator, ScriptedGenerator};

#[tokio::test]
async fn test_health_check_returns_ok_before_any_story() {
    let app = common::build_test_app(Arc::new(FailingGenerator));

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["story_live"], false);
}

#[tokio::test]
async fn test_health_check_reports_live_story_after_reset() {
    let app = common::build_test_app(Arc::new(ScriptedGenerator::new([
        " Smoke drifts over the trees.",
    ])));
    common::get_json(app.clone(), "/reset").await;

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["story_live"], true);
}
