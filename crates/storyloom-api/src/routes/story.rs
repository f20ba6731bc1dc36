//! Routes for playing the live story.
//!
//! Every text-returning endpoint answers with a JSON string.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use storyloom_story::application::query_handlers::SessionView;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Form body for POST /act.
#[derive(Debug, Deserialize)]
pub struct ActForm {
    /// The player's raw input. Missing means the empty action.
    #[serde(default)]
    pub action: String,
}

/// GET /chunk
#[instrument(skip(state))]
async fn chunk(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    Ok(Json(state.manager.current_chunk().await?))
}

/// POST /act
#[instrument(skip(state, form), fields(action_len = form.action.len()))]
async fn act(
    State(state): State<AppState>,
    Form(form): Form<ActForm>,
) -> Result<Json<String>, ApiError> {
    Ok(Json(state.manager.act(form.action).await?))
}

/// GET /reset
#[instrument(skip(state))]
async fn reset(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    let story_start = state.start_curated_story().await?;
    info!("story reset");
    Ok(Json(story_start))
}

/// GET /revert
#[instrument(skip(state))]
async fn revert(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    Ok(Json(state.manager.revert().await?))
}

/// GET /retry
#[instrument(skip(state))]
async fn retry(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    Ok(Json(state.manager.retry().await?))
}

/// GET /transcript
#[instrument(skip(state))]
async fn transcript(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    Ok(Json(state.manager.transcript().await?))
}

/// GET /session
#[instrument(skip(state))]
async fn session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.manager.session_view().await?))
}

/// Returns the router for the story surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chunk", get(chunk))
        .route("/act", post(act))
        .route("/reset", get(reset))
        .route("/revert", get(revert))
        .route("/retry", get(retry))
        .route("/transcript", get(transcript))
        .route("/session", get(session))
}
