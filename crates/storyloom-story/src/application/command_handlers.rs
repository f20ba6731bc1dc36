//! Command handlers for the story session engine.
//!
//! Each handler runs one command against a session the caller already holds
//! exclusively. Every failure path leaves the transcript exactly as it was
//! before the call.

use storyloom_core::clock::Clock;
use storyloom_core::command::Command;
use storyloom_core::error::StoryError;
use storyloom_core::generator::GenerationRequest;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::application::gateway::GenerationGateway;
use crate::config::EngineConfig;
use crate::domain::aggregates::{StorySession, Turn, TurnOutcome};
use crate::domain::commands::{Act, Retry, Revert, StartNewStory};
use crate::domain::normalizer;

/// Handles the `StartNewStory` command: generates the opening passage and
/// builds a fresh session around it.
///
/// # Errors
///
/// Returns the gateway error if the opening could not be generated.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_start_new_story(
    command: &StartNewStory,
    config: &EngineConfig,
    clock: &dyn Clock,
    gateway: &GenerationGateway,
) -> Result<StorySession, StoryError> {
    info!(command_type = command.command_type(), "handling command");

    let request = GenerationRequest {
        prompt: command.prompt.clone(),
        context: Some(command.context.clone()),
        budget: command.budget_override.unwrap_or(config.elevated_budget),
    };
    let block = normalizer::clean_result(&gateway.generate(request).await?);
    let story_start = format!("{}{}{block}", command.context, command.prompt);

    let session = StorySession::new(
        Uuid::new_v4(),
        story_start,
        command.context.clone(),
        config.default_budget,
        clock.now(),
    );
    info!(session_id = %session.id, "story started");
    Ok(session)
}

/// Handles the `Act` command: normalises the action, generates its result,
/// and commits the turn unless it repeats the previous one.
///
/// # Errors
///
/// Returns the gateway error if generation fails or times out; the session
/// is left unchanged.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, session_id = %session.id))]
pub async fn handle_act(
    command: &Act,
    session: &mut StorySession,
    config: &EngineConfig,
    gateway: &GenerationGateway,
) -> Result<TurnOutcome, StoryError> {
    info!(command_type = command.command_type(), "handling command");

    let action = normalizer::preprocess(&command.action);
    if normalizer::is_dialogue(&command.action) || normalizer::is_dialogue(&action) {
        session.set_budget_override(config.elevated_budget);
    }

    play_turn(session, action, config, gateway).await
}

/// Handles the `Revert` command: drops the most recent turn.
///
/// # Errors
///
/// Returns `StoryError::EmptyHistory` if there is nothing to revert.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, session_id = %session.id))]
pub fn handle_revert(command: &Revert, session: &mut StorySession) -> Result<Turn, StoryError> {
    info!(command_type = command.command_type(), "handling command");
    session.pop_turn()
}

/// Handles the `Retry` command: drops the most recent turn and plays its
/// action again.
///
/// The stored action is already normalised and is replayed verbatim. If the
/// new generation fails, the dropped turn stays dropped.
///
/// # Errors
///
/// Returns `StoryError::EmptyHistory` if there is nothing to retry, or the
/// gateway error if regeneration fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, session_id = %session.id))]
pub async fn handle_retry(
    command: &Retry,
    session: &mut StorySession,
    config: &EngineConfig,
    gateway: &GenerationGateway,
) -> Result<TurnOutcome, StoryError> {
    info!(command_type = command.command_type(), "handling command");

    let Turn { action, .. } = session.pop_turn()?;
    if normalizer::is_dialogue(&action) {
        session.set_budget_override(config.elevated_budget);
    }

    play_turn(session, action, config, gateway).await
}

/// Generates a result for an already-normalised action and commits it.
async fn play_turn(
    session: &mut StorySession,
    action: String,
    config: &EngineConfig,
    gateway: &GenerationGateway,
) -> Result<TurnOutcome, StoryError> {
    let request = GenerationRequest {
        prompt: session.prompt_for(&action, config.memory),
        context: None,
        budget: session.generation_budget(),
    };
    let generated = gateway.generate(request).await;
    session.reset_budget();

    let result = normalizer::clean_result(&generated?);
    let outcome = session.commit_turn(action, result, config.similarity_threshold);
    if let TurnOutcome::DiscardedAsRepetition { similarity } = outcome {
        warn!(similarity, "discarded repetitive turn");
    }
    Ok(outcome)
}
