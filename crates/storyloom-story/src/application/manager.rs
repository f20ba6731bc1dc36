//! Process-wide holder of the single live story session.

use std::sync::Arc;

use storyloom_core::clock::Clock;
use storyloom_core::error::StoryError;
use storyloom_core::generator::TextGenerator;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::application::gateway::GenerationGateway;
use crate::application::query_handlers::{self, SessionView};
use crate::config::EngineConfig;
use crate::domain::aggregates::StorySession;
use crate::domain::commands::{Act, Retry, Revert, StartNewStory};

/// Owns the live session behind a read/write lock.
///
/// Mutating operations take the write lock for their whole duration,
/// including the bounded generation call, so at most one is in flight.
/// Reads share the read lock and therefore never observe a turn half
/// applied.
pub struct SessionManager {
    config: EngineConfig,
    gateway: GenerationGateway,
    clock: Arc<dyn Clock>,
    session: RwLock<Option<StorySession>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager with no live session.
    #[must_use]
    pub fn new(config: EngineConfig, backend: Arc<dyn TextGenerator>, clock: Arc<dyn Clock>) -> Self {
        let gateway = GenerationGateway::new(backend, config.deadline);
        Self {
            config,
            gateway,
            clock,
            session: RwLock::new(None),
        }
    }

    /// Replaces the live session with a freshly generated story and returns
    /// its opening passage.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the opening could not be generated; any
    /// previously live session is kept.
    pub async fn start_new_story(
        &self,
        prompt: String,
        context: String,
        budget_override: Option<u32>,
    ) -> Result<String, StoryError> {
        let command = StartNewStory {
            correlation_id: Uuid::new_v4(),
            prompt,
            context,
            budget_override,
        };

        let mut slot = self.session.write().await;
        let session = command_handlers::handle_start_new_story(
            &command,
            &self.config,
            self.clock.as_ref(),
            &self.gateway,
        )
        .await?;
        let chunk = query_handlers::get_current_chunk(&session);
        *slot = Some(session);
        Ok(chunk)
    }

    /// Plays one turn and returns the new transcript tail.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is
    /// started, or the gateway error if generation fails.
    pub async fn act(&self, action: String) -> Result<String, StoryError> {
        let command = Act {
            correlation_id: Uuid::new_v4(),
            action,
        };

        let mut slot = self.session.write().await;
        let session = slot.as_mut().ok_or(StoryError::UninitializedSession)?;
        command_handlers::handle_act(&command, session, &self.config, &self.gateway).await?;
        Ok(query_handlers::get_current_chunk(session))
    }

    /// Drops the latest turn and returns the new transcript tail.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is
    /// started, or `StoryError::EmptyHistory` with no turns.
    pub async fn revert(&self) -> Result<String, StoryError> {
        let command = Revert {
            correlation_id: Uuid::new_v4(),
        };

        let mut slot = self.session.write().await;
        let session = slot.as_mut().ok_or(StoryError::UninitializedSession)?;
        command_handlers::handle_revert(&command, session)?;
        Ok(query_handlers::get_current_chunk(session))
    }

    /// Regenerates the latest turn and returns the new transcript tail.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is
    /// started, `StoryError::EmptyHistory` with no turns, or the gateway
    /// error if regeneration fails.
    pub async fn retry(&self) -> Result<String, StoryError> {
        let command = Retry {
            correlation_id: Uuid::new_v4(),
        };

        let mut slot = self.session.write().await;
        let session = slot.as_mut().ok_or(StoryError::UninitializedSession)?;
        command_handlers::handle_retry(&command, session, &self.config, &self.gateway).await?;
        Ok(query_handlers::get_current_chunk(session))
    }

    /// Returns the current transcript tail.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is started.
    pub async fn current_chunk(&self) -> Result<String, StoryError> {
        let slot = self.session.read().await;
        slot.as_ref()
            .map(query_handlers::get_current_chunk)
            .ok_or(StoryError::UninitializedSession)
    }

    /// Returns the full transcript.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is started.
    pub async fn transcript(&self) -> Result<String, StoryError> {
        let slot = self.session.read().await;
        slot.as_ref()
            .map(query_handlers::get_transcript)
            .ok_or(StoryError::UninitializedSession)
    }

    /// Returns a summary of the live session.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UninitializedSession` before any story is started.
    pub async fn session_view(&self) -> Result<SessionView, StoryError> {
        let slot = self.session.read().await;
        slot.as_ref()
            .map(query_handlers::get_session_view)
            .ok_or(StoryError::UninitializedSession)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use storyloom_core::error::StoryError;
    use storyloom_core::generator::TextGenerator;
    use storyloom_test_support::{FixedClock, ScriptedGenerator, StalledGenerator};

    use super::SessionManager;
    use crate::config::EngineConfig;

    fn manager_with(backend: Arc<dyn TextGenerator>, deadline: Duration) -> SessionManager {
        let config = EngineConfig {
            deadline,
            ..EngineConfig::default()
        };
        SessionManager::new(config, backend, Arc::new(FixedClock(Utc::now())))
    }

    fn scripted(responses: &[&str]) -> (Arc<ScriptedGenerator>, SessionManager) {
        let backend = Arc::new(ScriptedGenerator::new(responses.iter().copied()));
        let manager = manager_with(backend.clone(), Duration::from_secs(5));
        (backend, manager)
    }

    #[tokio::test]
    async fn test_every_operation_rejects_uninitialized_session() {
        let (_, manager) = scripted(&[]);

        assert!(matches!(manager.act("look".into()).await, Err(StoryError::UninitializedSession)));
        assert!(matches!(manager.revert().await, Err(StoryError::UninitializedSession)));
        assert!(matches!(manager.retry().await, Err(StoryError::UninitializedSession)));
        assert!(matches!(manager.current_chunk().await, Err(StoryError::UninitializedSession)));
        assert!(matches!(manager.transcript().await, Err(StoryError::UninitializedSession)));
        assert!(matches!(manager.session_view().await, Err(StoryError::UninitializedSession)));
    }

    #[tokio::test]
    async fn test_start_new_story_returns_story_start() {
        let (_, manager) = scripted(&[" A storm gathers."]);

        let chunk = manager
            .start_new_story("You sail north.".into(), "You are Ned. ".into(), None)
            .await
            .unwrap();

        assert_eq!(chunk, "You are Ned. You sail north. A storm gathers.");
        assert_eq!(manager.current_chunk().await.unwrap(), chunk);
        assert_eq!(manager.transcript().await.unwrap(), chunk);
    }

    #[tokio::test]
    async fn test_start_new_story_replaces_previous_session() {
        // Arrange
        let (_, manager) = scripted(&[" A storm gathers.", " The sea calms.", " Snow falls."]);
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();
        manager.act("row".into()).await.unwrap();
        let first_id = manager.session_view().await.unwrap().session_id;

        // Act
        manager
            .start_new_story("You walk south.".into(), String::new(), None)
            .await
            .unwrap();

        // Assert
        let view = manager.session_view().await.unwrap();
        assert_ne!(view.session_id, first_id);
        assert_eq!(view.turns, 0);
        assert_eq!(manager.current_chunk().await.unwrap(), "You walk south. Snow falls.");
    }

    #[tokio::test]
    async fn test_failed_start_keeps_live_session() {
        // Arrange
        let (_, manager) = scripted(&[" A storm gathers."]);
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();

        // Act
        let result = manager
            .start_new_story("You walk south.".into(), String::new(), None)
            .await;

        // Assert
        assert!(matches!(result, Err(StoryError::Generation(_))));
        assert_eq!(
            manager.current_chunk().await.unwrap(),
            "You sail north. A storm gathers."
        );
    }

    #[tokio::test]
    async fn test_failed_first_start_stays_uninitialized() {
        let manager = manager_with(Arc::new(StalledGenerator), Duration::from_millis(20));

        let result = manager.start_new_story("x".into(), String::new(), None).await;

        assert!(matches!(result, Err(StoryError::Timeout { .. })));
        assert!(matches!(manager.current_chunk().await, Err(StoryError::UninitializedSession)));
    }

    #[tokio::test]
    async fn test_revert_and_retry_on_fresh_story_fail_with_empty_history() {
        let (_, manager) = scripted(&[" A storm gathers."]);
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();

        assert!(matches!(manager.revert().await, Err(StoryError::EmptyHistory)));
        assert!(matches!(manager.retry().await, Err(StoryError::EmptyHistory)));
        assert_eq!(manager.session_view().await.unwrap().turns, 0);
    }

    #[tokio::test]
    async fn test_act_revert_retry_flow() {
        // Arrange
        let (_, manager) = scripted(&[
            " A storm gathers.",
            " The mast cracks.",
            " A wave hits the deck.",
            " The sail tears loose.",
        ]);
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();

        // Act / Assert
        let chunk = manager.act("hold the rope".into()).await.unwrap();
        assert_eq!(chunk, "\n> you hold the rope.\n\n The mast cracks.");

        manager.act("pray".into()).await.unwrap();
        assert_eq!(manager.session_view().await.unwrap().turns, 2);

        let chunk = manager.revert().await.unwrap();
        assert_eq!(chunk, "\n> you hold the rope.\n\n The mast cracks.");

        let chunk = manager.retry().await.unwrap();
        assert_eq!(chunk, "\n> you hold the rope.\n\n The sail tears loose.");
        assert_eq!(manager.session_view().await.unwrap().turns, 1);
    }

    #[tokio::test]
    async fn test_concurrent_acts_are_serialized() {
        // Arrange
        let (_, manager) = scripted(&[
            " A storm gathers.",
            " The mast cracks.",
            " Gulls circle overhead.",
        ]);
        let manager = Arc::new(manager);
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();

        // Act
        let (a, b) = tokio::join!(manager.act("steer".into()), manager.act("wait".into()));

        // Assert
        a.unwrap();
        b.unwrap();
        let transcript = manager.transcript().await.unwrap();
        assert_eq!(manager.session_view().await.unwrap().turns, 2);
        assert!(transcript.contains("The mast cracks."));
        assert!(transcript.contains("Gulls circle overhead."));
    }

    #[tokio::test]
    async fn test_timed_out_act_does_not_hold_lock() {
        // Arrange
        let backend = Arc::new(ScriptedGenerator::stalling_after([" A storm gathers."]));
        let manager = manager_with(backend, Duration::from_millis(20));
        manager
            .start_new_story("You sail north.".into(), String::new(), None)
            .await
            .unwrap();

        // Act
        let result = manager.act("look".into()).await;

        // Assert
        assert!(matches!(result, Err(StoryError::Timeout { .. })));
        assert_eq!(manager.session_view().await.unwrap().turns, 0);
        assert_eq!(
            manager.current_chunk().await.unwrap(),
            "You sail north. A storm gathers."
        );
    }
}
