//! Query handlers for the story session engine.
//!
//! Read-only views over a session. None of these mutate state, so calling
//! them repeatedly without an intervening command yields identical output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::StorySession;

/// Read-only summary of a story session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// When the session was started.
    pub started_at: DateTime<Utc>,
    /// Number of completed turns.
    pub turns: usize,
    /// The background passage the story was started with.
    pub context: String,
}

/// Returns the latest transcript tail of `session`.
#[must_use]
pub fn get_current_chunk(session: &StorySession) -> String {
    session.current_chunk()
}

/// Returns the full transcript of `session`.
#[must_use]
pub fn get_transcript(session: &StorySession) -> String {
    session.transcript()
}

/// Returns a summary view of `session`.
#[must_use]
pub fn get_session_view(session: &StorySession) -> SessionView {
    SessionView {
        session_id: session.id,
        started_at: session.started_at,
        turns: session.turns().len(),
        context: session.context().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::application::query_handlers::{get_current_chunk, get_session_view, get_transcript};
    use crate::domain::aggregates::StorySession;

    #[test]
    fn test_get_session_view_returns_summary() {
        // Arrange
        let id = Uuid::new_v4();
        let started_at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let mut session = StorySession::new(
            id,
            "Once upon a time.".to_owned(),
            "Once".to_owned(),
            60,
            started_at,
        );
        session.push_turn("\n> you sing.\n".into(), "Birds answer.".into());

        // Act
        let view = get_session_view(&session);

        // Assert
        assert_eq!(view.session_id, id);
        assert_eq!(view.started_at, started_at);
        assert_eq!(view.turns, 1);
        assert_eq!(view.context, "Once");
    }

    #[test]
    fn test_read_queries_are_idempotent() {
        let mut session = StorySession::new(
            Uuid::new_v4(),
            "Once upon a time.".to_owned(),
            String::new(),
            60,
            Utc::now(),
        );
        session.push_turn("\n> you sing.\n".into(), "Birds answer.".into());

        assert_eq!(get_current_chunk(&session), get_current_chunk(&session));
        assert_eq!(get_transcript(&session), get_transcript(&session));
    }
}
