//! Commands for the story session engine.

use storyloom_core::command::Command;
use uuid::Uuid;

/// Command to replace the live session with a freshly generated story.
#[derive(Debug, Clone)]
pub struct StartNewStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Opening prompt the generator continues from.
    pub prompt: String,
    /// Background passage placed ahead of the prompt.
    pub context: String,
    /// One-shot budget for the opening; the elevated budget when `None`.
    pub budget_override: Option<u32>,
}

impl Command for StartNewStory {
    fn command_type(&self) -> &'static str {
        "story.start_new_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to play one turn.
#[derive(Debug, Clone)]
pub struct Act {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's action exactly as typed.
    pub action: String,
}

impl Command for Act {
    fn command_type(&self) -> &'static str {
        "story.act"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to drop the most recent turn.
#[derive(Debug, Clone)]
pub struct Revert {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Revert {
    fn command_type(&self) -> &'static str {
        "story.revert"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to regenerate the result of the most recent turn.
#[derive(Debug, Clone)]
pub struct Retry {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Retry {
    fn command_type(&self) -> &'static str {
        "story.retry"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
