//! Aggregate root for the story session engine.

use chrono::{DateTime, Utc};
use storyloom_core::error::StoryError;
use uuid::Uuid;

use super::similarity;

/// One completed turn: the normalised action and its generated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// The action as sent to the generator.
    pub action: String,
    /// The continuation committed for the action.
    pub result: String,
}

/// What happened to a generated turn once it reached the transcript.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// The turn was appended.
    Committed,
    /// The turn repeated the previous result and was dropped again.
    DiscardedAsRepetition {
        /// Similarity between the dropped result and the one before it.
        similarity: f64,
    },
}

/// The aggregate root for a story session.
///
/// Actions and results are stored pairwise, so the two sequences can never
/// drift out of step.
#[derive(Debug, Clone)]
pub struct StorySession {
    /// Session identifier.
    pub id: Uuid,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    story_start: String,
    context: String,
    turns: Vec<Turn>,
    generation_budget: u32,
    default_budget: u32,
}

impl StorySession {
    /// Creates a session with an empty history.
    #[must_use]
    pub fn new(
        id: Uuid,
        story_start: String,
        context: String,
        default_budget: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            started_at,
            story_start,
            context,
            turns: Vec::new(),
            generation_budget: default_budget,
            default_budget,
        }
    }

    /// The opening passage.
    #[must_use]
    pub fn story_start(&self) -> &str {
        &self.story_start
    }

    /// The background passage the story was started with.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Completed turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Actions of every completed turn, oldest first.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(|turn| turn.action.as_str())
    }

    /// Results of every completed turn, oldest first.
    pub fn results(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(|turn| turn.result.as_str())
    }

    /// Budget the next generation call will request.
    #[must_use]
    pub fn generation_budget(&self) -> u32 {
        self.generation_budget
    }

    /// Raises the budget for the next generation call only.
    pub fn set_budget_override(&mut self, budget: u32) {
        self.generation_budget = budget;
    }

    /// Restores the default budget.
    pub fn reset_budget(&mut self) {
        self.generation_budget = self.default_budget;
    }

    /// Builds the generator prompt for `action`.
    ///
    /// The prompt opens with the story start while fewer than two turns
    /// exist and with the bare context afterwards, followed by the last
    /// `memory` turns and finally the action itself.
    #[must_use]
    pub fn prompt_for(&self, action: &str, memory: usize) -> String {
        let mut prompt = if self.turns.len() < 2 {
            self.story_start.clone()
        } else {
            self.context.clone()
        };
        let skip = self.turns.len().saturating_sub(memory);
        for turn in &self.turns[skip..] {
            prompt.push_str(&turn.action);
            prompt.push_str(&turn.result);
        }
        prompt.push_str(action);
        prompt
    }

    /// Appends a turn unconditionally.
    pub(crate) fn push_turn(&mut self, action: String, result: String) {
        self.turns.push(Turn { action, result });
    }

    /// Appends a turn, then drops it again if its result is more similar
    /// than `threshold` to the result before it.
    pub(crate) fn commit_turn(
        &mut self,
        action: String,
        result: String,
        threshold: f64,
    ) -> TurnOutcome {
        self.push_turn(action, result);

        if let [.., previous, latest] = self.turns.as_slice() {
            if similarity::is_repetition(&latest.result, &previous.result, threshold) {
                let score = similarity::similarity(&latest.result, &previous.result);
                self.turns.pop();
                return TurnOutcome::DiscardedAsRepetition { similarity: score };
            }
        }
        TurnOutcome::Committed
    }

    /// Removes and returns the most recent turn.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::EmptyHistory` if there are no turns.
    pub fn pop_turn(&mut self) -> Result<Turn, StoryError> {
        self.turns.pop().ok_or(StoryError::EmptyHistory)
    }

    /// The story start when no turns exist, otherwise the latest turn as
    /// `"{action}\n{result}"`.
    #[must_use]
    pub fn current_chunk(&self) -> String {
        match self.turns.last() {
            Some(turn) => format!("{}\n{}", turn.action, turn.result),
            None => self.story_start.clone(),
        }
    }

    /// The whole story: the start followed by every turn in order.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = self.story_start.clone();
        for turn in &self.turns {
            out.push('\n');
            out.push_str(&turn.action);
            out.push('\n');
            out.push('\n');
            out.push_str(&turn.result);
        }
        out
    }
}
