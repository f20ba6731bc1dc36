//! Test generators — `TextGenerator` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storyloom_core::error::StoryError;
use storyloom_core::generator::{GenerationRequest, TextGenerator};

/// A generator that replays a fixed script of responses, one per call, and
/// records every request it receives. Once the script is exhausted every call
/// fails with `StoryError::Generation`, or never returns when built with
/// [`ScriptedGenerator::stalling_after`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
    stall_when_exhausted: bool,
}

impl ScriptedGenerator {
    /// Create a generator that returns `responses` in order.
    #[must_use]
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
            stall_when_exhausted: false,
        }
    }

    /// Create a generator that returns `responses` in order and then stalls
    /// forever, for exercising deadlines partway through a session.
    #[must_use]
    pub fn stalling_after<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stall_when_exhausted: true,
            ..Self::new(responses)
        }
    }

    /// Returns a snapshot of every request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, StoryError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => Ok(response),
            None if self.stall_when_exhausted => std::future::pending().await,
            None => Err(StoryError::Generation("script exhausted".into())),
        }
    }
}

/// A generator that never returns. Useful for exercising deadlines.
#[derive(Debug)]
pub struct StalledGenerator;

#[async_trait]
impl TextGenerator for StalledGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, StoryError> {
        std::future::pending().await
    }
}

/// A generator that answers only after sleeping for a fixed delay, and
/// records whether it ever got that far.
#[derive(Debug)]
pub struct DelayedGenerator {
    delay: Duration,
    response: String,
    completed: AtomicBool,
}

impl DelayedGenerator {
    /// Create a generator that returns `response` after `delay`.
    #[must_use]
    pub fn new(delay: Duration, response: impl Into<String>) -> Self {
        Self {
            delay,
            response: response.into(),
            completed: AtomicBool::new(false),
        }
    }

    /// Returns `true` once a call has slept through its delay.
    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for DelayedGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, StoryError> {
        tokio::time::sleep(self.delay).await;
        self.completed.store(true, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// A generator that always fails with a backend error.
#[derive(Debug)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, StoryError> {
        Err(StoryError::Generation("model unavailable".into()))
    }
}
