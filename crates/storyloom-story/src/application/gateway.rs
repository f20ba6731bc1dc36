//! Bounded-time wrapper around the text generation backend.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use storyloom_core::error::StoryError;
use storyloom_core::generator::{GenerationRequest, TextGenerator};
use tracing::{debug, instrument, warn};

/// Calls the generation backend at most once per request and gives up when
/// the deadline passes.
///
/// The backend call runs on its own task, so a caller whose deadline has
/// expired is released immediately; the stalled task is then aborted.
#[derive(Clone)]
pub struct GenerationGateway {
    backend: Arc<dyn TextGenerator>,
    deadline: Duration,
}

impl fmt::Debug for GenerationGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationGateway")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl GenerationGateway {
    /// Create a gateway around `backend` enforcing `deadline` on every call.
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>, deadline: Duration) -> Self {
        Self { backend, deadline }
    }

    /// Generate a continuation for `request`.
    ///
    /// The generated text is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Timeout` if the backend has not answered within
    /// the deadline, `StoryError::Generation` if the backend task panicked,
    /// and any error the backend itself returns unchanged.
    #[instrument(skip_all, fields(budget = request.budget, deadline = ?self.deadline))]
    pub async fn generate(&self, request: GenerationRequest) -> Result<String, StoryError> {
        let backend = Arc::clone(&self.backend);
        let mut task = tokio::spawn(async move { backend.generate(request).await });

        match tokio::time::timeout(self.deadline, &mut task).await {
            Ok(Ok(result)) => {
                debug!(ok = result.is_ok(), "generation finished");
                result
            }
            Ok(Err(join_error)) => Err(StoryError::Generation(format!(
                "generation task failed: {join_error}"
            ))),
            Err(_) => {
                task.abort();
                warn!("generation exceeded its deadline");
                Err(StoryError::Timeout {
                    deadline: self.deadline,
                })
            }
        }
    }
}
