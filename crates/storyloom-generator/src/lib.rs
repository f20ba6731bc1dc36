//! Storyloom — HTTP text generation backend.
//!
//! Forwards generation requests to a completion service that accepts
//! `{"prompt", "context", "max_tokens"}` and answers `{"text"}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyloom_core::error::StoryError;
use storyloom_core::generator::{GenerationRequest, TextGenerator};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    context: Option<&'a str>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    text: String,
}

/// Text generator backed by a remote completion endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerator {
    /// Create a generator posting to `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, budget = request.budget))]
    async fn generate(&self, request: GenerationRequest) -> Result<String, StoryError> {
        let body = CompletionBody {
            prompt: &request.prompt,
            context: request.context.as_deref(),
            max_tokens: request.budget,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoryError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoryError::Generation(format!(
                "backend returned {status}: {detail}"
            )));
        }

        let reply: CompletionReply = response
            .json()
            .await
            .map_err(|e| StoryError::Generation(format!("malformed backend reply: {e}")))?;
        debug!(chars = reply.text.len(), "backend replied");
        Ok(reply.text)
    }
}
