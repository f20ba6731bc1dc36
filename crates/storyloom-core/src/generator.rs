//! Text generation backend abstraction.

use async_trait::async_trait;

use crate::error::StoryError;

/// A single request to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text the backend continues from.
    pub prompt: String,
    /// Optional preamble placed ahead of the prompt.
    pub context: Option<String>,
    /// Maximum number of tokens to generate.
    pub budget: u32,
}

/// The external text generation capability.
///
/// Implementations perform exactly one backend call per invocation and
/// never enforce deadlines themselves; that belongs to the gateway.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `request`.
    async fn generate(&self, request: GenerationRequest) -> Result<String, StoryError>;
}
