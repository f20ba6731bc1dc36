//! Shared application state.

use std::sync::{Arc, Mutex};

use storyloom_content::application::exposition;
use storyloom_content::domain::story_data::StoryData;
use storyloom_core::error::StoryError;
use storyloom_core::rng::DeterministicRng;
use storyloom_story::application::manager::SessionManager;
use tracing::info;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Holder of the live story session.
    pub manager: Arc<SessionManager>,
    /// Settings and characters new stories are drawn from.
    pub story_data: Arc<StoryData>,
    /// Random source for character and template selection.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Setting key used when starting a new story.
    pub setting: Arc<str>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("manager", &self.manager)
            .field("setting", &self.setting)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        manager: Arc<SessionManager>,
        story_data: Arc<StoryData>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        setting: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            manager,
            story_data,
            rng,
            setting: setting.into(),
        }
    }

    /// Starts a story for a randomly chosen character of the configured
    /// setting and returns its opening passage.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StoryData` if no opening can be composed,
    /// `StoryError::Infrastructure` if the RNG lock is poisoned, or the
    /// gateway error if the opening could not be generated.
    pub async fn start_curated_story(&self) -> Result<String, StoryError> {
        let opening = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| StoryError::Infrastructure(format!("rng lock poisoned: {e}")))?;
            exposition::curated_exposition(&self.story_data, &self.setting, &mut *rng)?
        };
        info!(
            setting = %opening.setting_key,
            character = %opening.character_key,
            name = %opening.name,
            "starting curated story"
        );

        self.manager
            .start_new_story(opening.prompt, opening.context, None)
            .await
    }
}
