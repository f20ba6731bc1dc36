//! Server configuration read from the environment.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use storyloom_story::config::{self as engine, EngineConfig};

use crate::error::AppError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8181;

/// Default story data location.
pub const DEFAULT_STORY_DATA_PATH: &str = "data/story_data.yaml";

/// Default setting used by `/reset`.
pub const DEFAULT_SETTING: &str = "fantasy";

/// Everything the server needs to boot.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Host the listener binds to.
    pub host: String,
    /// Port the listener binds to.
    pub port: u16,
    /// Completion endpoint of the text generation backend.
    pub generator_url: String,
    /// YAML file holding settings and characters.
    pub story_data_path: PathBuf,
    /// Setting key new stories are drawn from.
    pub setting: String,
    /// Start a story before accepting requests.
    pub preload: bool,
    /// Tuning passed to the session manager.
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first missing or invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let generator_url = lookup("GENERATOR_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("GENERATOR_URL environment variable must be set".to_owned())
            })?;

        let similarity_threshold: f64 = parse_or(
            &lookup,
            "SIMILARITY_THRESHOLD",
            engine::DEFAULT_SIMILARITY_THRESHOLD,
        )?;
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(AppError::Config(format!(
                "SIMILARITY_THRESHOLD must be between 0 and 1, got {similarity_threshold}"
            )));
        }

        let deadline_secs: u64 = parse_or(
            &lookup,
            "GENERATION_DEADLINE_SECS",
            engine::DEFAULT_DEADLINE.as_secs(),
        )?;
        if deadline_secs == 0 {
            return Err(AppError::Config(
                "GENERATION_DEADLINE_SECS must be positive".to_owned(),
            ));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            generator_url,
            story_data_path: lookup("STORY_DATA_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORY_DATA_PATH), PathBuf::from),
            setting: lookup("STORY_SETTING").unwrap_or_else(|| DEFAULT_SETTING.to_owned()),
            preload: parse_or(&lookup, "PRELOAD_STORY", true)?,
            engine: EngineConfig {
                default_budget: parse_or(
                    &lookup,
                    "GENERATION_DEFAULT_BUDGET",
                    engine::DEFAULT_BUDGET,
                )?,
                elevated_budget: parse_or(
                    &lookup,
                    "GENERATION_ELEVATED_BUDGET",
                    engine::ELEVATED_BUDGET,
                )?,
                deadline: Duration::from_secs(deadline_secs),
                similarity_threshold,
                memory: parse_or(&lookup, "STORY_MEMORY", engine::DEFAULT_MEMORY)?,
            },
        })
    }

    /// The `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}
