//! Declarative setting and character data.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use storyloom_core::error::StoryError;
use tracing::info;

use super::grammar::Grammar;

/// Root of the story data document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryData {
    /// Settings keyed by name, e.g. `fantasy`.
    pub settings: BTreeMap<String, Setting>,
}

/// A setting: its characters and the grammar that fleshes them out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Setting {
    /// Sentence fragment completing "a {character} ...".
    #[serde(default)]
    pub description: String,
    /// Playable characters keyed by name.
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    /// Template rules for names, contexts, and prompts.
    #[serde(default)]
    pub grammar: Grammar,
}

/// A playable character.
///
/// Curated characters are described entirely by grammar rules and leave
/// these fields empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Character {
    /// First item named in the fallback context.
    #[serde(default)]
    pub item1: Option<String>,
    /// Second item named in the fallback context.
    #[serde(default)]
    pub item2: Option<String>,
    /// Opening prompts keyed by an arbitrary label.
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,
}

impl StoryData {
    /// Parses a YAML story data document.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StoryData` if the document is malformed.
    pub fn from_yaml_str(source: &str) -> Result<Self, StoryError> {
        serde_yaml::from_str(source)
            .map_err(|e| StoryError::StoryData(format!("invalid story data: {e}")))
    }

    /// Reads and parses the story data file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StoryData` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            StoryError::StoryData(format!("failed to read {}: {e}", path.display()))
        })?;
        let data = Self::from_yaml_str(&source)?;
        info!(path = %path.display(), settings = data.settings.len(), "story data loaded");
        Ok(data)
    }

    /// Looks up a setting by key.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StoryData` if no such setting exists.
    pub fn setting(&self, key: &str) -> Result<&Setting, StoryError> {
        self.settings
            .get(key)
            .ok_or_else(|| StoryError::StoryData(format!("unknown setting '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../../../../data/story_data.yaml");

    #[test]
    fn test_bundled_story_data_parses() {
        let data = StoryData::from_yaml_str(BUNDLED).unwrap();

        let fantasy = data.setting("fantasy").unwrap();
        assert!(!fantasy.characters.is_empty());
        assert!(fantasy.grammar.has_rule("name"));
    }

    #[test]
    fn test_bundled_characters_are_playable() {
        let data = StoryData::from_yaml_str(BUNDLED).unwrap();

        for setting in data.settings.values() {
            for (key, character) in &setting.characters {
                let curated = setting.grammar.has_rule(&format!("{key}_context"))
                    && setting.grammar.has_rule(&format!("{key}_prompt"));
                let fallback = character.item1.is_some()
                    && character.item2.is_some()
                    && !character.prompts.is_empty();
                assert!(curated || fallback, "character '{key}' has no opening");
            }
        }
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let data = StoryData::from_yaml_str(
            "settings:\n  noir:\n    characters:\n      detective: {}\n",
        )
        .unwrap();

        let noir = data.setting("noir").unwrap();
        assert_eq!(noir.description, "");
        let detective = &noir.characters["detective"];
        assert!(detective.item1.is_none());
        assert!(detective.prompts.is_empty());
    }

    #[test]
    fn test_unknown_setting_is_story_data_error() {
        let data = StoryData::from_yaml_str(BUNDLED).unwrap();

        assert!(matches!(data.setting("western"), Err(StoryError::StoryData(_))));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(matches!(
            StoryData::from_yaml_str("settings: [1, 2"),
            Err(StoryError::StoryData(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_story_data_error() {
        assert!(matches!(
            StoryData::load("/nonexistent/story_data.yaml"),
            Err(StoryError::StoryData(_))
        ));
    }
}
