//! Opening context and prompt for a new story.

use storyloom_core::error::StoryError;
use storyloom_core::rng::DeterministicRng;
use tracing::{debug, instrument};

use crate::domain::grammar::pick;
use crate::domain::story_data::{Character, Setting, StoryData};

/// Placeholder replaced by the generated character name.
pub const NAME_TOKEN: &str = "<NAME>";

/// Grammar rule that produces character names.
pub const NAME_RULE: &str = "name";

/// A composed story opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposition {
    /// Setting the character was drawn from.
    pub setting_key: String,
    /// Key of the chosen character, e.g. `knight`.
    pub character_key: String,
    /// Generated character name substituted for `<NAME>`.
    pub name: String,
    /// Background passage sent as conditioning text.
    pub context: String,
    /// Opening passage the player sees.
    pub prompt: String,
}

/// Picks a random character of `setting_key` and composes its opening.
///
/// Characters whose grammar carries both `{character}_context` and
/// `{character}_prompt` rules are expanded from those; the rest are
/// described from their items and one of their canned prompts.
///
/// # Errors
///
/// Returns `StoryError::StoryData` if the setting is unknown, has no
/// characters, or its grammar or character data is incomplete.
#[instrument(skip(data, rng))]
pub fn curated_exposition(
    data: &StoryData,
    setting_key: &str,
    rng: &mut dyn DeterministicRng,
) -> Result<Exposition, StoryError> {
    let setting = data.setting(setting_key)?;
    let characters: Vec<(&String, &Character)> = setting.characters.iter().collect();
    let (character_key, character) = pick(&characters, rng).copied().ok_or_else(|| {
        StoryError::StoryData(format!("setting '{setting_key}' has no characters"))
    })?;

    let name = setting.grammar.expand(NAME_RULE, rng)?;
    let (context, prompt) = if is_curated(setting, character_key) {
        let context = setting.grammar.generate(character_key, "context", rng)?;
        let prompt = setting.grammar.generate(character_key, "prompt", rng)?;
        (format!("{context}\n\n"), prompt)
    } else {
        fallback_opening(setting, character_key, character, &name, rng)?
    };

    debug!(character = %character_key, %name, "exposition composed");
    Ok(Exposition {
        setting_key: setting_key.to_owned(),
        character_key: character_key.clone(),
        context: context.replace(NAME_TOKEN, &name),
        prompt: prompt.replace(NAME_TOKEN, &name),
        name,
    })
}

fn is_curated(setting: &Setting, character_key: &str) -> bool {
    setting.grammar.has_rule(&format!("{character_key}_context"))
        && setting.grammar.has_rule(&format!("{character_key}_prompt"))
}

fn fallback_opening(
    setting: &Setting,
    character_key: &str,
    character: &Character,
    name: &str,
    rng: &mut dyn DeterministicRng,
) -> Result<(String, String), StoryError> {
    let missing = |what: &str| {
        StoryError::StoryData(format!("character '{character_key}' has no {what}"))
    };
    let item1 = character.item1.as_deref().ok_or_else(|| missing("item1"))?;
    let item2 = character.item2.as_deref().ok_or_else(|| missing("item2"))?;
    let prompts: Vec<&String> = character.prompts.values().collect();
    let prompt = pick(&prompts, rng).ok_or_else(|| missing("prompts"))?;

    let context = format!(
        "You are {name}, a {character_key} {}You have a {item1} and a {item2}. ",
        setting.description
    );
    Ok((context, (*prompt).clone()))
}
