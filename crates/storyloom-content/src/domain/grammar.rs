//! Template grammars for names, contexts, and prompts.
//!
//! A grammar maps rule names to lists of alternatives. Alternatives may
//! reference other rules with `{rule}`; expansion picks one alternative per
//! rule uniformly at random and substitutes recursively.

use std::collections::BTreeMap;

use serde::Deserialize;
use storyloom_core::error::StoryError;
use storyloom_core::rng::DeterministicRng;

/// Maximum nesting of rule references before expansion gives up.
pub const MAX_DEPTH: usize = 16;

/// A set of named template rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    rules: BTreeMap<String, Vec<String>>,
}

impl Grammar {
    /// Build a grammar from `(rule, alternatives)` pairs.
    #[must_use]
    pub fn from_rules<I, K, V>(rules: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(name, alts)| (name.into(), alts.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Returns `true` if `rule` exists and has at least one alternative.
    #[must_use]
    pub fn has_rule(&self, rule: &str) -> bool {
        self.rules.get(rule).is_some_and(|alts| !alts.is_empty())
    }

    /// Expands the `{character}_{slot}` rule, e.g. `knight_prompt`.
    ///
    /// # Errors
    ///
    /// See [`Grammar::expand`].
    pub fn generate(
        &self,
        character: &str,
        slot: &str,
        rng: &mut dyn DeterministicRng,
    ) -> Result<String, StoryError> {
        self.expand(&format!("{character}_{slot}"), rng)
    }

    /// Expands `rule` into text.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StoryData` for unknown or empty rules, unclosed
    /// braces, and references nested deeper than [`MAX_DEPTH`].
    pub fn expand(&self, rule: &str, rng: &mut dyn DeterministicRng) -> Result<String, StoryError> {
        self.expand_at(rule, rng, 0)
    }

    fn expand_at(
        &self,
        rule: &str,
        rng: &mut dyn DeterministicRng,
        depth: usize,
    ) -> Result<String, StoryError> {
        if depth > MAX_DEPTH {
            return Err(StoryError::StoryData(format!(
                "grammar rule '{rule}' nests deeper than {MAX_DEPTH}"
            )));
        }
        let alternatives = self
            .rules
            .get(rule)
            .ok_or_else(|| StoryError::StoryData(format!("unknown grammar rule '{rule}'")))?;
        let template = pick(alternatives, rng)
            .ok_or_else(|| StoryError::StoryData(format!("grammar rule '{rule}' is empty")))?;
        self.render(template, rng, depth)
    }

    fn render(
        &self,
        template: &str,
        rng: &mut dyn DeterministicRng,
        depth: usize,
    ) -> Result<String, StoryError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                StoryError::StoryData(format!("unclosed '{{' in template '{template}'"))
            })?;
            out.push_str(&self.expand_at(&after[..close], rng, depth + 1)?);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Picks one element of `items` uniformly, or `None` if it is empty.
pub fn pick<'a, T>(items: &'a [T], rng: &mut dyn DeterministicRng) -> Option<&'a T> {
    let last = u32::try_from(items.len().checked_sub(1)?).ok()?;
    let index = usize::try_from(rng.next_u32_range(0, last)).ok()?;
    items.get(index)
}
