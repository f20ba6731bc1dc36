//! Text normalisation for player actions and generated results.
//!
//! Actions are rewritten into the second person and wrapped in the `> `
//! marker the generator was conditioned on. Results are trimmed back to
//! their last complete sentence before they enter the transcript.

/// Marker sent when the player submits no action.
pub const IDLE_ACTION: &str = "\n> \n";

const ACTION_PREFIX: &str = "\n> ";
const SENTENCE_TERMINATORS: [char; 3] = ['.', '?', '!'];
const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '?', '!', ';', ':'];
const QUOTE_CHARS: [char; 2] = ['"', '\u{201c}'];

/// One first-person to second-person substitution.
///
/// `from` and `to` are space-separated word lists of equal length; each
/// matched word is replaced by the word in the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonRule {
    /// Words to match, case-insensitive on the first letter.
    pub from: &'static str,
    /// Replacement words.
    pub to: &'static str,
}

const fn rule(from: &'static str, to: &'static str) -> PersonRule {
    PersonRule { from, to }
}

/// Person conversion table, in match priority order.
///
/// Multi-word rules come first so that "I am" is never rewritten as
/// "you am".
pub const PERSON_RULES: &[PersonRule] = &[
    rule("wasn't I", "weren't you"),
    rule("was I", "were you"),
    rule("am I", "are you"),
    rule("I am", "you are"),
    rule("I was", "you were"),
    rule("I'm", "you're"),
    rule("Im", "you're"),
    rule("I've", "you've"),
    rule("Ive", "you've"),
    rule("I'd", "you'd"),
    rule("I'll", "you'll"),
    rule("I", "you"),
    rule("me", "you"),
    rule("my", "your"),
    rule("mine", "yours"),
    rule("myself", "yourself"),
    rule("we're", "you're"),
    rule("we", "you"),
    rule("us", "you"),
    rule("our", "your"),
];

impl PersonRule {
    fn word_count(&self) -> usize {
        self.from.split(' ').count()
    }

    /// Returns the number of words consumed if this rule matches at the
    /// start of `words`.
    fn match_at(&self, words: &[Word<'_>]) -> Option<usize> {
        let count = self.word_count();
        if words.len() < count {
            return None;
        }
        // Punctuation may only follow the last matched word.
        let matched = self
            .from
            .split(' ')
            .zip(words)
            .enumerate()
            .all(|(j, (pattern, word))| {
                same_word(word.core, pattern) && (j + 1 == count || word.punct.is_empty())
            });
        matched.then_some(count)
    }
}

/// Normalises a raw player action into the form sent to the generator.
///
/// - empty input becomes [`IDLE_ACTION`];
/// - input starting with a quote, after any leading whitespace, is
///   wrapped verbatim;
/// - anything else is trimmed, its first letter lower-cased, terminated
///   with `.` when it lacks `.`, `?` or `!`, converted to the second
///   person, given a leading "you" when it is an imperative (not a
///   question and not already addressed to "you"), and wrapped as
///   `"\n> " + text + "\n"`.
///
/// Whitespace-only input is treated as empty.
#[must_use]
pub fn preprocess(raw_action: &str) -> String {
    if raw_action.is_empty() {
        return IDLE_ACTION.to_owned();
    }
    if raw_action.starts_with(QUOTE_CHARS) {
        return wrap(raw_action);
    }

    let trimmed = raw_action.trim();
    if trimmed.is_empty() {
        return IDLE_ACTION.to_owned();
    }
    if trimmed.starts_with(QUOTE_CHARS) {
        return wrap(trimmed);
    }

    let mut action = lowercase_first(trimmed);
    if !action.ends_with(SENTENCE_TERMINATORS) {
        action.push('.');
    }

    let action = first_to_second_person(&action);
    if action.ends_with('?') || addresses_player(&action) {
        wrap(&action)
    } else {
        wrap(&format!("you {action}"))
    }
}

fn addresses_player(action: &str) -> bool {
    action
        .split_whitespace()
        .next()
        .map(|word| word.trim_end_matches(TRAILING_PUNCTUATION).to_lowercase())
        .is_some_and(|word| word == "you" || word.starts_with("you'"))
}

/// Returns `true` when `text` looks like speech: it contains a quote, or a
/// word beginning with "say", "said" or "ask".
#[must_use]
pub fn is_dialogue(text: &str) -> bool {
    if text.contains(QUOTE_CHARS) {
        return true;
    }
    text.split_whitespace().any(|word| {
        let word = word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        word.starts_with("say") || word.starts_with("said") || word.starts_with("ask")
    })
}

/// Rewrites first-person references outside quoted speech into the second
/// person using [`PERSON_RULES`]. Unmapped words pass through unchanged.
#[must_use]
pub fn first_to_second_person(text: &str) -> String {
    let text = standardize_punctuation(text);
    let mut out = String::with_capacity(text.len() + 16);

    for (index, span) in text.split('"').enumerate() {
        if index > 0 {
            out.push('"');
        }
        if index % 2 == 0 {
            out.push_str(&convert_span(span, index == 0));
        } else {
            out.push_str(span);
        }
    }

    out
}

/// Replaces typographic quotes and apostrophes with their ASCII forms.
#[must_use]
pub fn standardize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            other => other,
        })
        .collect()
}

/// Repairs a generated continuation so that it ends on a sentence boundary.
///
/// The text is cut before any `>` or `<` marker after its first character,
/// then after its last sentence terminator (keeping a closing quote that
/// directly follows it). An unbalanced trailing quote is dropped, `#` and
/// `*` are removed, and runs of blank lines collapse to single newlines.
/// Text without any terminator is kept whole.
#[must_use]
pub fn clean_result(text: &str) -> String {
    let text = standardize_punctuation(text);

    let marker = text
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '>' || c == '<')
        .map_or(text.len(), |(i, _)| i);
    let mut head = &text[..marker];

    if let Some(last) = head.rfind(SENTENCE_TERMINATORS).filter(|&i| i > 0) {
        let mut end = last + 1;
        if head[end..].starts_with('"') {
            end += 1;
        }
        head = &head[..end];
    }

    let mut cleaned: String = cut_unbalanced_quote(head)
        .chars()
        .filter(|c| !matches!(c, '#' | '*'))
        .collect();
    while cleaned.contains("\n\n") {
        cleaned = cleaned.replace("\n\n", "\n");
    }
    cleaned
}

fn cut_unbalanced_quote(text: &str) -> &str {
    if text.matches('"').count() % 2 == 0 {
        return text;
    }
    match text.rfind('"') {
        Some(i) => text[..i].trim_end(),
        None => text,
    }
}

fn wrap(action: &str) -> String {
    format!("{ACTION_PREFIX}{action}\n")
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn same_word(word: &str, pattern: &str) -> bool {
    let (mut w, mut p) = (word.chars(), pattern.chars());
    match (w.next(), p.next()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(&b) && w.eq(p),
        _ => false,
    }
}

/// `I` is upper case everywhere, so it only keeps a capital at the start
/// of a sentence.
fn should_capitalize(source: &str, sentence_start: bool) -> bool {
    let upper = source.chars().next().is_some_and(char::is_uppercase);
    upper && (sentence_start || !source.starts_with('I'))
}

/// A whitespace-delimited word split into its leading whitespace, its
/// body, and any trailing punctuation.
#[derive(Debug)]
struct Word<'a> {
    lead: &'a str,
    core: &'a str,
    punct: &'a str,
}

fn split_words(span: &str) -> (Vec<Word<'_>>, &str) {
    let mut words = Vec::new();
    let mut rest = span;
    loop {
        let Some(word_start) = rest.find(|c: char| !c.is_whitespace()) else {
            return (words, rest);
        };
        let (lead, tail) = rest.split_at(word_start);
        let word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (word, after) = tail.split_at(word_end);
        let core = word.trim_end_matches(TRAILING_PUNCTUATION);
        words.push(Word {
            lead,
            core,
            punct: &word[core.len()..],
        });
        rest = after;
    }
}

fn convert_span(span: &str, at_text_start: bool) -> String {
    let (words, tail) = split_words(span);
    let mut out = String::with_capacity(span.len() + 16);

    let mut i = 0;
    while i < words.len() {
        let sentence_start = if i == 0 {
            at_text_start
        } else {
            words[i - 1].punct.ends_with(SENTENCE_TERMINATORS)
        };

        let found = PERSON_RULES
            .iter()
            .find_map(|rule| rule.match_at(&words[i..]).map(|count| (rule, count)));

        match found {
            Some((rule, count)) => {
                for (offset, replacement) in rule.to.split(' ').enumerate() {
                    let word = &words[i + offset];
                    out.push_str(word.lead);
                    if offset == 0 && should_capitalize(word.core, sentence_start) {
                        out.push_str(&capitalize(replacement));
                    } else {
                        out.push_str(replacement);
                    }
                    out.push_str(word.punct);
                }
                i += count;
            }
            None => {
                let word = &words[i];
                out.push_str(word.lead);
                out.push_str(word.core);
                out.push_str(word.punct);
                i += 1;
            }
        }
    }

    out.push_str(tail);
    out
}
