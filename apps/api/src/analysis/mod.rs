// Interview-prep analysis pipeline.
// Seven sequential steps: resume → job → match → questions → guide → premium content → coaching.
// Only the first three call the model, and all of those fall back instead of failing.

pub mod coaching;
pub mod guide;
pub mod handlers;
pub mod job_analyzer;
pub mod match_scorer;
pub mod outcome;
pub mod pipeline;
pub mod premium_content;
pub mod prompts;
pub mod questions;
pub mod resume_extractor;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[A-Za-z_]+\}").expect("valid placeholder regex"));

/// Substitutes `{key}` placeholders in a single pass. Inserted values are
/// never rescanned, and unknown keys are left as written.
pub(crate) fn fill_template<V: AsRef<str>>(template: &str, values: &[(&str, V)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let key = &caps[0];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map_or_else(|| key.to_string(), |(_, v)| v.as_ref().to_string())
        })
        .into_owned()
}

/// Returns at most `max` chars of `text`, cut on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
