//! Query normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Lowercase, delete ASCII punctuation, then rejoin word tokens with single
/// spaces.
///
/// Punctuation is deleted rather than replaced, so `"what's"` becomes
/// `"whats"`. An empty result means there is nothing to search for.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    WORD_RE
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
