//! Requested result count extraction ("list 5 schemes").
//!
//! The recognized phrasing is a declarative `CountPattern`: a trigger verb,
//! an optional integer, at most one filler word, then the noun (singular or
//! plural). The value is never capped here.

use once_cell::sync::Lazy;
use regex::Regex;
use schemesage_core::{Error, Result};

pub const DEFAULT_COUNT: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountPattern {
    pub verbs: Vec<String>,
    /// Singular noun; an optional trailing `s` is accepted.
    pub noun: String,
    /// Allow one word between the count and the noun ("list 5 health schemes").
    pub allow_filler: bool,
}

impl Default for CountPattern {
    fn default() -> Self {
        Self {
            verbs: vec!["list".into(), "explain".into(), "describe".into()],
            noun: "scheme".into(),
            allow_filler: true,
        }
    }
}

impl CountPattern {
    fn to_regex(&self) -> Result<Regex> {
        if self.verbs.is_empty() || self.noun.is_empty() {
            return Err(Error::Config("count pattern needs verbs and a noun".into()));
        }
        let verbs = self
            .verbs
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");
        let filler = if self.allow_filler { r"(?:\w+\s+)?" } else { "" };
        let pattern = format!(
            r"(?i)\b(?:{verbs})\s+(\d+)?\s*{filler}{noun}s?",
            noun = regex::escape(&self.noun)
        );
        Regex::new(&pattern).map_err(|e| Error::Config(format!("count pattern: {e}")))
    }
}

pub struct CountExtractor {
    regex: Regex,
}

static DEFAULT_EXTRACTOR: Lazy<CountExtractor> =
    Lazy::new(|| CountExtractor::new(&CountPattern::default()).unwrap());

impl CountExtractor {
    pub fn new(pattern: &CountPattern) -> Result<Self> {
        Ok(Self {
            regex: pattern.to_regex()?,
        })
    }

    /// Requested count in raw (un-normalized) text; `DEFAULT_COUNT` when the
    /// pattern is absent, carries no number, or the number is zero.
    pub fn extract(&self, raw: &str) -> usize {
        let Some(caps) = self.regex.captures(raw) else {
            return DEFAULT_COUNT;
        };
        match caps.get(1) {
            // Digits only, so parsing can fail solely on overflow
            Some(digits) => match digits.as_str().parse::<usize>() {
                Ok(0) => DEFAULT_COUNT,
                Ok(n) => n,
                Err(_) => usize::MAX,
            },
            None => DEFAULT_COUNT,
        }
    }
}

/// Extract with the default list/explain/describe + scheme pattern.
pub fn extract_count(raw: &str) -> usize {
    DEFAULT_EXTRACTOR.extract(raw)
}
