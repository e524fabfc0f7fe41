//! Reference vocabulary for the validity filter.
//!
//! Built from an embedded word list, optionally a word-list file, and the
//! catalog's own vocabulary. Lookups also try a handful of inflection
//! strippings so "schemes" or "farmers" resolve to their base entry.

use std::collections::HashSet;
use std::path::Path;

use schemesage_core::Result;
use tracing::info;

const BUILTIN_WORDS: &str = include_str!("words.txt");

/// Standard English stop-word list.
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Suffix rewrites tried when a word is not found verbatim.
const INFLECTIONS: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("ses", "s"),
    ("s", ""),
    ("ied", "y"),
    ("ed", ""),
    ("ed", "e"),
    ("ing", ""),
    ("ing", "e"),
];

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashSet<String>,
    stop_words: HashSet<String>,
}

impl Lexicon {
    /// The embedded word list plus the standard stop words.
    pub fn builtin() -> Self {
        let mut lexicon = Self {
            words: HashSet::new(),
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        };
        lexicon.extend(parse_word_list(BUILTIN_WORDS));
        lexicon
    }

    /// Add words; they are lowercased and trimmed.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
    }

    /// Add every word from a one-word-per-line file.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let data = std::fs::read_to_string(path)?;
        let before = self.words.len();
        self.extend(parse_word_list(&data));
        let added = self.words.len() - before;
        info!("Lexicon: {} words added from {}", added, path.display());
        Ok(added)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Whether `word` (lowercase) or one of its base forms is known.
    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        INFLECTIONS.iter().any(|(suffix, replacement)| {
            word.len() > suffix.len() + 2
                && word.ends_with(suffix)
                && self
                    .words
                    .contains(&format!("{}{}", &word[..word.len() - suffix.len()], replacement))
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn parse_word_list(data: &str) -> impl Iterator<Item = &str> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}
