//! Rejects queries that carry no recognizable content words.

use crate::lexicon::Lexicon;

pub struct ValidityFilter {
    lexicon: Lexicon,
}

impl ValidityFilter {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Content words of `text`: alphanumeric, not stop words, known to the
    /// lexicon.
    pub fn meaningful_words(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|t| !self.lexicon.is_stop_word(t) && self.lexicon.contains(t))
            .collect()
    }

    /// Valid iff at least one meaningful word remains.
    pub fn is_valid(&self, text: &str) -> bool {
        !self.meaningful_words(text).is_empty()
    }
}
