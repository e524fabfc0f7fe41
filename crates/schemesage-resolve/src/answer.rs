//! Renders retrieved schemes into the reply template.
//!
//! Each scheme becomes one block: a random intro phrase and the scheme
//! name, then one labeled line per field, then a separator. Lines end in
//! `<br>` and labels are bold for the chat client.

use rand::seq::SliceRandom;
use rand::Rng;
use schemesage_core::PhraseTable;
use schemesage_store::{CatalogRecord, Corpus};
use tracing::debug;

/// Hard ceiling on blocks per answer, whatever the user asked for.
pub const MAX_SCHEMES: usize = 10;

const SEPARATOR_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    /// At least one scheme block was rendered.
    Answer {
        text: String,
        blocks: usize,
        /// Whether the "up to 10 schemes" notice was appended.
        capped: bool,
    },
    /// Nothing renderable; `text` is an apology.
    NoMatch { text: String },
}

impl Assembled {
    pub fn text(&self) -> &str {
        match self {
            Self::Answer { text, .. } | Self::NoMatch { text } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Answer { text, .. } | Self::NoMatch { text } => text,
        }
    }
}

pub struct ResponseAssembler {
    phrases: PhraseTable,
}

impl ResponseAssembler {
    pub fn new(phrases: PhraseTable) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &PhraseTable {
        &self.phrases
    }

    /// Render up to `min(requested, MAX_SCHEMES)` candidates in order.
    ///
    /// Falls back to an apology when the list is empty or its first index
    /// lies outside the corpus. Later out-of-range indices are skipped.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        candidates: &[usize],
        requested: usize,
        corpus: &Corpus,
        rng: &mut R,
    ) -> Assembled {
        let first_in_bounds = candidates.first().is_some_and(|&i| i < corpus.len());
        if !first_in_bounds {
            return self.no_match(rng);
        }

        let mut text = String::new();
        let mut blocks = 0;
        for record in candidates
            .iter()
            .take(requested.min(MAX_SCHEMES))
            .filter_map(|&i| corpus.get(i))
        {
            self.render_block(&mut text, record, rng);
            blocks += 1;
        }

        if blocks == 0 {
            return self.no_match(rng);
        }

        let capped = blocks < requested;
        if capped {
            text.push_str(&self.phrases.cap_notice);
        }
        debug!("Assembled {} blocks (requested {}, capped={})", blocks, requested, capped);

        Assembled::Answer {
            text: text.trim().to_string(),
            blocks,
            capped,
        }
    }

    /// One apology drawn from the no-match set.
    pub fn no_match<R: Rng + ?Sized>(&self, rng: &mut R) -> Assembled {
        let text = self
            .phrases
            .no_match
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.phrases.not_understood.clone());
        Assembled::NoMatch { text }
    }

    fn render_block<R: Rng + ?Sized>(&self, out: &mut String, record: &CatalogRecord, rng: &mut R) {
        let intro = self.phrases.intros.choose(rng).map(String::as_str).unwrap_or_default();

        out.push_str(&format!("{} {}<br>", intro, record.name));
        let fields = [
            ("Sector", &record.sector),
            ("Overview", &record.description),
            ("Objectives", &record.objectives),
            ("Eligibility", &record.eligibility_criteria),
            ("Benefits", &record.benefits),
            ("Implementation Agency", &record.implementation_agency),
            ("Application Process", &record.application_process),
            ("Documents Required", &record.documents_required),
        ];
        for (label, value) in fields {
            out.push_str(&format!("<b>{}:</b> {}<br>", label, value));
        }
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push_str("<br>");
    }
}
