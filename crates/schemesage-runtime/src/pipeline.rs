//! Per-request pipeline.
//!
//! `START → EMPTY_INPUT | VALIDITY_CHECK → INVALID | NORMALIZE →
//! NORMALIZE_EMPTY | GREETING_CHECK → SHORT_CIRCUIT | RETRIEVE → ASSEMBLE`.
//! Every terminal state yields a `Reply`; nothing here returns an error to
//! the caller once the pipeline is built.

use std::sync::Arc;

use rand::Rng;
use schemesage_core::{Error, GreetingMatch, PhraseTable, Profile, Result};
use schemesage_query::{normalize, CountExtractor, CountPattern, GreetingDetector, Lexicon, ValidityFilter};
use schemesage_resolve::{Assembled, ResponseAssembler};
use schemesage_store::{Corpus, EmbeddingIndex};
use tracing::{debug, warn};

use crate::types::{Outcome, Query, Reply, Screened};

/// Retrieval always asks the index for at least this many candidates.
pub const MIN_CANDIDATES: usize = 3;

/// Knobs that distinguish the basic and extended deployments.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub validity_filter: bool,
    pub phrases: PhraseTable,
    pub greeting_match: GreetingMatch,
}

impl PipelineOptions {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            validity_filter: profile == Profile::Extended,
            phrases: PhraseTable::for_profile(profile),
            greeting_match: GreetingMatch::default(),
        }
    }
}

pub struct Pipeline {
    corpus: Arc<Corpus>,
    index: Arc<EmbeddingIndex>,
    validity: Option<ValidityFilter>,
    greeting: GreetingDetector,
    counter: CountExtractor,
    assembler: ResponseAssembler,
}

impl Pipeline {
    /// The lexicon is only used when the options enable the validity filter.
    pub fn new(
        corpus: Arc<Corpus>,
        index: Arc<EmbeddingIndex>,
        lexicon: Lexicon,
        options: PipelineOptions,
    ) -> Result<Self> {
        if corpus.len() != index.len() {
            return Err(Error::Internal(format!(
                "index has {} rows for {} catalog records",
                index.len(),
                corpus.len()
            )));
        }
        options.phrases.validate()?;

        Ok(Self {
            corpus,
            index,
            validity: options.validity_filter.then(|| ValidityFilter::new(lexicon)),
            greeting: GreetingDetector::new(&options.phrases, options.greeting_match),
            counter: CountExtractor::new(&CountPattern::default())?,
            assembler: ResponseAssembler::new(options.phrases),
        })
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    pub fn phrases(&self) -> &PhraseTable {
        self.assembler.phrases()
    }

    pub fn validity_enabled(&self) -> bool {
        self.validity.is_some()
    }

    /// Every stage before retrieval: empty check, validity, normalization,
    /// small talk, count extraction.
    pub fn screen<R: Rng + ?Sized>(&self, raw: &str, rng: &mut R) -> Screened {
        let phrases = self.phrases();

        if raw.trim().is_empty() {
            debug!("Screen: empty input");
            return Screened::Done(Reply::new(&phrases.empty_input, Outcome::EmptyInput));
        }

        if let Some(filter) = &self.validity {
            if !filter.is_valid(raw) {
                debug!("Screen: no meaningful words");
                return Screened::Done(Reply::new(&phrases.not_understood, Outcome::InvalidQuery));
            }
        }

        let normalized = normalize(raw);
        if normalized.is_empty() {
            debug!("Screen: nothing left after normalization");
            return Screened::Done(Reply::new(&phrases.not_understood, Outcome::InvalidQuery));
        }

        if let Some(hit) = self.greeting.detect(&normalized, rng) {
            debug!("Screen: {:?} matched on {:?}", hit.kind, hit.phrase);
            return Screened::Done(Reply::new(hit.reply, Outcome::Greeting));
        }

        let requested = self.counter.extract(raw);
        debug!("Screen: retrieving for {:?} (requested {})", normalized, requested);
        Screened::Retrieve(Query {
            raw: raw.to_string(),
            normalized,
            requested,
        })
    }

    /// Nearest records for the normalized query, `max(requested, 3)` of them.
    pub fn retrieve(&self, query: &Query) -> Result<Vec<usize>> {
        let embedding = self.index.encode(&query.normalized)?;
        self.index
            .search(&embedding, query.requested.max(MIN_CANDIDATES))
    }

    pub fn assemble<R: Rng + ?Sized>(&self, query: &Query, candidates: &[usize], rng: &mut R) -> Reply {
        match self
            .assembler
            .assemble(candidates, query.requested, &self.corpus, rng)
        {
            Assembled::Answer { text, .. } => Reply::new(text, Outcome::Answered),
            Assembled::NoMatch { text } => Reply::new(text, Outcome::NoMatch),
        }
    }

    /// Apology used when retrieval fails.
    pub fn no_match<R: Rng + ?Sized>(&self, rng: &mut R) -> Reply {
        Reply::new(self.assembler.no_match(rng).into_text(), Outcome::NoMatch)
    }

    pub fn timeout_reply(&self) -> Reply {
        Reply::new(&self.phrases().timeout, Outcome::RetrievalTimeout)
    }

    /// Run the whole pipeline on the calling thread.
    pub fn respond<R: Rng + ?Sized>(&self, raw: &str, rng: &mut R) -> Reply {
        let query = match self.screen(raw, rng) {
            Screened::Done(reply) => return reply,
            Screened::Retrieve(query) => query,
        };
        match self.retrieve(&query) {
            Ok(candidates) => self.assemble(&query, &candidates, rng),
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                self.no_match(rng)
            }
        }
    }
}
