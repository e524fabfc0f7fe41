//! Startup wiring: configuration in, ready-to-serve engine out.
//!
//! Runs once before the listener binds. Any error here aborts startup.

use std::path::Path;
use std::sync::Arc;

use schemesage_core::{PhraseTable, Profile, Result, SchemeSageConfig};
use schemesage_infer::{create_embedder, CachedEmbedder, EmbedderBackend};
use schemesage_query::Lexicon;
use schemesage_store::{Corpus, EmbeddingIndex};
use tracing::{info, warn};

use crate::orchestrator::Orchestrator;
use crate::pipeline::{Pipeline, PipelineOptions};

/// Everything the request handlers need, built once.
pub struct Engine {
    pub orchestrator: Arc<Orchestrator>,
    /// Kept for cache statistics; the index holds the same embedder.
    pub embedder: Arc<CachedEmbedder>,
    pub profile: Profile,
    pub generator_model: String,
}

impl Engine {
    pub fn corpus(&self) -> &Arc<Corpus> {
        self.orchestrator.pipeline().corpus()
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        self.orchestrator.pipeline().index()
    }
}

/// Load the catalog, build the embedder and index, assemble the pipeline.
pub fn bootstrap(config: &SchemeSageConfig) -> Result<Engine> {
    let options = pipeline_options(config)?;

    let corpus = Arc::new(schemesage_store::load(&config.catalog_path)?);
    if corpus.is_empty() {
        warn!("Catalog {} has no records", config.catalog_path.display());
    }

    let embedder = create_embedder(config)?;
    let backend: Arc<dyn EmbedderBackend> = embedder.clone();
    let index = Arc::new(EmbeddingIndex::build(&corpus, backend)?);

    let lexicon = build_lexicon(config, &corpus)?;
    let pipeline = Pipeline::new(Arc::clone(&corpus), index, lexicon, options)?;

    info!(
        "SchemeSage ready: profile={}, {} schemes, generator={}",
        config.profile,
        corpus.len(),
        config.generator_model
    );

    Ok(Engine {
        orchestrator: Arc::new(Orchestrator::new(Arc::new(pipeline), config.retrieval_timeout)),
        embedder,
        profile: config.profile,
        generator_model: config.generator_model.clone(),
    })
}

/// Profile defaults, with the phrase table and match mode overridable.
pub fn pipeline_options(config: &SchemeSageConfig) -> Result<PipelineOptions> {
    let mut options = PipelineOptions::for_profile(config.profile);
    options.greeting_match = config.greeting_match;
    if let Some(path) = &config.phrases_path {
        options.phrases = PhraseTable::load(path)?;
        info!("Loaded phrase table from {}", path.display());
    }
    Ok(options)
}

/// Word list read when `SCHEMESAGE_DICTIONARY` is unset.
pub const SYSTEM_DICTIONARY: &str = "/usr/share/dict/words";

/// Built-in words, the catalog's own vocabulary and the dictionary file.
pub fn build_lexicon(config: &SchemeSageConfig, corpus: &Corpus) -> Result<Lexicon> {
    let mut lexicon = Lexicon::builtin();
    lexicon.extend(corpus.vocabulary());
    if let Some(path) = dictionary_file(config) {
        lexicon.extend_from_file(path)?;
    }
    info!("Lexicon holds {} words", lexicon.len());
    Ok(lexicon)
}

/// The configured dictionary, else the system word list if the host has one.
fn dictionary_file(config: &SchemeSageConfig) -> Option<&Path> {
    config.dictionary_path.as_deref().or_else(|| {
        let system = Path::new(SYSTEM_DICTIONARY);
        system.is_file().then_some(system)
    })
}
