//! Startup configuration, read once from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which embedding backend to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Sentence-transformer exported to ONNX (requires the `onnx` feature).
    Onnx,
    /// Deterministic feature hashing, no model files needed.
    Hashing,
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "hashing" | "hash" => Ok(Self::Hashing),
            other => Err(Error::Config(format!("unknown embedder: {other}"))),
        }
    }
}

/// Named pipeline configuration.
///
/// `Basic` runs without the validity filter and with the short phrase
/// lists; `Extended` enables the filter and the long lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Basic,
    Extended,
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            other => Err(Error::Config(format!("unknown profile: {other}"))),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

/// How greeting trigger phrases are matched against normalized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingMatch {
    /// Plain substring containment.
    #[default]
    Substring,
    /// The phrase must start and end on word boundaries.
    Word,
}

impl FromStr for GreetingMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "word" => Ok(Self::Word),
            other => Err(Error::Config(format!("unknown greeting match mode: {other}"))),
        }
    }
}

/// Top-level SchemeSage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeSageConfig {
    /// Bind address.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Catalog spreadsheet or JSON file.
    pub catalog_path: PathBuf,
    /// Directory holding `model.onnx` and `tokenizer.json`.
    pub model_dir: PathBuf,
    pub embedder: EmbedderKind,
    /// Dimension used by the hashing embedder.
    pub embedding_dim: usize,
    /// Generation collaborator identifier. Reported, never invoked.
    pub generator_model: String,
    pub profile: Profile,
    /// Optional JSON phrase table overriding the profile's built-in one.
    pub phrases_path: Option<PathBuf>,
    /// Optional word list extending the built-in lexicon. When unset, the
    /// host's `/usr/share/dict/words` is used if present.
    pub dictionary_path: Option<PathBuf>,
    pub greeting_match: GreetingMatch,
    /// Per-request limit on encode + search.
    pub retrieval_timeout: Duration,
}

impl Default for SchemeSageConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            catalog_path: PathBuf::from("finaldataset.xlsx"),
            model_dir: PathBuf::from("models/paraphrase-MiniLM-L6-v2"),
            embedder: EmbedderKind::Onnx,
            embedding_dim: 384,
            generator_model: "gpt2-medium".into(),
            profile: Profile::Extended,
            phrases_path: None,
            dictionary_path: None,
            greeting_match: GreetingMatch::Substring,
            retrieval_timeout: Duration::from_millis(10_000),
        }
    }
}

impl SchemeSageConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("SCHEMESAGE_HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_number(&port, "PORT")?;
        }
        if let Some(path) = get("SCHEMESAGE_CATALOG") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(path) = get("SCHEMESAGE_MODEL_DIR") {
            config.model_dir = PathBuf::from(path);
        }
        if let Some(kind) = get("SCHEMESAGE_EMBEDDER") {
            config.embedder = kind.parse()?;
        }
        if let Some(dim) = get("SCHEMESAGE_EMBEDDING_DIM") {
            config.embedding_dim = parse_number(&dim, "SCHEMESAGE_EMBEDDING_DIM")?;
            if config.embedding_dim == 0 {
                return Err(Error::Config("SCHEMESAGE_EMBEDDING_DIM must be positive".into()));
            }
        }
        if let Some(model) = get("SCHEMESAGE_GENERATOR") {
            config.generator_model = model;
        }
        if let Some(profile) = get("SCHEMESAGE_PROFILE") {
            config.profile = profile.parse()?;
        }
        config.phrases_path = get("SCHEMESAGE_PHRASES").map(PathBuf::from);
        config.dictionary_path = get("SCHEMESAGE_DICTIONARY").map(PathBuf::from);
        if let Some(mode) = get("SCHEMESAGE_GREETING_MATCH") {
            config.greeting_match = mode.parse()?;
        }
        if let Some(ms) = get("SCHEMESAGE_TIMEOUT_MS") {
            let ms: u64 = parse_number(&ms, "SCHEMESAGE_TIMEOUT_MS")?;
            config.retrieval_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: FromStr>(value: &str, key: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {value}")))
}
