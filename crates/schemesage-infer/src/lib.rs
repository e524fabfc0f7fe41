//! SchemeSage Infer — embedding engines and query embedding cache.
//!
//! Provides the `EmbedderBackend` trait the retrieval core consumes.
//! When the `onnx` feature is enabled, `OnnxEmbedder` loads a
//! sentence-transformer export; `HashingEmbedder` needs no model files.

pub mod cache;
pub mod embedder;
pub mod hash_embedder;
pub mod onnx_embedder;

pub use cache::{CachedEmbedder, QueryCache};
pub use embedder::EmbedderBackend;
pub use hash_embedder::HashingEmbedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::sync::Arc;

use schemesage_core::{EmbedderKind, Result, SchemeSageConfig};

/// Create the configured embedder, wrapped in a query cache.
///
/// A model that cannot be loaded is an error: the service must not start
/// without its encoder.
pub fn create_embedder(config: &SchemeSageConfig) -> Result<Arc<CachedEmbedder>> {
    let backend: Arc<dyn EmbedderBackend> = match config.embedder {
        EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(config.embedding_dim)?),
        EmbedderKind::Onnx => load_onnx(config)?,
    };

    tracing::info!(
        "Using {} embedder (dim={})",
        backend.name(),
        backend.dimension()
    );
    Ok(Arc::new(CachedEmbedder::new(backend, QueryCache::default_cache())))
}

#[cfg(feature = "onnx")]
fn load_onnx(config: &SchemeSageConfig) -> Result<Arc<dyn EmbedderBackend>> {
    Ok(Arc::new(OnnxEmbedder::load(&config.model_dir)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_config: &SchemeSageConfig) -> Result<Arc<dyn EmbedderBackend>> {
    Err(schemesage_core::Error::Config(
        "ONNX embedder requested but the `onnx` feature is disabled; set SCHEMESAGE_EMBEDDER=hashing".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hashing_embedder() {
        let config = SchemeSageConfig {
            embedder: EmbedderKind::Hashing,
            embedding_dim: 32,
            ..Default::default()
        };
        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.dimension(), 32);
        assert_eq!(embedder.encode("pension").unwrap().len(), 32);
    }

    #[test]
    fn test_missing_onnx_model_is_fatal() {
        let dir = std::env::temp_dir().join("schemesage-no-such-model");
        let config = SchemeSageConfig {
            embedder: EmbedderKind::Onnx,
            model_dir: dir,
            ..Default::default()
        };
        assert!(create_embedder(&config).is_err());
    }
}
