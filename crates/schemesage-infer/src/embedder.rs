//! Embedding engine trait.
//!
//! The retrieval core only ever sees `encode(text) -> vector`. Implementations:
//! - `OnnxEmbedder`: ONNX Runtime with paraphrase-MiniLM-L6-v2 (feature `onnx`)
//! - `HashingEmbedder`: FNV-1a feature hashing, deterministic and model-free
//! - `CachedEmbedder`: memoising wrapper around any backend

use ndarray::Array1;
use schemesage_core::Result;

/// Trait for embedding backends.
///
/// Must tolerate concurrent calls from many request handlers.
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    fn encode(&self, text: &str) -> Result<Array1<f32>>;

    /// Generate embeddings for a batch of texts, in input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// Length of every vector this backend produces.
    fn dimension(&self) -> usize;

    /// Short identifier for logs and stats.
    fn name(&self) -> &str;
}
