//! Exhaustive L2 nearest-neighbor index over catalog embeddings.
//!
//! Row `i` of the matrix is the embedding of corpus record `i`; the index is
//! built once and never mutated, so it can be shared across request threads
//! without locking.

use std::sync::Arc;

use ndarray::{Array1, Array2};
use schemesage_core::{Error, Result};
use schemesage_infer::EmbedderBackend;
use tracing::{debug, info};

use crate::catalog::Corpus;

pub struct EmbeddingIndex {
    embedder: Arc<dyn EmbedderBackend>,
    /// Shape (N, dim), rows aligned with corpus order.
    matrix: Array2<f32>,
}

impl EmbeddingIndex {
    /// Embed every record's combined text and build the index.
    pub fn build(corpus: &Corpus, embedder: Arc<dyn EmbedderBackend>) -> Result<Self> {
        let texts = corpus.combined_texts();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = embedder.encode_batch(&refs)?;

        if embeddings.len() != corpus.len() {
            return Err(Error::Internal(format!(
                "embedder returned {} vectors for {} records",
                embeddings.len(),
                corpus.len()
            )));
        }

        let index = Self::from_embeddings(embedder, embeddings)?;
        info!(
            "Embedding index built: {} rows, dim={}",
            index.len(),
            index.dimension()
        );
        Ok(index)
    }

    /// Build from precomputed embeddings, one per record in corpus order.
    pub fn from_embeddings(
        embedder: Arc<dyn EmbedderBackend>,
        embeddings: Vec<Array1<f32>>,
    ) -> Result<Self> {
        let dim = embedder.dimension();
        let mut matrix = Array2::<f32>::zeros((embeddings.len(), dim));
        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dim {
                return Err(Error::Internal(format!(
                    "embedding {i} has dimension {}, expected {dim}",
                    embedding.len()
                )));
            }
            matrix.row_mut(i).assign(embedding);
        }
        Ok(Self { embedder, matrix })
    }

    /// Embed query text with the same model the index was built with.
    pub fn encode(&self, text: &str) -> Result<Array1<f32>> {
        self.embedder.encode(text)
    }

    /// Up to `k` record indices, nearest first.
    pub fn search(&self, query: &Array1<f32>, k: usize) -> Result<Vec<usize>> {
        Ok(self
            .search_with_distances(query, k)?
            .into_iter()
            .map(|(i, _)| i)
            .collect())
    }

    /// Up to `k` `(record index, squared L2 distance)` pairs.
    ///
    /// Ordered by ascending distance, ties by record index. NaN distances
    /// rank after every finite one.
    pub fn search_with_distances(&self, query: &Array1<f32>, k: usize) -> Result<Vec<(usize, f32)>> {
        if self.matrix.nrows() == 0 || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension() {
            return Err(Error::Search(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension()
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .matrix
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let diff = &row - query;
                let distance = diff.dot(&diff);
                (i, if distance.is_nan() { f32::INFINITY } else { distance })
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        debug!("Search returned {} of {} rows", scored.len(), self.matrix.nrows());
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    pub fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn embedder(&self) -> &Arc<dyn EmbedderBackend> {
        &self.embedder
    }
}
