//! LRU query cache for embedding results.
//!
//! Avoids re-running the model for repeated questions.
//! Default: 1000 entries, 1-hour TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;
use schemesage_core::Result;

use crate::embedder::EmbedderBackend;

struct CacheEntry {
    embedding: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU query cache for embeddings.
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys from least to most recently used.
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(pos);
            self.order.push(key);
        }
    }

    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

impl QueryCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (1000 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(1000, Duration::from_secs(3600))
    }

    /// Get a cached embedding. Returns None on miss or expired entry.
    pub fn get(&self, query: &str) -> Option<Array1<f32>> {
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let (embedding, expired) = match inner.entries.get(query) {
            Some(entry) => (entry.embedding.clone(), entry.inserted_at.elapsed() >= ttl),
            None => return None,
        };

        if expired {
            inner.forget(query);
            return None;
        }
        inner.touch(query);
        Some(embedding)
    }

    /// Insert an embedding into the cache.
    pub fn put(&self, query: String, embedding: Array1<f32>) {
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        let entry = CacheEntry {
            embedding,
            inserted_at: Instant::now(),
        };

        if inner.entries.contains_key(&query) {
            inner.entries.insert(query.clone(), entry);
            inner.touch(&query);
            return;
        }

        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(query.clone());
        inner.entries.insert(query, entry);
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

/// Embedder wrapper that serves repeated texts from a `QueryCache`.
pub struct CachedEmbedder {
    backend: Arc<dyn EmbedderBackend>,
    cache: QueryCache,
}

impl CachedEmbedder {
    pub fn new(backend: Arc<dyn EmbedderBackend>, cache: QueryCache) -> Self {
        Self { backend, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

impl EmbedderBackend for CachedEmbedder {
    fn encode(&self, text: &str) -> Result<Array1<f32>> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit);
        }
        let embedding = self.backend.encode(text)?;
        self.cache.put(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    /// Batches bypass the cache; they only happen while building the index.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
        self.backend.encode_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    fn name(&self) -> &str {
        self.backend.name()
    }
}
