//! FNV-1a feature hashing embedder.
//!
//! Each lowercase word token is hashed into one of `dim` signed buckets and
//! the resulting count vector is L2-normalized. Texts sharing vocabulary end
//! up close together, which is enough for model-free deployments and tests.

use ndarray::Array1;
use schemesage_core::{Error, Result};

use crate::embedder::EmbedderBackend;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}

pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::Config("hashing embedder dimension must be positive".into()));
        }
        Ok(Self { dim })
    }
}

impl EmbedderBackend for HashingEmbedder {
    fn encode(&self, text: &str) -> Result<Array1<f32>> {
        let mut vector = Array1::<f32>::zeros(self.dim);
        let lower = text.to_lowercase();

        for token in lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.dot(&vector).sqrt();
        if norm > 1e-9 {
            vector /= norm;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "fnv1a-hashing"
    }
}
