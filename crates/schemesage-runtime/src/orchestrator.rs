//! Orchestrator — runs the pipeline for async callers.
//!
//! Screening and assembly are cheap and run inline. Encoding and search go
//! to the blocking pool under a per-request deadline. A semaphore caps how
//! many retrievals occupy that pool; a task abandoned by the deadline keeps
//! its permit until the encode it started returns.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::pipeline::Pipeline;
use crate::types::{Reply, Screened};

/// Default cap on retrievals running on the blocking pool.
pub const MAX_IN_FLIGHT_RETRIEVALS: usize = 8;

pub struct Orchestrator {
    pipeline: Arc<Pipeline>,
    /// Phrase selection only; never held across an await.
    rng: Mutex<StdRng>,
    timeout: Duration,
    retrievals: Arc<Semaphore>,
    retrieval_limit: usize,
}

impl Orchestrator {
    /// Create an orchestrator with an entropy-seeded random source.
    pub fn new(pipeline: Arc<Pipeline>, timeout: Duration) -> Self {
        info!(
            "Orchestrator initialized: {} records, retrieval timeout {:?}, {} concurrent retrievals",
            pipeline.corpus().len(),
            timeout,
            MAX_IN_FLIGHT_RETRIEVALS
        );
        Self::with_rng(pipeline, timeout, StdRng::from_entropy())
    }

    /// Create with a fixed seed (for testing).
    pub fn with_seed(pipeline: Arc<Pipeline>, timeout: Duration, seed: u64) -> Self {
        Self::with_rng(pipeline, timeout, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pipeline: Arc<Pipeline>, timeout: Duration, rng: StdRng) -> Self {
        Self {
            pipeline,
            rng: Mutex::new(rng),
            timeout,
            retrievals: Arc::new(Semaphore::new(MAX_IN_FLIGHT_RETRIEVALS)),
            retrieval_limit: MAX_IN_FLIGHT_RETRIEVALS,
        }
    }

    /// Replace the retrieval cap. Zero is raised to one.
    pub fn with_retrieval_limit(mut self, limit: usize) -> Self {
        let limit = limit.max(1);
        self.retrievals = Arc::new(Semaphore::new(limit));
        self.retrieval_limit = limit;
        self
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retrieval_limit(&self) -> usize {
        self.retrieval_limit
    }

    /// Retrievals holding a permit, including ones whose request timed out.
    pub fn retrievals_in_flight(&self) -> usize {
        self.retrieval_limit.saturating_sub(self.retrievals.available_permits())
    }

    /// Answer one user message. Never fails: every error path has a reply.
    pub async fn answer(&self, raw: &str) -> Reply {
        let screened = {
            let mut rng = self.rng.lock();
            self.pipeline.screen(raw, &mut *rng)
        };
        let query = match screened {
            Screened::Done(reply) => return reply,
            Screened::Retrieve(query) => query,
        };

        // Waiting for a permit counts against the same deadline.
        let retrieval = async {
            let permit = match Arc::clone(&self.retrievals).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Retrieval permits unavailable: {}", e);
                    return Vec::new();
                }
            };
            let pipeline = Arc::clone(&self.pipeline);
            let task_query = query.clone();
            let task = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pipeline.retrieve(&task_query)
            });
            match task.await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(e)) => {
                    warn!("Retrieval failed: {}", e);
                    Vec::new()
                }
                Err(e) => {
                    warn!("Retrieval task aborted: {}", e);
                    Vec::new()
                }
            }
        };

        let candidates = match tokio::time::timeout(self.timeout, retrieval).await {
            Ok(candidates) => candidates,
            Err(_) => {
                warn!(
                    "Retrieval exceeded {:?} ({} in flight)",
                    self.timeout,
                    self.retrievals_in_flight()
                );
                return self.pipeline.timeout_reply();
            }
        };
        debug!("Retrieved {} candidates", candidates.len());

        let mut rng = self.rng.lock();
        self.pipeline.assemble(&query, &candidates, &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{pipeline, sample_corpus, KeywordEmbedder};
    use crate::pipeline::PipelineOptions;
    use crate::types::Outcome;
    use ndarray::Array1;
    use schemesage_core::{Profile, Result};
    use schemesage_infer::EmbedderBackend;
    use schemesage_query::Lexicon;
    use schemesage_store::EmbeddingIndex;

    /// Delegates to `KeywordEmbedder`, but stalls on queries.
    struct SlowEmbedder {
        delay: Duration,
    }

    impl EmbedderBackend for SlowEmbedder {
        fn encode(&self, text: &str) -> Result<Array1<f32>> {
            std::thread::sleep(self.delay);
            KeywordEmbedder.encode(text)
        }

        fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
            texts.iter().map(|t| KeywordEmbedder.encode(t)).collect()
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    /// Produces vectors of the wrong width for queries.
    struct SkewedEmbedder;

    impl EmbedderBackend for SkewedEmbedder {
        fn encode(&self, _text: &str) -> Result<Array1<f32>> {
            Ok(Array1::zeros(5))
        }

        fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
            texts.iter().map(|t| KeywordEmbedder.encode(t)).collect()
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "skewed"
        }
    }

    fn orchestrator_with(embedder: Arc<dyn EmbedderBackend>, timeout: Duration) -> Orchestrator {
        let corpus = sample_corpus();
        let index = Arc::new(EmbeddingIndex::build(&corpus, embedder).unwrap());
        let pipeline = Pipeline::new(
            corpus,
            index,
            Lexicon::builtin(),
            PipelineOptions::for_profile(Profile::Basic),
        )
        .unwrap();
        Orchestrator::with_seed(Arc::new(pipeline), timeout, 7)
    }

    #[tokio::test]
    async fn test_answer_matches_sync_pipeline() {
        let orchestrator = Orchestrator::with_seed(
            Arc::new(pipeline(Profile::Extended)),
            Duration::from_secs(5),
            3,
        );
        let reply = orchestrator.answer("farm loans for growers").await;
        assert_eq!(reply.outcome, Outcome::Answered);
        assert!(reply.text.contains("Kisan Credit<br>"));
    }

    #[tokio::test]
    async fn test_short_circuits_skip_retrieval() {
        let orchestrator = orchestrator_with(
            Arc::new(SlowEmbedder {
                delay: Duration::from_secs(5),
            }),
            Duration::from_millis(50),
        );
        assert_eq!(orchestrator.answer("").await.outcome, Outcome::EmptyInput);
        assert_eq!(orchestrator.answer("hello").await.outcome, Outcome::Greeting);
    }

    #[tokio::test]
    async fn test_slow_retrieval_times_out() {
        let orchestrator = orchestrator_with(
            Arc::new(SlowEmbedder {
                delay: Duration::from_millis(500),
            }),
            Duration::from_millis(20),
        );
        let reply = orchestrator.answer("school fees").await;
        assert_eq!(reply.outcome, Outcome::RetrievalTimeout);
        assert_eq!(reply.text, orchestrator.pipeline().phrases().timeout);
    }

    #[tokio::test]
    async fn test_abandoned_retrievals_stay_bounded() {
        let orchestrator = orchestrator_with(
            Arc::new(SlowEmbedder {
                delay: Duration::from_millis(300),
            }),
            Duration::from_millis(30),
        )
        .with_retrieval_limit(1);
        assert_eq!(orchestrator.retrieval_limit(), 1);

        let first = orchestrator.answer("school fees").await;
        assert_eq!(first.outcome, Outcome::RetrievalTimeout);
        assert_eq!(orchestrator.retrievals_in_flight(), 1);

        // The second request waits on the permit instead of queueing an encode.
        let second = orchestrator.answer("farm loans").await;
        assert_eq!(second.outcome, Outcome::RetrievalTimeout);
        assert_eq!(orchestrator.retrievals_in_flight(), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(orchestrator.retrievals_in_flight(), 0);
    }

    #[tokio::test]
    async fn test_retrieval_error_becomes_no_match() {
        let orchestrator = orchestrator_with(Arc::new(SkewedEmbedder), Duration::from_secs(5));
        let reply = orchestrator.answer("school fees").await;
        assert_eq!(reply.outcome, Outcome::NoMatch);
        assert!(orchestrator.pipeline().phrases().no_match.contains(&reply.text));
    }

    #[tokio::test]
    async fn test_same_seed_same_answers() {
        let a = orchestrator_with(Arc::new(KeywordEmbedder), Duration::from_secs(5));
        let b = orchestrator_with(Arc::new(KeywordEmbedder), Duration::from_secs(5));
        for raw in ["list 3 schemes", "health cover", "good morning"] {
            assert_eq!(a.answer(raw).await, b.answer(raw).await);
        }
    }
}
