use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;

pub const MOCK_EMBEDDING_DIM: usize = 64;

/// Deterministic in-process embedder.
///
/// Produces normalized bag-of-words vectors: each lowercase alphanumeric token is hashed
/// into one of `dim` buckets. Texts sharing words therefore have positive cosine
/// similarity, which is enough to exercise routing end to end.
#[derive(Debug)]
pub struct MockEmbedder {
    dim: usize,
    latency: Option<Duration>,
    fixed_vector: Option<Vec<f32>>,
    fail_on: Option<String>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(MOCK_EMBEDDING_DIM)
    }
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            latency: None,
            fixed_vector: None,
            fail_on: None,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps for `latency` (on the tokio clock) before every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns `vector` for every input.
    pub fn with_fixed_vector(mut self, vector: Vec<f32>) -> Self {
        self.dim = vector.len();
        self.fixed_vector = Some(vector);
        self
    }

    /// Fails only when asked to embed exactly `text`.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    pub fn failing() -> Self {
        let embedder = Self::default();
        embedder.set_failing(true);
        embedder
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls observed (including health probes).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Computes the vector for `text` without side effects.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(ref fixed) = self.fixed_vector {
            return fixed.clone();
        }

        let mut vector = vec![0.0f32; self.dim.max(1)];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = blake3::hash(token.as_bytes());
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&hash.as_bytes()[..8]);
            let bucket = (u64::from_le_bytes(buf) % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        vector
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.load(Ordering::SeqCst) || self.fail_on.as_deref() == Some(text) {
            return Err(EmbeddingError::RequestFailed {
                url: "mock://embedder".to_string(),
                message: "mock embedder configured to fail".to_string(),
            });
        }

        Ok(self.vector_for(text))
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        self.embed(crate::constants::HEALTH_PROBE_TEXT)
            .await
            .map(|_| ())
    }
}
