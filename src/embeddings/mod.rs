// Embedding generation against a local Ollama instance

pub mod ollama;

pub use ollama::{DEFAULT_EMBEDDING_DIMENSION, OllamaClient};

/// Converts text into a fixed-dimension vector. The pipeline depends on this
/// seam rather than a concrete client so tests can substitute deterministic
/// vectors.
pub trait EmbeddingProvider: Send + Sync {
    /// One blocking model call per invocation. No caching, batching, or
    /// retries; a failed call surfaces immediately and the caller must not
    /// proceed with a missing vector.
    fn embed(&self, text: &str) -> crate::Result<Vec<f32>>;
}
