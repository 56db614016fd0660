use async_trait::async_trait;
use resumatch_common::Result;

/// Common trait for embedding providers
///
/// Identical text and an identical model must stay ranking-stable across
/// repeat calls. A failed call is fatal to the embedding stage; providers
/// must never substitute a default vector.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate embeddings for an ordered batch of texts
    ///
    /// Returns one vector per input text, in input order, all of the same
    /// dimension.
    async fn embed_batch(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}
