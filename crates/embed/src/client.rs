use async_trait::async_trait;
use reqwest::Client;
use resumatch_common::{ResumatchError, Result};
use tracing::{debug, info};

use crate::embed_trait::EmbeddingClient;
use crate::types::{EmbedRequest, EmbedResponse};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| {
                ResumatchError::embedding_provider(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("Ollama client initialized: {}", base_url);
        Ok(Self { base_url, client })
    }

    /// Generate embedding with custom retry count
    async fn embed_with_retry(
        &self,
        model: &str,
        text: &str,
        max_retries: u32,
    ) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            model,
            text.len()
        );

        let request = EmbedRequest {
            model: model.to_string(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = std::time::Duration::from_secs(2u64.pow(attempt - 1));
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}). Retrying in {:?}...",
                            attempt,
                            max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ResumatchError::embedding_provider("All retries failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ResumatchError::embedding_provider(format!(
                    "Failed to send embedding request: {}",
                    e
                ))
            })?
            .error_for_status()
            .map_err(|e| {
                ResumatchError::embedding_provider(format!("Ollama embedding API error: {}", e))
            })?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            ResumatchError::embedding_provider(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(ResumatchError::embedding_provider(
                "Empty embedding from Ollama",
            ));
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl EmbeddingClient for OllamaClient {
    async fn embed_batch(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        info!("Embedding batch of {} texts with {}", texts.len(), model);

        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let embedding = self.embed_with_retry(model, text, 3).await.map_err(|e| {
                ResumatchError::embedding_provider(format!(
                    "Batch failed at text {}/{}: {}",
                    i + 1,
                    texts.len(),
                    e
                ))
            })?;

            // Dimension must be consistent across the batch
            if let Some(first) = embeddings.first() {
                if first.len() != embedding.len() {
                    return Err(ResumatchError::dimension_mismatch(format!(
                        "Embedding {} has dimension {}, expected {}",
                        i,
                        embedding.len(),
                        first.len()
                    )));
                }
            }

            embeddings.push(embedding);
        }

        info!("Batch embedding complete - {} vectors", embeddings.len());
        Ok(embeddings)
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(model, text, 3).await
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            ResumatchError::embedding_provider(format!("Failed to connect to Ollama: {}", e))
        })?;
        Ok(response.status().is_success())
    }
}
