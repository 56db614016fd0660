//! Resumatch embedding provider
//!
//! Ollama API client for text embeddings

mod client;
mod embed_trait;
mod types;

pub use client::OllamaClient;
pub use embed_trait::EmbeddingClient;
pub use types::{EmbedRequest, EmbedResponse};
