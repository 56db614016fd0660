/// Resumatch error types
#[derive(Debug, thiserror::Error)]
pub enum ResumatchError {
    /// Input schema or field validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Embedding vector count or dimension does not match the record set
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Embedding capability unavailable or a call failed
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// A stage was invoked with nothing to work on
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResumatchError {
    /// Create validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create dimension mismatch error
    pub fn dimension_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create embedding provider error
    pub fn embedding_provider<S: Into<String>>(msg: S) -> Self {
        Self::EmbeddingProvider(msg.into())
    }

    /// Create empty input error
    pub fn empty_input<S: Into<String>>(msg: S) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}
