use crate::error::ResumatchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resumatch application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Minimum description length after cleaning
    pub min_description_len: usize,

    /// Maximum composed text length for a job record
    pub max_record_text_len: usize,

    /// Maximum composed text length for the resume
    pub max_query_text_len: usize,

    /// How many top matches to report
    pub top_n: usize,

    /// Directory for stage artifacts
    pub output_dir: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Boilerplate phrases removed from descriptions (case-insensitive)
    pub boilerplate_phrases: Vec<String>,

    /// Location alias table, applied as substring replacements
    pub location_aliases: Vec<(String, String)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            min_description_len: 50,
            max_record_text_len: 1000,
            max_query_text_len: 2000,
            top_n: 10,
            output_dir: PathBuf::from("./out"),
            log_dir: PathBuf::from("./out/log"),
            log_level: "info".to_string(),
            boilerplate_phrases: default_boilerplate(),
            location_aliases: default_location_aliases(),
        }
    }
}

fn default_boilerplate() -> Vec<String> {
    vec![
        "equal opportunity employer".to_string(),
        "apply now".to_string(),
        "click here to apply".to_string(),
        "send resume to".to_string(),
    ]
}

fn default_location_aliases() -> Vec<(String, String)> {
    vec![
        ("St. Louis".to_string(), "Saint Louis".to_string()),
        ("St Louis".to_string(), "Saint Louis".to_string()),
        ("KC".to_string(), "Kansas City".to_string()),
    ]
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, ResumatchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            min_description_len: Self::get_env_usize("MIN_DESCRIPTION_LEN")
                .unwrap_or(defaults.min_description_len),
            max_record_text_len: Self::get_env_usize("MAX_RECORD_TEXT_LEN")
                .unwrap_or(defaults.max_record_text_len),
            max_query_text_len: Self::get_env_usize("MAX_QUERY_TEXT_LEN")
                .unwrap_or(defaults.max_query_text_len),
            top_n: Self::get_env_usize("TOP_N").unwrap_or(defaults.top_n),
            output_dir: Self::get_env_path("OUTPUT_DIR").unwrap_or(defaults.output_dir),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            boilerplate_phrases: defaults.boilerplate_phrases,
            location_aliases: defaults.location_aliases,
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get usize from environment variable
    fn get_env_usize(key: &str) -> Option<usize> {
        std::env::var(key).ok().and_then(|s| s.parse().ok())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), ResumatchError> {
        let dirs = vec![&self.output_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    ResumatchError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get full path for an artifact file
    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ResumatchError> {
        if self.embedding_model.is_empty() {
            return Err(ResumatchError::config("Embedding model name cannot be empty"));
        }

        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(ResumatchError::config(
                "Ollama base URL must start with http:// or https://",
            ));
        }

        if self.top_n == 0 {
            return Err(ResumatchError::config("top_n cannot be 0"));
        }

        if self.max_record_text_len == 0 || self.max_query_text_len == 0 {
            return Err(ResumatchError::config("Composed text lengths cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.min_description_len, 50);
        assert_eq!(config.embedding_model, "nomic-embed-text");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedding_model = String::new();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.ollama_base_url = "localhost:11434".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.top_n = 0;
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_artifact_path() {
        let config = AppConfig::default();
        assert_eq!(
            config.artifact_path("matches.json"),
            PathBuf::from("./out/matches.json")
        );
    }
}
