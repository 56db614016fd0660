use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw job posting as loaded from an input file
///
/// Every field is optional; missing keys and sentinel placeholders are
/// resolved by the normalizer, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub scraped_date: Option<String>,
}

/// Validated, cleaned job posting
///
/// Created once by the normalizer; never mutated after validation passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub scraped_date: Option<String>,
}

impl JobRecord {
    /// Dedup identity: normalized (title, company) pair
    pub fn dedup_identity(&self) -> (String, String) {
        (
            crate::normalize::normalize_identity(&self.title),
            crate::normalize::normalize_identity(&self.company),
        )
    }
}

/// Counters produced by the normalizer alongside the kept records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    /// Raw records seen
    pub input: usize,

    /// Records retained after cleaning, validation and dedup
    pub kept: usize,

    /// Records dropped for sharing a dedup identity with an earlier record
    pub duplicates_removed: usize,

    /// Records dropped by the validity predicate
    pub invalid_removed: usize,
}

/// One record's embedding within a batch artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEmbedding {
    /// Position in the normalized record set
    pub index: usize,

    pub title: String,
    pub company: String,

    pub embedding: Vec<f32>,
}

/// Batch embedding artifact for the job records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSet {
    /// Embedding model used
    pub model: String,

    /// Vector dimension shared by every entry
    pub dimension: usize,

    pub vectors: Vec<RecordEmbedding>,
}

impl EmbeddingSet {
    /// Pair records with their vectors, in record order
    pub fn from_records(
        model: impl Into<String>,
        records: &[JobRecord],
        vectors: &[Vec<f32>],
    ) -> Self {
        Self {
            model: model.into(),
            dimension: vectors.first().map(Vec::len).unwrap_or(0),
            vectors: records
                .iter()
                .zip(vectors.iter())
                .enumerate()
                .map(|(index, (record, embedding))| RecordEmbedding {
                    index,
                    title: record.title.clone(),
                    company: record.company.clone(),
                    embedding: embedding.clone(),
                })
                .collect(),
        }
    }

    /// Extract the bare vectors in record order
    pub fn vectors_in_order(&self) -> Vec<Vec<f32>> {
        self.vectors.iter().map(|v| v.embedding.clone()).collect()
    }
}

/// Resume embedding artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEmbedding {
    /// Embedding model used
    pub model: String,

    /// Vector dimension
    pub dimension: usize,

    pub embedding: Vec<f32>,

    /// When the embedding was generated
    pub generated_at: DateTime<Utc>,
}

impl QueryEmbedding {
    pub fn new(model: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            model: model.into(),
            dimension: embedding.len(),
            embedding,
            generated_at: Utc::now(),
        }
    }
}

/// One ranked match
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub record: JobRecord,

    /// Signed cosine similarity against the resume
    pub score: f32,

    /// 1-based dense rank within the selected set
    pub rank: usize,
}

/// Aggregate statistics over ALL scored records, not just the selected top-N
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f32,
    pub median: f32,
    pub max: f32,
}

/// One row of the match result artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRow {
    pub rank: usize,
    pub similarity_score: f32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub source: String,
    pub url: String,
    pub description_preview: String,
}
