//! Resumatch matching core
//!
//! Normalizes raw job postings, composes embedding texts, ranks records
//! against a resume embedding by cosine similarity, and renders the result
//! report. Network fetching and the embedding model itself live outside
//! this crate; it consumes their outputs through explicit types.

pub mod artifacts;
pub mod compose;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod similarity;
pub mod types;

pub use normalize::normalize_records;
pub use pipeline::{PipelineContext, PipelineStage};
pub use rank::rank_matches;
pub use report::render_report;
pub use similarity::cosine_similarity;
pub use types::{
    EmbeddingSet, JobRecord, MatchResult, MatchRow, NormalizeSummary, QueryEmbedding, RawRecord,
    ScoreStats,
};
