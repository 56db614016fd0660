use resumatch_common::{AppConfig, ResumatchError, Result};
use resumatch_embed::EmbeddingClient;
use std::fmt;
use tracing::info;

use crate::compose::{compose_query_text, compose_record_text};
use crate::normalize::{clean_resume_text, normalize_records};
use crate::rank::rank_matches;
use crate::report::{match_rows, render_report};
use crate::types::{
    EmbeddingSet, JobRecord, MatchResult, MatchRow, NormalizeSummary, QueryEmbedding, RawRecord,
    ScoreStats,
};

/// Pipeline progress
///
/// Forward transitions require the predecessor stage's output to be
/// non-empty and well-formed; any violation moves to `Failed` and no later
/// stage may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Empty,
    Ingested,
    Normalized,
    Embedded,
    Ranked,
    Reported,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "EMPTY",
            Self::Ingested => "INGESTED",
            Self::Normalized => "NORMALIZED",
            Self::Embedded => "EMBEDDED",
            Self::Ranked => "RANKED",
            Self::Reported => "REPORTED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Explicit context threaded through each stage call
///
/// Holds every stage's materialized output; no ambient shared state, so
/// independent runs stay independently testable.
pub struct PipelineContext {
    config: AppConfig,
    stage: PipelineStage,

    raw: Vec<RawRecord>,
    resume_text: String,

    records: Vec<JobRecord>,
    normalize_summary: Option<NormalizeSummary>,

    job_vectors: Vec<Vec<f32>>,
    query_vector: Vec<f32>,
    model: String,

    matches: Vec<MatchResult>,
    stats: Option<ScoreStats>,
}

impl PipelineContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stage: PipelineStage::Empty,
            raw: Vec::new(),
            resume_text: String::new(),
            records: Vec::new(),
            normalize_summary: None,
            job_vectors: Vec::new(),
            query_vector: Vec::new(),
            model: String::new(),
            matches: Vec::new(),
            stats: None,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn normalize_summary(&self) -> Option<NormalizeSummary> {
        self.normalize_summary
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn stats(&self) -> Option<ScoreStats> {
        self.stats
    }

    /// Build the job embedding artifact for the current run
    pub fn embedding_set(&self) -> EmbeddingSet {
        EmbeddingSet::from_records(self.model.clone(), &self.records, &self.job_vectors)
    }

    /// Build the resume embedding artifact for the current run
    pub fn query_embedding(&self) -> QueryEmbedding {
        QueryEmbedding::new(self.model.clone(), self.query_vector.clone())
    }

    /// Build the match result artifact rows
    pub fn match_rows(&self) -> Vec<MatchRow> {
        match_rows(&self.matches)
    }

    fn fail(&mut self, err: ResumatchError) -> ResumatchError {
        tracing::error!("Pipeline failed at stage {}: {}", self.stage, err);
        self.stage = PipelineStage::Failed;
        err
    }

    fn expect_stage(&mut self, expected: PipelineStage) -> Result<()> {
        if self.stage != expected {
            let err = ResumatchError::internal(format!(
                "Stage transition requires {}, pipeline is at {}",
                expected, self.stage
            ));
            return Err(self.fail(err));
        }
        Ok(())
    }

    /// EMPTY -> INGESTED: accept raw records and the resume text
    pub fn ingest(&mut self, raw: Vec<RawRecord>, resume_text: &str) -> Result<()> {
        self.expect_stage(PipelineStage::Empty)?;

        if raw.is_empty() {
            return Err(self.fail(ResumatchError::empty_input(
                "No raw records to ingest",
            )));
        }

        let resume = clean_resume_text(resume_text);
        if resume.is_empty() {
            return Err(self.fail(ResumatchError::empty_input(
                "Resume text is empty after cleaning",
            )));
        }

        info!("Ingested {} raw records", raw.len());
        self.raw = raw;
        self.resume_text = resume;
        self.stage = PipelineStage::Ingested;
        Ok(())
    }

    /// INGESTED -> NORMALIZED: clean, validate, deduplicate
    pub fn normalize(&mut self) -> Result<()> {
        self.expect_stage(PipelineStage::Ingested)?;

        let (records, summary) = normalize_records(&self.raw, &self.config);
        info!(
            "Normalized {} -> {} records ({} duplicates, {} invalid removed)",
            summary.input, summary.kept, summary.duplicates_removed, summary.invalid_removed
        );

        if records.is_empty() {
            self.normalize_summary = Some(summary);
            return Err(self.fail(ResumatchError::validation(format!(
                "No valid records remain after normalization \
                 ({} invalid, {} duplicates out of {})",
                summary.invalid_removed, summary.duplicates_removed, summary.input
            ))));
        }

        self.records = records;
        self.normalize_summary = Some(summary);
        self.stage = PipelineStage::Normalized;
        Ok(())
    }

    /// NORMALIZED -> EMBEDDED: one batched call for the records, one call
    /// for the resume
    pub async fn embed(&mut self, client: &dyn EmbeddingClient) -> Result<()> {
        self.expect_stage(PipelineStage::Normalized)?;

        let texts: Vec<String> = self
            .records
            .iter()
            .map(|r| compose_record_text(r, self.config.max_record_text_len))
            .collect();
        let query_text = compose_query_text(&self.resume_text, self.config.max_query_text_len);

        let model = self.config.embedding_model.clone();
        let job_vectors = match client.embed_batch(&model, &texts).await {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e)),
        };
        let query_vector = match client.embed(&model, &query_text).await {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e)),
        };

        if job_vectors.len() != self.records.len() {
            return Err(self.fail(ResumatchError::dimension_mismatch(format!(
                "Provider returned {} vectors for {} records",
                job_vectors.len(),
                self.records.len()
            ))));
        }
        if query_vector.is_empty() {
            return Err(self.fail(ResumatchError::embedding_provider(
                "Provider returned an empty resume embedding",
            )));
        }

        info!(
            "Embedded {} records and the resume (model={}, dim={})",
            job_vectors.len(),
            model,
            query_vector.len()
        );
        self.job_vectors = job_vectors;
        self.query_vector = query_vector;
        self.model = model;
        self.stage = PipelineStage::Embedded;
        Ok(())
    }

    /// EMBEDDED -> RANKED: score, sort, select top-N
    pub fn rank(&mut self) -> Result<()> {
        self.expect_stage(PipelineStage::Embedded)?;

        // Vector count must equal record count before RANKED
        if self.job_vectors.len() != self.records.len() {
            return Err(self.fail(ResumatchError::dimension_mismatch(format!(
                "{} vectors for {} records entering the ranker",
                self.job_vectors.len(),
                self.records.len()
            ))));
        }

        let (matches, stats) = match rank_matches(
            &self.query_vector,
            &self.job_vectors,
            &self.records,
            self.config.top_n,
        ) {
            Ok(r) => r,
            Err(e) => return Err(self.fail(e)),
        };

        self.matches = matches;
        self.stats = Some(stats);
        self.stage = PipelineStage::Ranked;
        Ok(())
    }

    /// RANKED -> REPORTED: render the result report
    pub fn report(&mut self) -> Result<String> {
        self.expect_stage(PipelineStage::Ranked)?;

        let stats = match self.stats {
            Some(s) => s,
            None => {
                return Err(self.fail(ResumatchError::internal(
                    "Ranked pipeline has no score statistics",
                )))
            }
        };

        let report = render_report(&self.matches, &stats);
        self.stage = PipelineStage::Reported;
        Ok(report)
    }
}
