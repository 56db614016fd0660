use resumatch_common::{ResumatchError, Result};
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::similarity::cosine_similarity;
use crate::types::{JobRecord, MatchResult, ScoreStats};

/// Score every record against the query and select the top matches
///
/// Sorting is stable and descending by score; ties keep original ingestion
/// order, so repeated runs on identical input produce identical ranks.
/// `top_n` larger than the population returns the whole population. Stats
/// are computed over ALL scored records, not just the selected top-N.
pub fn rank_matches(
    query: &[f32],
    job_vectors: &[Vec<f32>],
    records: &[JobRecord],
    top_n: usize,
) -> Result<(Vec<MatchResult>, ScoreStats)> {
    if query.is_empty() {
        return Err(ResumatchError::empty_input(
            "Query vector is absent or empty; nothing to rank against",
        ));
    }
    if job_vectors.is_empty() {
        return Err(ResumatchError::empty_input(
            "No job vectors to rank; ranking never ran",
        ));
    }
    if job_vectors.len() != records.len() {
        return Err(ResumatchError::dimension_mismatch(format!(
            "Embedding count {} does not match record count {}",
            job_vectors.len(),
            records.len()
        )));
    }
    for (i, v) in job_vectors.iter().enumerate() {
        if v.len() != query.len() {
            return Err(ResumatchError::dimension_mismatch(format!(
                "Job vector {} has dimension {}, query has {}",
                i,
                v.len(),
                query.len()
            )));
        }
    }

    // Scoring pass, O(N*D)
    let scores: Vec<f32> = job_vectors
        .iter()
        .map(|v| cosine_similarity(query, v))
        .collect();

    let stats = compute_stats(&scores);
    debug!(
        "Scored {} records - mean={:.4}, median={:.4}, max={:.4}",
        stats.count, stats.mean, stats.median, stats.max
    );

    // Stable sort keeps ingestion order on ties
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });

    let selected = top_n.min(order.len());
    let matches: Vec<MatchResult> = order[..selected]
        .iter()
        .enumerate()
        .map(|(i, &idx)| MatchResult {
            record: records[idx].clone(),
            score: scores[idx],
            rank: i + 1,
        })
        .collect();

    info!(
        "Ranking complete - {} matches selected from {} records",
        matches.len(),
        records.len()
    );

    Ok((matches, stats))
}

/// Mean, median and maximum over a score set
fn compute_stats(scores: &[f32]) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            max: 0.0,
        };
    }

    let mean = scores.iter().sum::<f32>() / scores.len() as f32;
    let max = scores.iter().copied().fold(f32::MIN, f32::max);

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    ScoreStats {
        count: scores.len(),
        mean,
        median,
        max,
    }
}
