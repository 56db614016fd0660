use std::collections::HashMap;
use std::fmt::Write;

use crate::types::{MatchResult, MatchRow, ScoreStats};

/// Description preview length in the report and the match artifact
const PREVIEW_CHARS: usize = 200;

/// Round a similarity score for display and the match artifact
fn round_score(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

/// Truncate a description for preview, marking the cut with an ellipsis
fn preview(description: &str) -> String {
    if description.chars().count() <= PREVIEW_CHARS {
        return description.to_string();
    }
    let mut out: String = description.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

/// Build the match artifact rows from ranked results
pub fn match_rows(matches: &[MatchResult]) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| MatchRow {
            rank: m.rank,
            similarity_score: round_score(m.score),
            title: m.record.title.clone(),
            company: m.record.company.clone(),
            location: m.record.location.clone(),
            source: m.record.source.clone().unwrap_or_default(),
            url: m.record.url.clone().unwrap_or_default(),
            description_preview: preview(&m.record.description),
        })
        .collect()
}

/// Count value occurrences, most frequent first; ties alphabetical
fn frequency_breakdown<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut breakdown: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    breakdown
}

/// Render the top matches plus aggregate statistics as display text
pub fn render_report(matches: &[MatchResult], stats: &ScoreStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "TOP {} JOB MATCHES", matches.len());
    let _ = writeln!(out, "{}", "=".repeat(70));

    for m in matches {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", m.rank, m.record.title);
        let _ = writeln!(out, "   Company: {}", m.record.company);
        let _ = writeln!(out, "   Location: {}", m.record.location);
        let _ = writeln!(out, "   Similarity Score: {:.4}", m.score);
        if let Some(source) = &m.record.source {
            let _ = writeln!(out, "   Source: {}", source);
        }
        if let Some(url) = &m.record.url {
            let _ = writeln!(out, "   URL: {}", url);
        }
        let _ = writeln!(out, "   Description: {}", preview(&m.record.description));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary Statistics ({} records scored):", stats.count);
    let _ = writeln!(out, "  Average similarity: {:.4}", stats.mean);
    let _ = writeln!(out, "  Median similarity: {:.4}", stats.median);
    let _ = writeln!(out, "  Best match score: {:.4}", stats.max);

    let companies = frequency_breakdown(matches.iter().map(|m| m.record.company.as_str()));
    if !companies.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Companies in top results:");
        for (company, count) in companies {
            let _ = writeln!(out, "  {}: {} job(s)", company, count);
        }
    }

    let locations = frequency_breakdown(matches.iter().map(|m| m.record.location.as_str()));
    if !locations.is_empty() {
        let _ = writeln!(out, "Locations in top results:");
        for (location, count) in locations {
            let _ = writeln!(out, "  {}: {} job(s)", location, count);
        }
    }

    let sources = frequency_breakdown(
        matches
            .iter()
            .filter_map(|m| m.record.source.as_deref()),
    );
    if !sources.is_empty() {
        let _ = writeln!(out, "Sources in top results:");
        for (source, count) in sources {
            let _ = writeln!(out, "  {}: {} job(s)", source, count);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobRecord;

    fn result(rank: usize, score: f32, title: &str, company: &str) -> MatchResult {
        MatchResult {
            record: JobRecord {
                title: title.to_string(),
                company: company.to_string(),
                location: "Saint Louis, MO".to_string(),
                description: "d".repeat(250),
                url: Some("https://example.com/job".to_string()),
                source: Some("indeed".to_string()),
                scraped_date: None,
            },
            score,
            rank,
        }
    }

    #[test]
    fn test_match_rows_round_and_preview() {
        let rows = match_rows(&[result(1, 0.70712345, "Dev", "Acme")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
        assert!((rows[0].similarity_score - 0.7071).abs() < 1e-6);
        assert_eq!(rows[0].description_preview.chars().count(), 203);
        assert!(rows[0].description_preview.ends_with("..."));
        assert_eq!(rows[0].source, "indeed");
    }

    #[test]
    fn test_short_description_not_padded() {
        let mut m = result(1, 0.5, "Dev", "Acme");
        m.record.description = "short".to_string();
        let rows = match_rows(&[m]);
        assert_eq!(rows[0].description_preview, "short");
    }

    #[test]
    fn test_frequency_breakdown_ordering() {
        let breakdown = frequency_breakdown(["Acme", "Initech", "Acme", ""]);
        assert_eq!(
            breakdown,
            vec![("Acme".to_string(), 2), ("Initech".to_string(), 1)]
        );
    }

    #[test]
    fn test_render_report_contains_stats_and_ranks() {
        let matches = vec![
            result(1, 0.9, "Dev", "Acme"),
            result(2, 0.5, "Analyst", "Initech"),
        ];
        let stats = ScoreStats {
            count: 5,
            mean: 0.42,
            median: 0.4,
            max: 0.9,
        };
        let report = render_report(&matches, &stats);

        assert!(report.contains("TOP 2 JOB MATCHES"));
        assert!(report.contains("1. Dev"));
        assert!(report.contains("2. Analyst"));
        assert!(report.contains("5 records scored"));
        assert!(report.contains("Average similarity: 0.4200"));
        assert!(report.contains("Best match score: 0.9000"));
        assert!(report.contains("Acme: 1 job(s)"));
    }
}
