use resumatch_common::AppConfig;
use std::collections::HashSet;
use tracing::debug;

use crate::types::{JobRecord, NormalizeSummary, RawRecord};

/// Placeholder values that scrapers emit for missing fields
const SENTINELS: &[&str] = &[
    "N/A",
    "NA",
    "Unknown",
    "No Description",
    "No Title",
    "No Company",
    "No Location",
    "No URL",
];

/// Title prefixes left over from listing pages
const TITLE_PREFIXES: &[&str] = &["Job:", "Position:", "Hiring:"];

/// Normalize a string for dedup identity: lowercase, trim, collapse
/// internal whitespace
pub fn normalize_identity(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

/// Collapse runs of whitespace to a single space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags (`<p>`, `<br/>`, ...)
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

/// Decode common HTML entities
///
/// `&amp;` is decoded last so `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Whether a value is a known missing-field placeholder
fn is_sentinel(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || SENTINELS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Remove every case-insensitive occurrence of `phrase` from `text`
///
/// Matching is done on a per-char lowercase fold so byte offsets from the
/// lowered string are never applied to the original.
fn remove_phrase_ci(text: &str, phrase: &str) -> String {
    if phrase.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let needle: Vec<char> = phrase
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if i + needle.len() <= folded.len() && folded[i..i + needle.len()] == needle[..] {
            i += needle.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// Clean a free-text field: sentinels, markup, entities, whitespace,
/// boilerplate
pub fn clean_free_text(s: &str, boilerplate: &[String]) -> String {
    if is_sentinel(s) {
        return String::new();
    }

    let mut text = strip_tags(s);
    text = decode_entities(&text);
    text = collapse_whitespace(&text);

    for phrase in boilerplate {
        text = remove_phrase_ci(&text, phrase);
    }

    collapse_whitespace(&text)
}

/// Clean a job title: sentinels, listing-page prefixes, whitespace
pub fn clean_title(s: &str) -> String {
    if is_sentinel(s) {
        return String::new();
    }

    let mut title = collapse_whitespace(s);
    for prefix in TITLE_PREFIXES {
        if let Some(rest) = title.strip_prefix(prefix) {
            title = rest.trim().to_string();
        }
    }

    title
}

/// Canonicalize a location via the alias table; unmapped values pass
/// through unchanged
pub fn clean_location(s: &str, aliases: &[(String, String)]) -> String {
    if is_sentinel(s) {
        return String::new();
    }

    let mut location = collapse_whitespace(s);
    for (from, to) in aliases {
        if location.contains(from.as_str()) {
            location = location.replace(from.as_str(), to);
        }
    }

    location
}

/// Clean an optional auxiliary field (url, source); sentinels become None
fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !is_sentinel(v))
        .map(String::from)
}

/// Clean one raw record into candidate fields; validity is judged after
fn clean_record(raw: &RawRecord, cfg: &AppConfig) -> JobRecord {
    JobRecord {
        title: clean_title(raw.title.as_deref().unwrap_or("")),
        company: collapse_whitespace(
            raw.company
                .as_deref()
                .filter(|c| !is_sentinel(c))
                .unwrap_or(""),
        ),
        location: clean_location(
            raw.location.as_deref().unwrap_or(""),
            &cfg.location_aliases,
        ),
        description: clean_free_text(
            raw.description.as_deref().unwrap_or(""),
            &cfg.boilerplate_phrases,
        ),
        url: clean_optional(&raw.url),
        source: clean_optional(&raw.source),
        scraped_date: clean_optional(&raw.scraped_date),
    }
}

/// Validity predicate from the record schema
fn is_valid(record: &JobRecord, min_description_len: usize) -> bool {
    !record.title.is_empty()
        && !record.company.is_empty()
        && record.description.chars().count() >= min_description_len
}

/// Clean, validate and deduplicate raw records
///
/// Records are processed in input order; the first record seen per dedup
/// identity wins. Invalid records are dropped before dedup consideration.
/// Pure: no I/O beyond the returned collection and counters.
pub fn normalize_records(
    raw: &[RawRecord],
    cfg: &AppConfig,
) -> (Vec<JobRecord>, NormalizeSummary) {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(raw.len());
    let mut kept: Vec<JobRecord> = Vec::with_capacity(raw.len());
    let mut summary = NormalizeSummary {
        input: raw.len(),
        ..Default::default()
    };

    for (i, raw_record) in raw.iter().enumerate() {
        let record = clean_record(raw_record, cfg);

        if !is_valid(&record, cfg.min_description_len) {
            debug!(
                "Dropping invalid record {} (title='{}', company='{}', desc_len={})",
                i,
                record.title,
                record.company,
                record.description.chars().count()
            );
            summary.invalid_removed += 1;
            continue;
        }

        let identity = record.dedup_identity();
        if !seen.insert(identity) {
            debug!(
                "Dropping duplicate record {} ('{}' at '{}')",
                i, record.title, record.company
            );
            summary.duplicates_removed += 1;
            continue;
        }

        kept.push(record);
    }

    summary.kept = kept.len();
    (kept, summary)
}

/// Clean resume text: collapse whitespace, drop non-printable characters
pub fn clean_resume_text(s: &str) -> String {
    let printable: String = s
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    collapse_whitespace(&printable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AppConfig {
        AppConfig::default()
    }

    fn raw(title: &str, company: &str, description: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    fn long_desc(len: usize) -> String {
        "software engineering role with plenty of detail "
            .chars()
            .cycle()
            .take(len)
            .collect()
    }

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("  Software   Engineer "), "software engineer");
        assert_eq!(normalize_identity("ACME Corp"), normalize_identity("acme corp"));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("line<br/>break"), "linebreak");
        assert_eq!(strip_tags("no tags here"), "no tags here");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("R&amp;D"), "R&D");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;quoted&quot;"), "\"quoted\"");
        // double-encoded ampersand decodes one level only
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_remove_phrase_ci() {
        assert_eq!(
            remove_phrase_ci("Great role. APPLY NOW today", "apply now"),
            "Great role.  today"
        );
        assert_eq!(remove_phrase_ci("nothing to remove", "apply now"), "nothing to remove");
    }

    #[test]
    fn test_clean_title_prefixes() {
        assert_eq!(clean_title("Job: Backend Developer"), "Backend Developer");
        assert_eq!(clean_title("Position: Analyst"), "Analyst");
        assert_eq!(clean_title("Hiring: DevOps Engineer"), "DevOps Engineer");
        assert_eq!(clean_title("Plain Title"), "Plain Title");
        assert_eq!(clean_title("No Title"), "");
    }

    #[test]
    fn test_clean_location_aliases() {
        let aliases = cfg().location_aliases;
        assert_eq!(clean_location("St. Louis, MO", &aliases), "Saint Louis, MO");
        assert_eq!(clean_location("KC Metro", &aliases), "Kansas City Metro");
        assert_eq!(clean_location("Chicago, IL", &aliases), "Chicago, IL");
    }

    #[test]
    fn test_clean_free_text_pipeline() {
        let boilerplate = cfg().boilerplate_phrases;
        let cleaned = clean_free_text(
            "<p>Build   APIs &amp; services.</p> Equal Opportunity Employer.",
            &boilerplate,
        );
        assert_eq!(cleaned, "Build APIs & services. .");
    }

    #[test]
    fn test_sentinels_become_empty() {
        let boilerplate = cfg().boilerplate_phrases;
        assert_eq!(clean_free_text("No Description", &boilerplate), "");
        assert_eq!(clean_free_text("N/A", &boilerplate), "");
        assert_eq!(clean_free_text("  ", &boilerplate), "");
    }

    #[test]
    fn test_dedup_scenario_a() {
        // Case/whitespace-insensitive duplicate keeps the first record
        let records = vec![
            raw("Dev", "Acme", &long_desc(60)),
            raw("dev", "ACME", &long_desc(70)),
        ];
        let (kept, summary) = normalize_records(&records, &cfg());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Dev");
        assert_eq!(kept[0].description.chars().count(), 60);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.invalid_removed, 0);
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.input, 2);
    }

    #[test]
    fn test_invalid_records_counted() {
        let records = vec![
            raw("", "Acme", &long_desc(100)),        // no title
            raw("Dev", "", &long_desc(100)),         // no company
            raw("Dev", "Acme", "too short"),         // short description
            raw("Dev", "Acme", &long_desc(100)),     // valid
        ];
        let (kept, summary) = normalize_records(&records, &cfg());

        assert_eq!(kept.len(), 1);
        assert_eq!(summary.invalid_removed, 3);
        assert_eq!(summary.duplicates_removed, 0);
    }

    #[test]
    fn test_invalid_dropped_before_dedup() {
        // An invalid record must not claim a dedup identity
        let records = vec![
            raw("Dev", "Acme", "too short"),
            raw("Dev", "Acme", &long_desc(100)),
        ];
        let (kept, summary) = normalize_records(&records, &cfg());

        assert_eq!(kept.len(), 1);
        assert_eq!(summary.invalid_removed, 1);
        assert_eq!(summary.duplicates_removed, 0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let records = vec![
            raw("Dev", "Acme", &long_desc(80)),
            raw("dev", "ACME", &long_desc(90)),
            raw("Analyst", "Initech", &long_desc(120)),
        ];
        let config = cfg();
        let (first_pass, _) = normalize_records(&records, &config);

        let as_raw: Vec<RawRecord> = first_pass
            .iter()
            .map(|r| RawRecord {
                title: Some(r.title.clone()),
                company: Some(r.company.clone()),
                location: Some(r.location.clone()),
                description: Some(r.description.clone()),
                url: r.url.clone(),
                source: r.source.clone(),
                scraped_date: r.scraped_date.clone(),
            })
            .collect();

        let (second_pass, summary) = normalize_records(&as_raw, &config);
        assert_eq!(second_pass.len(), first_pass.len());
        assert_eq!(summary.duplicates_removed, 0);
        assert_eq!(summary.invalid_removed, 0);
    }

    #[test]
    fn test_output_not_larger_and_identities_unique() {
        let records = vec![
            raw("Dev", "Acme", &long_desc(80)),
            raw("Dev ", " acme", &long_desc(80)),
            raw("Dev", "Initech", &long_desc(80)),
            raw("", "", ""),
        ];
        let (kept, _) = normalize_records(&records, &cfg());

        assert!(kept.len() <= records.len());

        let identities: HashSet<_> = kept.iter().map(|r| r.dedup_identity()).collect();
        assert_eq!(identities.len(), kept.len());
    }

    #[test]
    fn test_clean_resume_text() {
        assert_eq!(
            clean_resume_text("John Doe\n\nPython,\tJava\u{7}"),
            "John Doe Python, Java"
        );
    }
}
