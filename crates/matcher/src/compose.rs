use crate::types::JobRecord;

/// Segment delimiter for composed embedding text
const DELIMITER: &str = " | ";

/// Truncate to `max_chars` characters, marking the cut with an ellipsis
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Compose the embedding text for one record
///
/// Labeled segments in fixed order, empty segments omitted, description
/// truncated to `max_description_chars`. Pure: same input, same string.
pub fn compose_record_text(record: &JobRecord, max_description_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if !record.title.is_empty() {
        parts.push(format!("Title: {}", record.title));
    }
    if !record.company.is_empty() {
        parts.push(format!("Company: {}", record.company));
    }
    if !record.location.is_empty() {
        parts.push(format!("Location: {}", record.location));
    }
    if !record.description.is_empty() {
        parts.push(format!(
            "Description: {}",
            truncate_chars(&record.description, max_description_chars)
        ));
    }

    parts.join(DELIMITER)
}

/// Compose the embedding text for the resume
pub fn compose_query_text(resume_text: &str, max_chars: usize) -> String {
    truncate_chars(resume_text.trim(), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> JobRecord {
        JobRecord {
            title: "Backend Developer".to_string(),
            company: "Acme".to_string(),
            location: "Saint Louis, MO".to_string(),
            description: "Build and run services.".to_string(),
            url: None,
            source: None,
            scraped_date: None,
        }
    }

    #[test]
    fn test_compose_full_record() {
        let text = compose_record_text(&record(), 1000);
        assert_eq!(
            text,
            "Title: Backend Developer | Company: Acme | Location: Saint Louis, MO | \
             Description: Build and run services."
        );
    }

    #[test]
    fn test_empty_segments_omitted() {
        let mut r = record();
        r.location = String::new();
        let text = compose_record_text(&r, 1000);
        assert_eq!(
            text,
            "Title: Backend Developer | Company: Acme | Description: Build and run services."
        );
    }

    #[test]
    fn test_description_truncated() {
        let mut r = record();
        r.description = "x".repeat(50);
        let text = compose_record_text(&r, 10);
        assert!(text.ends_with(&format!("Description: {}...", "x".repeat(10))));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let r = record();
        assert_eq!(compose_record_text(&r, 1000), compose_record_text(&r, 1000));
    }

    #[test]
    fn test_compose_query_text() {
        assert_eq!(compose_query_text("  resume body  ", 100), "resume body");
        assert_eq!(compose_query_text("abcdef", 3), "abc...");
    }
}
