use resumatch_common::{ResumatchError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{EmbeddingSet, JobRecord, MatchRow, QueryEmbedding, RawRecord};

/// Keys every input file must carry as columns
const REQUIRED_KEYS: &[&str] = &["title", "company", "location", "description", "url", "source"];

/// Load raw records from a JSON array-of-objects file
///
/// The required key set must be present across the file's objects before
/// any processing; a file that never mentions a required key is rejected
/// with a validation error.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let data = fs::read_to_string(path)?;
    let rows: Vec<Value> = serde_json::from_str(&data)?;

    validate_columns(&rows)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(serde_json::from_value::<RawRecord>(row)?);
    }

    info!("Loaded {} raw records from {}", records.len(), path.display());
    Ok(records)
}

/// Check the input rows carry the required record schema
pub fn validate_columns(rows: &[Value]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for row in rows {
        let obj = row.as_object().ok_or_else(|| {
            ResumatchError::validation("Input rows must be JSON objects")
        })?;
        for key in obj.keys() {
            if let Some(&required) = REQUIRED_KEYS.iter().find(|&&k| k == key.as_str()) {
                seen.insert(required);
            }
        }
    }

    if rows.is_empty() {
        return Ok(());
    }

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .filter(|k| !seen.contains(*k))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(ResumatchError::validation(format!(
            "Input is missing required columns: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Load resume text from a plain text file
pub fn load_resume_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    info!("Loaded resume from {} ({} chars)", path.display(), text.chars().count());
    Ok(text)
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Save normalized records
pub fn save_records(path: &Path, records: &[JobRecord]) -> Result<()> {
    save_json(path, &records)?;
    info!("Saved {} normalized records to {}", records.len(), path.display());
    Ok(())
}

/// Load normalized records
pub fn load_records(path: &Path) -> Result<Vec<JobRecord>> {
    load_json(path)
}

/// Save the job embedding artifact
pub fn save_embedding_set(path: &Path, set: &EmbeddingSet) -> Result<()> {
    save_json(path, set)?;
    info!(
        "Saved {} embeddings (model={}, dim={}) to {}",
        set.vectors.len(),
        set.model,
        set.dimension,
        path.display()
    );
    Ok(())
}

/// Load the job embedding artifact
pub fn load_embedding_set(path: &Path) -> Result<EmbeddingSet> {
    load_json(path)
}

/// Save the resume embedding artifact
pub fn save_query_embedding(path: &Path, query: &QueryEmbedding) -> Result<()> {
    save_json(path, query)?;
    info!(
        "Saved resume embedding (model={}, dim={}) to {}",
        query.model,
        query.dimension,
        path.display()
    );
    Ok(())
}

/// Load the resume embedding artifact
pub fn load_query_embedding(path: &Path) -> Result<QueryEmbedding> {
    load_json(path)
}

/// Save the match result artifact
pub fn save_match_rows(path: &Path, rows: &[MatchRow]) -> Result<()> {
    save_json(path, &rows)?;
    info!("Saved {} match rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_columns_accepts_full_schema() {
        let rows = vec![json!({
            "title": "Dev",
            "company": "Acme",
            "location": "Remote",
            "description": "text",
            "url": "https://example.com",
            "source": "indeed",
            "scraped_date": "2025-08-01"
        })];
        assert!(validate_columns(&rows).is_ok());
    }

    #[test]
    fn test_validate_columns_rejects_missing_keys() {
        let rows = vec![json!({"title": "Dev", "company": "Acme"})];
        let err = validate_columns(&rows).unwrap_err();
        assert!(matches!(err, ResumatchError::Validation(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_validate_columns_rejects_non_objects() {
        let rows = vec![json!("not an object")];
        assert!(matches!(
            validate_columns(&rows).unwrap_err(),
            ResumatchError::Validation(_)
        ));
    }

    #[test]
    fn test_validate_columns_union_across_rows() {
        // Keys may be spread across rows, as long as each appears somewhere
        let rows = vec![
            json!({"title": "Dev", "company": "Acme", "location": "Remote"}),
            json!({"description": "text", "url": "u", "source": "s"}),
        ];
        assert!(validate_columns(&rows).is_ok());
    }

    #[test]
    fn test_records_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("resumatch_records_{}.json", std::process::id()));

        let records = vec![JobRecord {
            title: "Dev".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "A long enough description for the record.".to_string(),
            url: None,
            source: Some("indeed".to_string()),
            scraped_date: None,
        }];

        save_records(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Dev");
        assert_eq!(loaded[0].source.as_deref(), Some("indeed"));
    }

    #[test]
    fn test_load_raw_records_missing_file_is_io_error() {
        let err = load_raw_records(Path::new("/nonexistent/jobs.json")).unwrap_err();
        assert!(matches!(err, ResumatchError::Io(_)));
    }
}
