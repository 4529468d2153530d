//! Corpus loading.
//!
//! The corpus is a JSON file holding either a bare array of projects or an
//! object with a `projects` array (the site's project data file). Extra
//! fields on each project are ignored.

use crate::types::ProjectRecord;
use folio_core::{AppError, AppResult};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Bare(Vec<ProjectRecord>),
    Wrapped { projects: Vec<ProjectRecord> },
}

/// Load and validate the project corpus.
///
/// Fails if the file is missing, is not valid JSON of a supported shape,
/// or contains a project with an empty or duplicate title.
pub fn load_corpus(path: &Path) -> AppResult<Vec<ProjectRecord>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Corpus(format!("Failed to read corpus {:?}: {}", path, e)))?;

    let records = parse_corpus(&contents).map_err(|e| match e {
        AppError::Corpus(msg) => AppError::Corpus(format!("{:?}: {}", path, msg)),
        other => other,
    })?;

    tracing::info!("Loaded {} projects from {:?}", records.len(), path);
    Ok(records)
}

/// Parse corpus JSON text.
pub fn parse_corpus(contents: &str) -> AppResult<Vec<ProjectRecord>> {
    let file: CorpusFile = serde_json::from_str(contents).map_err(|e| {
        AppError::Corpus(format!(
            "expected an array of projects or {{\"projects\": [...]}}: {}",
            e
        ))
    })?;

    let records = match file {
        CorpusFile::Bare(records) => records,
        CorpusFile::Wrapped { projects } => projects,
    };

    validate_records(&records)?;
    Ok(records)
}

fn validate_records(records: &[ProjectRecord]) -> AppResult<()> {
    let mut seen = HashSet::new();

    for (position, record) in records.iter().enumerate() {
        if record.title.trim().is_empty() {
            return Err(AppError::Corpus(format!(
                "project at position {} has an empty title",
                position
            )));
        }
        if !seen.insert(record.title.as_str()) {
            return Err(AppError::Corpus(format!(
                "duplicate project title '{}'",
                record.title
            )));
        }
    }

    Ok(())
}
