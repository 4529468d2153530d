//! Text projection of project records.
//!
//! The same projection is embedded at indexing time and shown to the model
//! at question time, so stored vectors and prompt context always describe
//! the record identically.

use crate::types::ProjectRecord;
use sha2::{Digest, Sha256};

/// Render a record as the text used for embedding and prompt context.
pub fn project(record: &ProjectRecord) -> String {
    format!(
        "Project: {}\nDescription: {}\nTimeline: {}\nTags: {}",
        record.title,
        record.description,
        record.timeline,
        record.tags.join(", ")
    )
}

/// Stable document identity: lowercase hex SHA-256 of the title.
pub fn document_id(record: &ProjectRecord) -> String {
    format!("{:x}", Sha256::digest(record.title.as_bytes()))
}

/// Join projections into one context block, separated by blank lines.
pub fn join_context<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, tags: &[&str]) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            description: "A test project".to_string(),
            timeline: "2024".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_projection_format() {
        let text = project(&record("Alpha", &["demo"]));
        assert_eq!(
            text,
            "Project: Alpha\nDescription: A test project\nTimeline: 2024\nTags: demo"
        );
    }

    #[test]
    fn test_projection_keeps_field_and_tag_order() {
        let text = project(&record("Beta", &["rust", "axum", "rag"]));

        let positions: Vec<usize> = ["Beta", "A test project", "2024", "rust", "axum", "rag"]
            .iter()
            .map(|needle| text.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.ends_with("Tags: rust, axum, rag"));
    }

    #[test]
    fn test_projection_without_tags() {
        let text = project(&record("Gamma", &[]));
        assert!(text.ends_with("Tags: "));
    }

    #[test]
    fn test_document_id_is_stable_and_title_keyed() {
        let a = record("Alpha", &["demo"]);
        let mut a_changed = a.clone();
        a_changed.description = "Rewritten".to_string();

        assert_eq!(document_id(&a), document_id(&a_changed));
        assert_ne!(document_id(&a), document_id(&record("Beta", &[])));
        assert_eq!(document_id(&a).len(), 64);
        assert!(document_id(&a).chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_join_context() {
        assert_eq!(join_context(["a", "b"]), "a\n\nb");
        assert_eq!(join_context(Vec::<&str>::new()), "");
    }
}
