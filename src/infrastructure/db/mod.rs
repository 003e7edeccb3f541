use async_trait::async_trait;
use serde_json::Value;

pub mod memory;
pub mod postgres;

/// A persisted document: an opaque generated id plus the JSON fields it was
/// created with.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document store error: {0}")]
    Backend(String),
}

/// Schemaless metadata store. Records are append-only: there is no update or
/// delete, matching how the editor uses its collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `fields` into `collection` and returns the generated id.
    async fn create_document(&self, collection: &str, fields: Value) -> Result<String, DocumentError>;

    /// Returns documents in insertion order. `filter` is shallow field
    /// equality over the stored JSON.
    async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Document>, DocumentError>;

    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DocumentError>;
}

pub(crate) fn matches_filter(fields: &Value, filter: &Value) -> bool {
    match filter.as_object() {
        Some(wanted) => wanted.iter().all(|(key, value)| fields.get(key) == Some(value)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_is_shallow_field_equality() {
        let doc = json!({"project_id": "p1", "kind": "video", "width": 640});

        assert!(matches_filter(&doc, &json!({"project_id": "p1"})));
        assert!(matches_filter(&doc, &json!({"project_id": "p1", "kind": "video"})));
        assert!(!matches_filter(&doc, &json!({"project_id": "p2"})));
        assert!(!matches_filter(&doc, &json!({"missing": "x"})));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches_filter(&json!({"a": 1}), &json!({})));
    }
}
