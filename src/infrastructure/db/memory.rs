use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{matches_filter, Document, DocumentError, DocumentStore};

/// Process-local metadata store. Backs tests and the no-database dev
/// fallback; documents do not survive a restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_document(&self, collection: &str, fields: Value) -> Result<String, DocumentError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self
            .collections
            .write()
            .map_err(|_| DocumentError::Backend("store lock poisoned".to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document { id: id.clone(), fields });
        Ok(id)
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Document>, DocumentError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| DocumentError::Backend("store lock poisoned".to_string()))?;
        let docs = collections.get(collection).cloned().unwrap_or_default();
        Ok(match filter {
            Some(filter) => docs
                .into_iter()
                .filter(|doc| matches_filter(&doc.fields, &filter))
                .collect(),
            None => docs,
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DocumentError> {
        Ok(())
    }
}
