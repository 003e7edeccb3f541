use serde_json::json;

use super::model::{NewRender, Render};
use crate::common::error::AppError;
use crate::infrastructure::db::{Document, DocumentStore};

pub struct RenderRepository;

impl RenderRepository {
    pub async fn insert(store: &dyn DocumentStore, record: NewRender) -> Result<Render, AppError> {
        let fields = serde_json::to_value(&record)?;
        let id = store.create_document("render", fields).await?;
        Ok(Render::assemble(id, record))
    }

    pub async fn find_all(
        store: &dyn DocumentStore,
        project_id: Option<&str>,
    ) -> Result<Vec<Render>, AppError> {
        let filter = project_id.map(|pid| json!({"project_id": pid}));
        let docs = store.get_documents("render", filter).await?;
        docs.into_iter().map(parse).collect()
    }
}

fn parse(doc: Document) -> Result<Render, AppError> {
    let fields: NewRender = serde_json::from_value(doc.fields)?;
    Ok(Render::assemble(doc.id, fields))
}
