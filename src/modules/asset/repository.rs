use serde_json::json;

use super::model::{Asset, NewAsset};
use crate::common::error::AppError;
use crate::infrastructure::db::{Document, DocumentStore};

pub struct AssetRepository;

impl AssetRepository {
    pub async fn insert(store: &dyn DocumentStore, record: NewAsset) -> Result<Asset, AppError> {
        let fields = serde_json::to_value(&record)?;
        let id = store.create_document("asset", fields).await?;
        Ok(Asset::assemble(id, record))
    }

    pub async fn find_by_project(
        store: &dyn DocumentStore,
        project_id: &str,
    ) -> Result<Vec<Asset>, AppError> {
        let docs = store
            .get_documents("asset", Some(json!({"project_id": project_id})))
            .await?;
        docs.into_iter().map(parse).collect()
    }

    /// Lookup is scoped to the project: an asset id that exists under a
    /// different project is not found.
    pub async fn find_in_project(
        store: &dyn DocumentStore,
        project_id: &str,
        asset_id: &str,
    ) -> Result<Option<Asset>, AppError> {
        let docs = store
            .get_documents("asset", Some(json!({"project_id": project_id})))
            .await?;
        docs.into_iter()
            .find(|doc| doc.id == asset_id)
            .map(parse)
            .transpose()
    }
}

fn parse(doc: Document) -> Result<Asset, AppError> {
    let fields: NewAsset = serde_json::from_value(doc.fields)?;
    Ok(Asset::assemble(doc.id, fields))
}
