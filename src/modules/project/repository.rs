use super::model::{NewProject, Project};
use crate::common::error::AppError;
use crate::infrastructure::db::{Document, DocumentStore};

pub struct ProjectRepository;

impl ProjectRepository {
    pub async fn insert(store: &dyn DocumentStore, record: NewProject) -> Result<Project, AppError> {
        let fields = serde_json::to_value(&record)?;
        let id = store.create_document("project", fields).await?;
        Ok(Project::assemble(id, record))
    }

    pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<Project>, AppError> {
        let docs = store.get_documents("project", None).await?;
        docs.into_iter().map(parse).collect()
    }
}

fn parse(doc: Document) -> Result<Project, AppError> {
    let fields: NewProject = serde_json::from_value(doc.fields)?;
    Ok(Project::assemble(doc.id, fields))
}
