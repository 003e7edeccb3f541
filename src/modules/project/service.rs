use time::OffsetDateTime;
use validator::Validate;

use super::dto::CreateProjectRequest;
use super::model::{NewProject, Project};
use super::repository::ProjectRepository;
use crate::common::error::AppError;
use crate::state::AppState;

pub struct ProjectService;

impl ProjectService {
    pub async fn create(state: AppState, req: CreateProjectRequest) -> Result<Project, AppError> {
        req.validate().map_err(|e| AppError::Validation(e.to_string()))?;

        let record = NewProject {
            title: req.title,
            description: req.description,
            created_at: OffsetDateTime::now_utc(),
        };
        ProjectRepository::insert(state.documents.as_ref(), record).await
    }

    pub async fn list(state: AppState) -> Result<Vec<Project>, AppError> {
        ProjectRepository::find_all(state.documents.as_ref()).await
    }
}
