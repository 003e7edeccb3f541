use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{CreateProjectRequest, ProjectResponse};
use super::service::ProjectService;
use crate::common::error::AppError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project Created", body = ApiResponse<ProjectResponse>),
        (status = 400, description = "Bad Request")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let project = ProjectService::create(state, req).await?;
    Ok(ApiSuccess(
        ApiResponse::success(ProjectResponse::from(project), "Project created successfully"),
        StatusCode::CREATED,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "List Projects", body = ApiResponse<Vec<ProjectResponse>>)
    ),
    tag = "Projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let projects = ProjectService::list(state).await?;
    let responses: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(ApiSuccess(
        ApiResponse::success(responses, "Projects retrieved successfully"),
        StatusCode::OK,
    ))
}
