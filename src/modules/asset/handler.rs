use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use super::dto::AssetResponse;
use super::service::{AssetService, NewUpload};
use crate::common::error::AppError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/assets/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Asset uploaded", body = ApiResponse<AssetResponse>),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Assets"
)]
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut project_id: Option<String> = None;
    let mut upload: Option<NewUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "project_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable project_id field: {e}")))?;
                project_id = Some(value);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field
                    .content_type()
                    .ok_or_else(|| AppError::Validation("unsupported file type: missing content type".to_string()))?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("upload stream interrupted: {e}")))?;
                upload = Some(NewUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let project_id =
        project_id.ok_or_else(|| AppError::Validation("missing project_id field".to_string()))?;
    let upload = upload.ok_or_else(|| AppError::Validation("missing file field".to_string()))?;

    info!(%project_id, filename = %upload.filename, size = upload.bytes.len(), "Starting asset upload");

    let asset = AssetService::ingest(state, project_id, upload).await?;
    Ok(ApiSuccess(
        ApiResponse::success(AssetResponse::from(asset), "Asset uploaded successfully"),
        StatusCode::CREATED,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/assets",
    params(
        ("project_id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "List Assets", body = ApiResponse<Vec<AssetResponse>>)
    ),
    tag = "Assets"
)]
pub async fn list_project_assets(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let assets = AssetService::list_for_project(state, &project_id).await?;
    let responses: Vec<AssetResponse> = assets.into_iter().map(AssetResponse::from).collect();
    Ok(ApiSuccess(
        ApiResponse::success(responses, "Assets retrieved successfully"),
        StatusCode::OK,
    ))
}
