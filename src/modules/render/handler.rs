use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{RenderListQuery, RenderRequest, RenderResponse};
use super::service::RenderService;
use crate::common::error::AppError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/renders",
    request_body = RenderRequest,
    responses(
        (status = 201, description = "Render completed", body = ApiResponse<RenderResponse>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Asset Not Found"),
        (status = 500, description = "Render Failed")
    ),
    tag = "Renders"
)]
pub async fn create_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let render = RenderService::render(state, req).await?;
    Ok(ApiSuccess(
        ApiResponse::success(RenderResponse::from(render), "Render completed successfully"),
        StatusCode::CREATED,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/renders",
    params(RenderListQuery),
    responses(
        (status = 200, description = "List Renders", body = ApiResponse<Vec<RenderResponse>>)
    ),
    tag = "Renders"
)]
pub async fn list_renders(
    State(state): State<AppState>,
    Query(query): Query<RenderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let renders = RenderService::list(state, query.project_id.as_deref()).await?;
    let responses: Vec<RenderResponse> = renders.into_iter().map(RenderResponse::from).collect();
    Ok(ApiSuccess(
        ApiResponse::success(responses, "Renders retrieved successfully"),
        StatusCode::OK,
    ))
}
