use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_project).get(handler::list_projects))
        .route(
            "/{project_id}/assets",
            get(crate::modules::asset::handler::list_project_assets),
        )
}
