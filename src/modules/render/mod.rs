use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod params;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(handler::create_render).get(handler::list_renders))
}
