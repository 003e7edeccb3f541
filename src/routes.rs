use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::state::AppState;

pub fn configure_routes(state: &AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(crate::modules::health))
        .nest("/api/v1", api_routes())
        .nest_service("/static", ServeDir::new(&state.config.storage_root))
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", crate::modules::project::router())
        .nest("/assets", crate::modules::asset::router())
        .nest("/renders", crate::modules::render::router())
}
