use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::project::handler::create_project,
        crate::modules::project::handler::list_projects,
        crate::modules::asset::handler::upload_asset,
        crate::modules::asset::handler::list_project_assets,
        crate::modules::render::handler::create_render,
        crate::modules::render::handler::list_renders,
    ),
    components(
        schemas(
            crate::modules::project::dto::CreateProjectRequest,
            crate::modules::project::dto::ProjectResponse,
            crate::modules::asset::dto::AssetResponse,
            crate::modules::asset::model::AssetKind,
            crate::modules::render::dto::RenderRequest,
            crate::modules::render::dto::RenderResponse,
            crate::modules::render::model::RenderStatus,
        )
    ),
    tags(
        (name = "Projects", description = "Project management"),
        (name = "Assets", description = "Media upload and listing"),
        (name = "Renders", description = "Server-side render pipeline")
    )
)]
pub struct ApiDoc;
