//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Zerg Users API",
        version = "0.1.0",
        description = "User CRUD backed by MongoDB, with change events on NATS JetStream"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
pub struct ApiDoc;

/// Service info merged with the users domain paths and schemas
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(domain_users::ApiDoc::openapi());
    doc
}
