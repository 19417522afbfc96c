//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: the six
//! HTTP endpoints plus the user, payload, and error schemas. Swagger UI
//! serves the document in debug builds.

use utoipa::OpenApi;

use crate::domain::{DomainError, ErrorCode, User};
use crate::inbound::http::status::StatusResponse;
use crate::inbound::http::users::UserPayload;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "Minimal CRUD interface over user records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::status::service_status,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(User, UserPayload, StatusResponse, DomainError, ErrorCode)),
    tags(
        (name = "users", description = "Operations on user records"),
        (name = "status", description = "Service status")
    )
)]
pub struct ApiDoc;
