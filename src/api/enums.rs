//! Enumeration registry endpoint

use axum::Json;

use crate::models::enums::{registry, RegistryEntry};

use super::AuthenticatedUser;

/// Every enumerated field with its allowed values and default
#[utoipa::path(
    get,
    path = "/enums",
    tag = "enums",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enumeration registry", body = Vec<RegistryEntry>)
    )
)]
pub async fn list_enums(AuthenticatedUser(_ctx): AuthenticatedUser) -> Json<Vec<RegistryEntry>> {
    Json(registry())
}
