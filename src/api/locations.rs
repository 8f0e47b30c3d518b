//! Location API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::location::{Location, LocationDraft, LocationQuery},
    AppState,
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(LocationQuery),
    responses(
        (status = 200, description = "Locations", body = Vec<Location>)
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state.services.locations.list(&query).await?;
    Ok(Json(locations))
}

#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location", body = Location),
        (status = 404, description = "Location not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Location>> {
    let location = state.services.locations.get_by_id(id).await?;
    Ok(Json(location))
}

#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    request_body = LocationDraft,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<LocationDraft>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let location = state.services.locations.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    put,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    request_body = LocationDraft,
    responses(
        (status = 200, description = "Location updated", body = Location),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<LocationDraft>,
) -> AppResult<Json<Location>> {
    let location = state.services.locations.update(&ctx, id, patch).await?;
    Ok(Json(location))
}

#[utoipa::path(
    delete,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 409, description = "Equipment is still placed at this location", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_location(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.locations.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
