//! Position API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::position::{Position, PositionDraft, PositionPatch, PositionQuery},
    AppState,
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/positions",
    tag = "positions",
    security(("bearer_auth" = [])),
    params(PositionQuery),
    responses(
        (status = 200, description = "Positions", body = Vec<Position>)
    )
)]
pub async fn list_positions(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<PositionQuery>,
) -> AppResult<Json<Vec<Position>>> {
    let positions = state.services.positions.list(&query).await?;
    Ok(Json(positions))
}

#[utoipa::path(
    get,
    path = "/positions/{id}",
    tag = "positions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position", body = Position),
        (status = 404, description = "Position not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_position(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Position>> {
    let position = state.services.positions.get_by_id(id).await?;
    Ok(Json(position))
}

#[utoipa::path(
    post,
    path = "/positions",
    tag = "positions",
    security(("bearer_auth" = [])),
    request_body = PositionDraft,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_position(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<PositionDraft>,
) -> AppResult<(StatusCode, Json<Position>)> {
    let position = state.services.positions.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

/// Update a position; `description: null` clears the description
#[utoipa::path(
    put,
    path = "/positions/{id}",
    tag = "positions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Position ID")),
    request_body = PositionPatch,
    responses(
        (status = 200, description = "Position updated", body = Position),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_position(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<PositionPatch>,
) -> AppResult<Json<Position>> {
    let position = state.services.positions.update(&ctx, id, patch).await?;
    Ok(Json(position))
}

#[utoipa::path(
    delete,
    path = "/positions/{id}",
    tag = "positions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Position ID")),
    responses(
        (status = 204, description = "Position deleted"),
        (status = 409, description = "Position is still held by someone", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_position(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.positions.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
