//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{Equipment, EquipmentCode, EquipmentDraft, EquipmentQuery, ResolveCodeQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list(&query).await?;
    Ok(Json(equipment))
}

/// Minimal equipment catalog for pickers
#[utoipa::path(
    get,
    path = "/equipment/min",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory codes ordered by code", body = Vec<EquipmentCode>)
    )
)]
pub async fn list_equipment_min(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentCode>>> {
    let codes = state.services.equipment.minimal().await?;
    Ok(Json(codes))
}

/// Resolve an inventory code to its equipment
#[utoipa::path(
    get,
    path = "/equipment/resolve",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(ResolveCodeQuery),
    responses(
        (status = 200, description = "Matching equipment", body = Equipment),
        (status = 400, description = "Unknown or empty code", body = crate::error::ErrorListResponse)
    )
)]
pub async fn resolve_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<ResolveCodeQuery>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.resolve_code(&query.code).await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentDraft,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<EquipmentDraft>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment; omitted fields are kept
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = EquipmentDraft,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<EquipmentDraft>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update(&ctx, id, patch).await?;
    Ok(Json(equipment))
}

/// Delete equipment and its maintenance history
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
