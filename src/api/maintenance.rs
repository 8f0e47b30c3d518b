//! Maintenance record API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{
        MaintenanceDraft, MaintenanceOptions, MaintenancePatch, MaintenanceQuery, MaintenanceView,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List maintenance records, most recently scheduled first
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceView>),
        (status = 400, description = "Unparseable date filter", body = crate::error::ErrorListResponse)
    )
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<Vec<MaintenanceView>>> {
    let records = state.services.maintenance.list(&query).await?;
    Ok(Json(records))
}

/// Values offered by the maintenance form
#[utoipa::path(
    get,
    path = "/maintenance/options",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Kinds, priorities and results", body = MaintenanceOptions)
    )
)]
pub async fn maintenance_options(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> Json<MaintenanceOptions> {
    Json(state.services.maintenance.options())
}

#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance record", body = MaintenanceView),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceView>> {
    let record = state.services.maintenance.get_by_id(id).await?;
    Ok(Json(record))
}

/// Create a maintenance record; the equipment may be given as `equipment_id`
/// or `inventory_code`
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = MaintenanceDraft,
    responses(
        (status = 201, description = "Record created", body = MaintenanceView),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<MaintenanceDraft>,
) -> AppResult<(StatusCode, Json<MaintenanceView>)> {
    let record = state.services.maintenance.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    request_body = MaintenancePatch,
    responses(
        (status = 200, description = "Record updated", body = MaintenanceView),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<MaintenancePatch>,
) -> AppResult<Json<MaintenanceView>> {
    let record = state.services.maintenance.update(&ctx, id, patch).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 204, description = "Record deleted")
    )
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
