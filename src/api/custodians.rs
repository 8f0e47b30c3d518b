//! Custodian (responsible area) API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::custodian::{Custodian, CustodianDraft, CustodianQuery},
    AppState,
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/custodians",
    tag = "custodians",
    security(("bearer_auth" = [])),
    params(CustodianQuery),
    responses(
        (status = 200, description = "Custodians", body = Vec<Custodian>)
    )
)]
pub async fn list_custodians(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<CustodianQuery>,
) -> AppResult<Json<Vec<Custodian>>> {
    let custodians = state.services.custodians.list(&query).await?;
    Ok(Json(custodians))
}

#[utoipa::path(
    get,
    path = "/custodians/{id}",
    tag = "custodians",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Custodian ID")),
    responses(
        (status = 200, description = "Custodian", body = Custodian),
        (status = 404, description = "Custodian not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_custodian(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Custodian>> {
    let custodian = state.services.custodians.get_by_id(id).await?;
    Ok(Json(custodian))
}

#[utoipa::path(
    post,
    path = "/custodians",
    tag = "custodians",
    security(("bearer_auth" = [])),
    request_body = CustodianDraft,
    responses(
        (status = 201, description = "Custodian created", body = Custodian),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_custodian(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<CustodianDraft>,
) -> AppResult<(StatusCode, Json<Custodian>)> {
    let custodian = state.services.custodians.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(custodian)))
}

#[utoipa::path(
    put,
    path = "/custodians/{id}",
    tag = "custodians",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Custodian ID")),
    request_body = CustodianDraft,
    responses(
        (status = 200, description = "Custodian updated", body = Custodian),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_custodian(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<CustodianDraft>,
) -> AppResult<Json<Custodian>> {
    let custodian = state.services.custodians.update(&ctx, id, patch).await?;
    Ok(Json(custodian))
}

#[utoipa::path(
    delete,
    path = "/custodians/{id}",
    tag = "custodians",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Custodian ID")),
    responses(
        (status = 204, description = "Custodian deleted"),
        (status = 409, description = "Equipment still belongs to this area", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_custodian(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.custodians.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
