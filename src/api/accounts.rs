//! Account management endpoints (administrators only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::account::{Account, AccountDraft, AccountQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List accounts
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(AccountQuery),
    responses(
        (status = 200, description = "Accounts", body = Vec<Account>),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<Vec<Account>>> {
    let accounts = state.services.accounts.list(&ctx, &query).await?;
    Ok(Json(accounts))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Account>> {
    let account = state.services.accounts.get_by_id(&ctx, id).await?;
    Ok(Json(account))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = AccountDraft,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(draft): Json<AccountDraft>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let account = state.services.accounts.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update an account; omitted fields are kept
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Account ID")),
    request_body = AccountDraft,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_account(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(patch): Json<AccountDraft>,
) -> AppResult<Json<Account>> {
    let account = state.services.accounts.update(&ctx, id, patch).await?;
    Ok(Json(account))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 409, description = "Cannot delete your own account", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.accounts.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
