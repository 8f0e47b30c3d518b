//! Authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::AppResult,
    models::account::{
        Account, AccountDraft, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
        ResetPasswordRequest,
    },
    AppState,
};

use super::{AuthenticatedUser, SESSION_COOKIE};

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; the token is also set as a session cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let response = state
        .services
        .accounts
        .login(&request.username, &request.password)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE, response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Get the current account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
) -> AppResult<Json<Account>> {
    let account = state.services.accounts.me(&ctx).await?;
    Ok(Json(account))
}

/// Change the current account's username or password
#[utoipa::path(
    put,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = AccountDraft,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Validation errors", body = crate::error::ErrorListResponse)
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(patch): Json<AccountDraft>,
) -> AppResult<Json<Account>> {
    let account = state.services.accounts.update_me(&ctx, patch).await?;
    Ok(Json(account))
}

/// Request a password reset token
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same answer whether or not the account exists", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let message = state.services.accounts.forgot_password(&request.username).await?;
    Ok(Json(MessageResponse { message }))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Mismatched passwords or expired token", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts.reset_password(request).await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}
