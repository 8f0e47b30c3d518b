//! API handlers for Custodia REST endpoints

pub mod accounts;
pub mod auth;
pub mod custodians;
pub mod enums;
pub mod equipment;
pub mod health;
pub mod locations;
pub mod maintenance;
pub mod openapi;
pub mod people;
pub mod positions;
pub mod reports;
pub mod uploads;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::{
        header::{AUTHORIZATION, X_CONTENT_TYPE_OPTIONS},
        request::Parts,
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::account::{RequestContext, SessionClaims},
    AppState,
};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "custodia_session";

/// Extractor for the authenticated caller, from a Bearer token or the session cookie
pub struct AuthenticatedUser(pub RequestContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|header| {
                header
                    .strip_prefix("Bearer ")
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
            })
            .transpose()?;

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?,
        };

        let claims = SessionClaims::from_token(&token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims.into()))
    }
}

/// Routes served under `/api/v1`
fn api_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.uploads.max_bytes + 64 * 1024;

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        // Accounts
        .route("/accounts", get(accounts::list_accounts).post(accounts::create_account))
        .route(
            "/accounts/:id",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route("/equipment/min", get(equipment::list_equipment_min))
        .route("/equipment/resolve", get(equipment::resolve_equipment))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        // Locations
        .route("/locations", get(locations::list_locations).post(locations::create_location))
        .route(
            "/locations/:id",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        // Custodians
        .route("/custodians", get(custodians::list_custodians).post(custodians::create_custodian))
        .route(
            "/custodians/:id",
            get(custodians::get_custodian)
                .put(custodians::update_custodian)
                .delete(custodians::delete_custodian),
        )
        // Positions
        .route("/positions", get(positions::list_positions).post(positions::create_position))
        .route(
            "/positions/:id",
            get(positions::get_position)
                .put(positions::update_position)
                .delete(positions::delete_position),
        )
        // Maintenance people
        .route("/maintenance-people", get(people::list_people).post(people::create_person))
        .route("/maintenance-people/resolve", get(people::resolve_person))
        .route("/maintenance-people/suggest", get(people::suggest_people))
        .route(
            "/maintenance-people/:id",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        // Maintenance records
        .route("/maintenance", get(maintenance::list_maintenance).post(maintenance::create_maintenance))
        .route("/maintenance/options", get(maintenance::maintenance_options))
        .route(
            "/maintenance/:id",
            get(maintenance::get_maintenance)
                .put(maintenance::update_maintenance)
                .delete(maintenance::delete_maintenance),
        )
        // Enumeration registry
        .route("/enums", get(enums::list_enums))
        // Reports
        .route("/reports/equipment.xlsx", get(reports::equipment_report))
        .route("/reports/locations.xlsx", get(reports::locations_report))
        .route("/reports/maintenance-people.xlsx", get(reports::people_report))
        .route("/reports/maintenance.xlsx", get(reports::maintenance_report))
        .route("/reports/accounts.xlsx", get(reports::accounts_report))
        // Uploads
        .route(
            "/uploads",
            post(uploads::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

/// Full application router: API, stored uploads and documentation
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads_prefix = state.config.uploads.public_prefix.trim_end_matches('/');
    let stored_files = Router::new()
        .nest_service(uploads_prefix, ServeDir::new(&state.config.uploads.dir))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));

    let api_v1 = api_routes(&state).with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(stored_files)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, models::enums::Role, repository::Repository, services::Services};

    /// State over a pool that never connects; handlers rejected before any
    /// query runs can be exercised without a database
    fn state() -> AppState {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = Services::new(Repository::new(pool), &config);
        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    fn token(role: Role) -> String {
        let now = Utc::now().timestamp();
        SessionClaims {
            sub: "tester".into(),
            user_id: 42,
            role,
            exp: now + 600,
            iat: now,
        }
        .create_token(&AppConfig::default().auth.jwt_secret)
        .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router(state())
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn reads_require_a_session() {
        let response = router(state())
            .oneshot(Request::get("/api/v1/equipment").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_tokens_are_rejected() {
        let response = router(state())
            .oneshot(
                Request::get("/api/v1/locations")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mutations_require_admin() {
        let response = router(state())
            .oneshot(
                Request::delete("/api/v1/equipment/1")
                    .header("Authorization", format!("Bearer {}", token(Role::Officer)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn session_cookie_is_accepted() {
        let response = router(state())
            .oneshot(
                Request::post("/api/v1/maintenance")
                    .header("Cookie", format!("{}={}", SESSION_COOKIE, token(Role::User)))
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        // Authenticated, but not an administrator
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn registry_needs_no_database() {
        let response = router(state())
            .oneshot(
                Request::get("/api/v1/enums")
                    .header("Authorization", format!("Bearer {}", token(Role::User)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn account_listing_is_admin_only() {
        let response = router(state())
            .oneshot(
                Request::get("/api/v1/accounts")
                    .header("Authorization", format!("Bearer {}", token(Role::Officer)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
