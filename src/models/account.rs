//! Account model and authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, models::enums::Role};

/// Full account row, including credentials
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub reset_token: Option<Uuid>,
    pub reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account as exposed by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create request, also used as a patch on update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AccountDraft {
    #[serde(default)]
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(default, alias = "rol")]
    pub role: Option<String>,
}

/// Validated account fields; `password` is absent when it is left unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AccountQuery {
    /// Substring over username and role
    pub q: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub account: Account,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub username: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// JWT claims for a login session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(&Header::default(), self, &EncodingKey::from_secret(secret.as_bytes()))
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Identity and role of the caller, handed to every service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

impl RequestContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator role required".to_string()))
        }
    }
}

impl From<SessionClaims> for RequestContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_into_context() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "officer1".into(),
            user_id: 3,
            role: Role::Officer,
            exp: now + 3600,
            iat: now,
        };
        let token = claims.create_token("secret").unwrap();
        let ctx: RequestContext = SessionClaims::from_token(&token, "secret").unwrap().into();
        assert_eq!(ctx.username, "officer1");
        assert!(!ctx.is_admin());
        assert!(matches!(ctx.require_admin(), Err(AppError::Authorization(_))));
        assert!(SessionClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "admin".into(),
            user_id: 1,
            role: Role::Admin,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = claims.create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn public_account_hides_credentials() {
        let row = AccountRow {
            id: 1,
            username: "admin".into(),
            password_hash: "$argon2id$...".into(),
            role: Role::Admin,
            reset_token: Some(Uuid::new_v4()),
            reset_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(Account::from(row)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_token").is_none());
        assert_eq!(json["role"], "admin");
    }
}
