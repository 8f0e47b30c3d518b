//! Authentication and account management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::{
        account::{
            Account, AccountDraft, AccountQuery, AccountRow, LoginResponse, NewAccount, RequestContext,
            ResetPasswordRequest, SessionClaims,
        },
        enums::Role,
    },
    repository::Repository,
    validation::{validate_account, Mode, Violation},
};

const MIN_PASSWORD_LENGTH: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid username or password";
const RESET_REQUESTED: &str = "If the account exists, a password reset link has been issued";

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Session lifetime in seconds
    pub fn session_seconds(&self) -> u64 {
        self.config.session_hours * 3600
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }

    /// Authenticate by username and password and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let row = self
            .repository
            .accounts_find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !self.verify_password(&row, password)? {
            tracing::warn!(username = %row.username, "rejected login");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token(&row)?;
        tracing::info!(user = %row.username, "login");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.session_seconds(),
            account: row.into(),
        })
    }

    fn create_token(&self, row: &AccountRow) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: row.username.clone(),
            user_id: row.id,
            role: row.role,
            exp: now + self.session_seconds() as i64,
            iat: now,
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, row: &AccountRow, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&row.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn me(&self, ctx: &RequestContext) -> AppResult<Account> {
        Ok(self.repository.accounts_get_by_id(ctx.user_id).await?.into())
    }

    /// Change the caller's own username or password; the role is never touched
    pub async fn update_me(&self, ctx: &RequestContext, patch: AccountDraft) -> AppResult<Account> {
        let existing = self.repository.accounts_get_by_id(ctx.user_id).await?;
        let draft = AccountDraft {
            username: patch.username.or(Some(existing.username)),
            password: patch.password,
            role: Some(existing.role.to_string()),
        };
        let record = validate_account(&self.repository, draft, Mode::Update(ctx.user_id)).await?;
        let updated = self.store(ctx.user_id, &record).await?;
        tracing::info!(user = %ctx.username, id = ctx.user_id, "own account updated");
        Ok(updated)
    }

    /// Issue a reset token for `username`. The answer never reveals whether the
    /// account exists.
    pub async fn forgot_password(&self, username: &str) -> AppResult<String> {
        if let Some(row) = self.repository.accounts_find_by_username(username.trim()).await? {
            let token = Uuid::new_v4();
            let expires = Utc::now() + Duration::minutes(self.config.reset_token_minutes);
            self.repository.accounts_set_reset_token(row.id, token, expires).await?;
            tracing::info!(
                user = %row.username,
                link = %format!("{}/reset-password?token={}", self.config.public_base_url.trim_end_matches('/'), token),
                "password reset issued"
            );
        } else {
            tracing::debug!(username, "password reset requested for unknown account");
        }
        Ok(RESET_REQUESTED.to_string())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AppResult<()> {
        if request.password != request.password_confirmation {
            return Err(AppError::violation(Violation::InvalidValue {
                field: "password_confirmation".to_string(),
                reason: "does not match password".to_string(),
            }));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::violation(Violation::InvalidValue {
                field: "password".to_string(),
                reason: format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            }));
        }
        let expired = || AppError::Validation("Reset token is invalid or has expired".to_string());
        let token = Uuid::parse_str(request.token.trim()).map_err(|_| expired())?;
        let row = self
            .repository
            .accounts_find_by_reset_token(token)
            .await?
            .ok_or_else(expired)?;

        let hash = Self::hash_password(&request.password)?;
        self.repository.accounts_reset_password(row.id, &hash).await?;
        tracing::info!(user = %row.username, "password reset completed");
        Ok(())
    }

    pub async fn list(&self, ctx: &RequestContext, query: &AccountQuery) -> AppResult<Vec<Account>> {
        ctx.require_admin()?;
        let rows = self.repository.accounts_list(query).await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    pub async fn get_by_id(&self, ctx: &RequestContext, id: i32) -> AppResult<Account> {
        ctx.require_admin()?;
        Ok(self.repository.accounts_get_by_id(id).await?.into())
    }

    pub async fn create(&self, ctx: &RequestContext, draft: AccountDraft) -> AppResult<Account> {
        ctx.require_admin()?;
        let record = validate_account(&self.repository, draft, Mode::Create).await?;
        let password = record
            .password
            .as_deref()
            .ok_or_else(|| AppError::Internal("validated account has no password".to_string()))?;
        let hash = Self::hash_password(password)?;
        let created = self
            .repository
            .accounts_create(&record.username, &hash, record.role)
            .await?;
        tracing::info!(user = %ctx.username, id = created.id, account = %created.username, role = %created.role, "account created");
        Ok(created.into())
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, patch: AccountDraft) -> AppResult<Account> {
        ctx.require_admin()?;
        let existing = self.repository.accounts_get_by_id(id).await?;
        let draft = AccountDraft {
            username: patch.username.or(Some(existing.username)),
            password: patch.password,
            role: patch.role.or(Some(existing.role.to_string())),
        };
        let record = validate_account(&self.repository, draft, Mode::Update(id)).await?;
        if id == ctx.user_id && record.role != ctx.role {
            return Err(AppError::Authorization("You cannot change your own role".to_string()));
        }
        let updated = self.store(id, &record).await?;
        tracing::info!(user = %ctx.username, id, "account updated");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        if id == ctx.user_id {
            return Err(AppError::Conflict("You cannot delete your own account".to_string()));
        }
        self.repository.accounts_delete(id).await?;
        tracing::info!(user = %ctx.username, id, "account deleted");
        Ok(())
    }

    async fn store(&self, id: i32, record: &NewAccount) -> AppResult<Account> {
        let hash = record.password.as_deref().map(Self::hash_password).transpose()?;
        let row = self
            .repository
            .accounts_update(id, &record.username, hash.as_deref(), record.role)
            .await?;
        Ok(row.into())
    }

    /// Seed the administrator account when no account exists yet
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        if self.repository.accounts_count().await? > 0 {
            return Ok(());
        }
        let hash = Self::hash_password(&bootstrap.admin_password)?;
        let row = self
            .repository
            .accounts_create(&bootstrap.admin_username, &hash, Role::Admin)
            .await?;
        tracing::warn!(username = %row.username, "seeded bootstrap administrator; change its password");
        Ok(())
    }
}
