//! Account domain methods on Repository

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        account::{AccountQuery, AccountRow},
        enums::Role,
    },
};

impl Repository {
    pub async fn accounts_list(&self, query: &AccountQuery) -> AppResult<Vec<AccountRow>> {
        let mut filter = Filter::default();
        filter.contains(&["username", "role"], query.q.as_deref());
        filter.equals("role", query.role.as_deref());
        filter.contains(&["username"], query.username.as_deref());

        let sql = format!("SELECT * FROM accounts {} ORDER BY username", filter.where_clause());
        let mut builder = sqlx::query_as::<_, AccountRow>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn accounts_get_by_id(&self, id: i32) -> AppResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
    }

    pub async fn accounts_find_by_username(&self, username: &str) -> AppResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn accounts_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn accounts_create(&self, username: &str, password_hash: &str, role: Role) -> AppResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (username, password_hash, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an account; the password hash is kept when `password_hash` is `None`
    pub async fn accounts_update(
        &self,
        id: i32,
        username: &str,
        password_hash: Option<&str>,
        role: Role,
    ) -> AppResult<AccountRow> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET username = $1, password_hash = COALESCE($2, password_hash), role = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", id)))
    }

    pub async fn accounts_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account {} not found", id)));
        }
        Ok(())
    }

    pub async fn accounts_set_reset_token(&self, id: i32, token: Uuid, expires: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET reset_token = $1, reset_expires = $2 WHERE id = $3")
            .bind(token)
            .bind(expires)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Account holding a reset token that has not expired
    pub async fn accounts_find_by_reset_token(&self, token: Uuid) -> AppResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE reset_token = $1 AND reset_expires > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Store a new password hash and consume the reset token
    pub async fn accounts_reset_password(&self, id: i32, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $1, reset_token = NULL, reset_expires = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
