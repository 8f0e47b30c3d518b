//! Read-only queries used by entity resolution and record validation

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::{person::PersonQuery, EquipmentCode, MaintenancePerson},
    validation::{RefTable, UniqueKey},
};

/// Reference queries the resolver and validators depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Minimal equipment catalog (id, code, brand, model)
    async fn equipment_codes(&self) -> AppResult<Vec<EquipmentCode>>;

    /// Substring search over the personnel catalog
    async fn search_people(&self, query: &str) -> AppResult<Vec<MaintenancePerson>>;

    async fn exists(&self, table: RefTable, id: i32) -> AppResult<bool>;

    /// Whether another row (other than `exclude_id`) already holds `value`
    async fn is_taken(&self, key: UniqueKey, value: &str, exclude_id: Option<i32>) -> AppResult<bool>;
}

#[async_trait]
impl ReferenceLookup for Repository {
    async fn equipment_codes(&self) -> AppResult<Vec<EquipmentCode>> {
        self.equipment_min().await
    }

    async fn search_people(&self, query: &str) -> AppResult<Vec<MaintenancePerson>> {
        self.people_list(&PersonQuery {
            q: Some(query.to_string()),
            position_id: None,
        })
        .await
    }

    async fn exists(&self, table: RefTable, id: i32) -> AppResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table.table());
        let found: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(found)
    }

    async fn is_taken(&self, key: UniqueKey, value: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND ($2::int IS NULL OR id <> $2))",
            key.table(),
            key.column()
        );
        let taken: bool = sqlx::query_scalar(&sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }
}
