//! Maintenance record domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::maintenance::{Maintenance, MaintenanceFilter, NewMaintenance},
};

const SELECT_MAINTENANCE: &str = r#"
    SELECT m.*,
           e.inventory_code, e.brand AS equipment_brand, e.model AS equipment_model,
           p.national_id AS person_national_id, p.given_names AS person_given_names,
           p.family_names AS person_family_names
    FROM maintenance m
    LEFT JOIN equipment e ON e.id = m.equipment_id
    LEFT JOIN maintenance_people p ON p.id = m.person_id
"#;

impl Repository {
    /// List maintenance records, most recently scheduled first
    pub async fn maintenance_list(&self, query: &MaintenanceFilter) -> AppResult<Vec<Maintenance>> {
        let mut filter = Filter::default();
        filter.id("m.equipment_id", query.equipment_id);
        filter.id("m.person_id", query.person_id);
        filter.equals("m.kind", query.kind.as_deref());
        filter.equals("m.priority", query.priority.as_deref());
        filter.equals("m.result", query.result.as_deref());
        filter.since("m.scheduled_at", ">=", query.from);
        filter.since("m.scheduled_at", "<", query.until);
        filter.contains(
            &["m.description", "m.notes", "e.inventory_code"],
            query.q.as_deref(),
        );

        let sql = format!(
            "{} {} ORDER BY m.scheduled_at DESC NULLS LAST, m.id DESC",
            SELECT_MAINTENANCE,
            filter.where_clause()
        );
        let mut builder = sqlx::query_as::<_, Maintenance>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn maintenance_get_by_id(&self, id: i32) -> AppResult<Maintenance> {
        let sql = format!("{} WHERE m.id = $1", SELECT_MAINTENANCE);
        sqlx::query_as::<_, Maintenance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    pub async fn maintenance_create(&self, data: &NewMaintenance) -> AppResult<Maintenance> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO maintenance (equipment_id, person_id, kind, priority, result,
                                     scheduled_at, executed_at, next_due, description, notes, attachment_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.person_id)
        .bind(data.kind)
        .bind(data.priority)
        .bind(data.result)
        .bind(data.scheduled_at)
        .bind(data.executed_at)
        .bind(data.next_due)
        .bind(&data.description)
        .bind(&data.notes)
        .bind(&data.attachment_url)
        .fetch_one(&self.pool)
        .await?;
        self.maintenance_get_by_id(id).await
    }

    pub async fn maintenance_update(&self, id: i32, data: &NewMaintenance) -> AppResult<Maintenance> {
        let result = sqlx::query(
            r#"
            UPDATE maintenance
            SET equipment_id = $1, person_id = $2, kind = $3, priority = $4, result = $5,
                scheduled_at = $6, executed_at = $7, next_due = $8, description = $9,
                notes = $10, attachment_url = $11, updated_at = NOW()
            WHERE id = $12
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.person_id)
        .bind(data.kind)
        .bind(data.priority)
        .bind(data.result)
        .bind(data.scheduled_at)
        .bind(data.executed_at)
        .bind(data.next_due)
        .bind(&data.description)
        .bind(&data.notes)
        .bind(&data.attachment_url)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance record {} not found", id)));
        }
        self.maintenance_get_by_id(id).await
    }

    pub async fn maintenance_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance record {} not found", id)));
        }
        Ok(())
    }
}
