//! Equipment domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, EquipmentCode, EquipmentQuery, NewEquipment},
};

const SELECT_EQUIPMENT: &str = r#"
    SELECT e.*, l.code AS location_code, c.area_code AS custodian_area
    FROM equipment e
    LEFT JOIN locations l ON l.id = e.location_id
    LEFT JOIN custodians c ON c.id = e.custodian_id
"#;

impl Repository {
    /// List equipment matching the filters, ordered by inventory code
    pub async fn equipment_list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let mut filter = Filter::default();
        filter.contains(
            &["e.inventory_code", "e.serial", "e.brand", "e.model"],
            query.q.as_deref(),
        );
        filter.equals("e.equipment_type", query.equipment_type.as_deref());
        filter.equals("e.state", query.state.as_deref());
        filter.id("e.location_id", query.location_id);
        filter.id("e.custodian_id", query.custodian_id);

        let sql = format!("{} {} ORDER BY e.inventory_code", SELECT_EQUIPMENT, filter.where_clause());
        let mut builder = sqlx::query_as::<_, Equipment>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Get equipment by ID
    pub async fn equipment_get_by_id(&self, id: i32) -> AppResult<Equipment> {
        let sql = format!("{} WHERE e.id = $1", SELECT_EQUIPMENT);
        sqlx::query_as::<_, Equipment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Minimal catalog for code resolution
    pub async fn equipment_min(&self) -> AppResult<Vec<EquipmentCode>> {
        let rows = sqlx::query_as::<_, EquipmentCode>(
            "SELECT id, inventory_code, brand, model FROM equipment ORDER BY inventory_code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn equipment_create(&self, data: &NewEquipment) -> AppResult<Equipment> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipment (inventory_code, serial, brand, model, equipment_type, state, location_id, custodian_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&data.inventory_code)
        .bind(&data.serial)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.equipment_type)
        .bind(data.state)
        .bind(data.location_id)
        .bind(data.custodian_id)
        .fetch_one(&self.pool)
        .await?;
        self.equipment_get_by_id(id).await
    }

    pub async fn equipment_update(&self, id: i32, data: &NewEquipment) -> AppResult<Equipment> {
        let result = sqlx::query(
            r#"
            UPDATE equipment
            SET inventory_code = $1, serial = $2, brand = $3, model = $4, equipment_type = $5,
                state = $6, location_id = $7, custodian_id = $8, updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&data.inventory_code)
        .bind(&data.serial)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(data.equipment_type)
        .bind(data.state)
        .bind(data.location_id)
        .bind(data.custodian_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        self.equipment_get_by_id(id).await
    }

    /// Delete equipment; its maintenance records go with it
    pub async fn equipment_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
