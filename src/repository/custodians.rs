//! Custodian domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::custodian::{Custodian, CustodianQuery, NewCustodian},
};

impl Repository {
    pub async fn custodians_list(&self, query: &CustodianQuery) -> AppResult<Vec<Custodian>> {
        let mut filter = Filter::default();
        filter.contains(&["area_code", "area_name"], query.q.as_deref());

        let sql = format!("SELECT * FROM custodians {} ORDER BY area_code", filter.where_clause());
        let mut builder = sqlx::query_as::<_, Custodian>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn custodians_get_by_id(&self, id: i32) -> AppResult<Custodian> {
        sqlx::query_as::<_, Custodian>("SELECT * FROM custodians WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Custodian {} not found", id)))
    }

    pub async fn custodians_create(&self, data: &NewCustodian) -> AppResult<Custodian> {
        let row = sqlx::query_as::<_, Custodian>(
            "INSERT INTO custodians (area_code, area_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.area_code)
        .bind(&data.area_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn custodians_update(&self, id: i32, data: &NewCustodian) -> AppResult<Custodian> {
        sqlx::query_as::<_, Custodian>(
            r#"
            UPDATE custodians SET area_code = $1, area_name = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&data.area_code)
        .bind(&data.area_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Custodian {} not found", id)))
    }

    pub async fn custodians_count_equipment(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE custodian_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn custodians_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM custodians WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Custodian {} not found", id)));
        }
        Ok(())
    }
}
