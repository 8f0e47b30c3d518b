//! Location domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::location::{Location, LocationQuery, NewLocation},
};

impl Repository {
    pub async fn locations_list(&self, query: &LocationQuery) -> AppResult<Vec<Location>> {
        let mut filter = Filter::default();
        filter.contains(&["code", "site", "building", "floor", "room"], query.q.as_deref());

        let sql = format!("SELECT * FROM locations {} ORDER BY code", filter.where_clause());
        let mut builder = sqlx::query_as::<_, Location>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn locations_get_by_id(&self, id: i32) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
    }

    pub async fn locations_create(&self, data: &NewLocation) -> AppResult<Location> {
        let row = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (code, site, building, floor, room)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.code)
        .bind(&data.site)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(&data.room)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn locations_update(&self, id: i32, data: &NewLocation) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET code = $1, site = $2, building = $3, floor = $4, room = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&data.code)
        .bind(&data.site)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(&data.room)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {} not found", id)))
    }

    /// Number of equipment rows placed at this location
    pub async fn locations_count_equipment(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE location_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn locations_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Location {} not found", id)));
        }
        Ok(())
    }
}
