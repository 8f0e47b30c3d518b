//! Position domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::position::{NewPosition, Position, PositionQuery},
};

impl Repository {
    pub async fn positions_list(&self, query: &PositionQuery) -> AppResult<Vec<Position>> {
        let mut filter = Filter::default();
        filter.contains(&["name", "description"], query.q.as_deref());
        filter.equals("kind", query.kind.as_deref());

        let sql = format!("SELECT * FROM positions {} ORDER BY name", filter.where_clause());
        let mut builder = sqlx::query_as::<_, Position>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn positions_get_by_id(&self, id: i32) -> AppResult<Position> {
        sqlx::query_as::<_, Position>("SELECT * FROM positions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Position {} not found", id)))
    }

    pub async fn positions_create(&self, data: &NewPosition) -> AppResult<Position> {
        let row = sqlx::query_as::<_, Position>(
            "INSERT INTO positions (name, kind, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.kind)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn positions_update(&self, id: i32, data: &NewPosition) -> AppResult<Position> {
        sqlx::query_as::<_, Position>(
            r#"
            UPDATE positions SET name = $1, kind = $2, description = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.kind)
        .bind(&data.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Position {} not found", id)))
    }

    /// Number of people holding this position
    pub async fn positions_count_people(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_people WHERE position_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn positions_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Position {} not found", id)));
        }
        Ok(())
    }
}
