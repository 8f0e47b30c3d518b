//! Maintenance person domain methods on Repository

use super::{Filter, Repository};
use crate::{
    error::{AppError, AppResult},
    models::person::{MaintenancePerson, NewPerson, PersonQuery},
};

const SELECT_PERSON: &str = r#"
    SELECT p.*, pos.name AS position_name
    FROM maintenance_people p
    LEFT JOIN positions pos ON pos.id = p.position_id
"#;

impl Repository {
    /// List people, ordered by family then given names
    pub async fn people_list(&self, query: &PersonQuery) -> AppResult<Vec<MaintenancePerson>> {
        let mut filter = Filter::default();
        filter.contains(
            &[
                "p.national_id",
                "p.given_names",
                "p.family_names",
                "(p.family_names || ', ' || p.given_names)",
                "p.email",
                "p.phone",
            ],
            query.q.as_deref(),
        );
        filter.id("p.position_id", query.position_id);

        let sql = format!(
            "{} {} ORDER BY p.family_names, p.given_names, p.id",
            SELECT_PERSON,
            filter.where_clause()
        );
        let mut builder = sqlx::query_as::<_, MaintenancePerson>(&sql);
        for param in filter.params() {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    pub async fn people_get_by_id(&self, id: i32) -> AppResult<MaintenancePerson> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PERSON);
        sqlx::query_as::<_, MaintenancePerson>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance person {} not found", id)))
    }

    pub async fn people_create(&self, data: &NewPerson) -> AppResult<MaintenancePerson> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO maintenance_people (national_id, given_names, family_names, position_id, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&data.national_id)
        .bind(&data.given_names)
        .bind(&data.family_names)
        .bind(data.position_id)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(&self.pool)
        .await?;
        self.people_get_by_id(id).await
    }

    pub async fn people_update(&self, id: i32, data: &NewPerson) -> AppResult<MaintenancePerson> {
        let result = sqlx::query(
            r#"
            UPDATE maintenance_people
            SET national_id = $1, given_names = $2, family_names = $3, position_id = $4,
                email = $5, phone = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&data.national_id)
        .bind(&data.given_names)
        .bind(&data.family_names)
        .bind(data.position_id)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance person {} not found", id)));
        }
        self.people_get_by_id(id).await
    }

    /// Number of maintenance records assigned to this person
    pub async fn people_count_maintenance(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM maintenance WHERE person_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn people_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance person {} not found", id)));
        }
        Ok(())
    }
}
