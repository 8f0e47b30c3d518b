//! Repository layer for database operations

pub mod accounts;
pub mod custodians;
pub mod equipment;
pub mod locations;
pub mod lookup;
pub mod maintenance;
pub mod people;
pub mod positions;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round trip to the database, for readiness checks
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// WHERE clause assembled from optional filters, with numbered text parameters
#[derive(Debug, Default)]
pub(crate) struct Filter {
    conditions: Vec<String>,
    params: Vec<String>,
}

impl Filter {
    fn param(&mut self, value: String) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Case-insensitive substring match over any of `columns`; blank input is ignored
    pub fn contains(&mut self, columns: &[&str], q: Option<&str>) {
        let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) else {
            return;
        };
        let n = self.param(format!("%{}%", q));
        let any: Vec<String> = columns.iter().map(|c| format!("{} ILIKE ${}", c, n)).collect();
        self.conditions.push(format!("({})", any.join(" OR ")));
    }

    pub fn equals(&mut self, column: &str, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        let n = self.param(value.to_string());
        self.conditions.push(format!("{} = ${}", column, n));
    }

    pub fn id(&mut self, column: &str, id: Option<i32>) {
        if let Some(id) = id {
            self.conditions.push(format!("{} = {}", column, id));
        }
    }

    /// Compare a timestamp column against a bound instant, e.g. `op = ">="`
    pub fn since(&mut self, column: &str, op: &str, at: Option<chrono::DateTime<chrono::Utc>>) {
        if let Some(at) = at {
            let n = self.param(at.to_rfc3339());
            self.conditions.push(format!("{} {} ${}::timestamptz", column, op, n));
        }
    }

    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}
