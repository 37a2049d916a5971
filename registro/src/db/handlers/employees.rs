//! Database repository for employees.

use std::collections::BTreeMap;

use crate::types::EmployeeId;
use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::employees::{EmployeeCreateDBRequest, EmployeeDBResponse, EmployeeUpdateDBRequest, StatsSummary},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::instrument;

/// Filter for listing employees. All fields are optional; an empty filter
/// lists the whole registry.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Case-insensitive substring match against the full name
    pub name: Option<String>,
    /// Exact match against the role
    pub role: Option<String>,
    /// Exact match against the state code
    pub state: Option<String>,
}

// Database entity model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Row shape for the statistics scan
#[derive(Debug, FromRow)]
struct StatsRow {
    pub city: Option<String>,
    pub state: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct Employees<'c> {
    db: &'c SqlitePool,
}

impl<'c> Employees<'c> {
    pub fn new(db: &'c SqlitePool) -> Self {
        Self { db }
    }
}

impl From<Employee> for EmployeeDBResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name,
            address: employee.address,
            neighborhood: employee.neighborhood,
            city: employee.city,
            state: employee.state,
            postal_code: employee.postal_code,
            phone: employee.phone,
            birth_date: employee.birth_date,
            role: employee.role,
            created_at: employee.created_at,
        }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Employees<'c> {
    type CreateRequest = EmployeeCreateDBRequest;
    type UpdateRequest = EmployeeUpdateDBRequest;
    type Response = EmployeeDBResponse;
    type Id = EmployeeId;
    type Filter = EmployeeFilter;

    #[instrument(skip(self, request), fields(full_name = %request.full_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO colaboradores
                (full_name, address, neighborhood, city, state, postal_code, phone, birth_date, role)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING *
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.address)
        .bind(&request.neighborhood)
        .bind(&request.city)
        .bind(&request.state)
        .bind(&request.postal_code)
        .bind(&request.phone)
        .bind(request.birth_date)
        .bind(&request.role)
        .fetch_one(self.db)
        .await?;

        Ok(employee.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM colaboradores WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.db)
            .await?;

        Ok(employee.map(Into::into))
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Absent filter fields bind as NULL and the corresponding clause passes
        // for every row. Newest registrations come first.
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM colaboradores
            WHERE (?1 IS NULL OR instr(lower(full_name), lower(?1)) > 0)
              AND (?2 IS NULL OR role = ?2)
              AND (?3 IS NULL OR state = ?3)
            ORDER BY id DESC
            "#,
        )
        .bind(&filter.name)
        .bind(&filter.role)
        .bind(&filter.state)
        .fetch_all(self.db)
        .await?;

        Ok(employees.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE colaboradores
            SET full_name = ?1, address = ?2, neighborhood = ?3, city = ?4, state = ?5,
                postal_code = ?6, phone = ?7, birth_date = ?8, role = ?9
            WHERE id = ?10
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.address)
        .bind(&request.neighborhood)
        .bind(&request.city)
        .bind(&request.state)
        .bind(&request.postal_code)
        .bind(&request.phone)
        .bind(request.birth_date)
        .bind(&request.role)
        .bind(id)
        .execute(self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM colaboradores WHERE id = ?1")
            .bind(id)
            .execute(self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Employees<'c> {
    /// Number of employees in the registry
    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colaboradores")
            .fetch_one(self.db)
            .await?;

        Ok(count)
    }

    /// Aggregate statistics over the whole registry.
    ///
    /// The registry stays small (hundreds of rows), so this scans the relevant
    /// columns once and aggregates in memory rather than issuing one query per
    /// figure.
    #[instrument(skip(self), err)]
    pub async fn compute_statistics(&mut self) -> Result<StatsSummary> {
        let rows = sqlx::query_as::<_, StatsRow>("SELECT city, state, role, created_at FROM colaboradores")
            .fetch_all(self.db)
            .await?;

        let mut cities: BTreeMap<String, i64> = BTreeMap::new();
        let mut states: BTreeMap<String, i64> = BTreeMap::new();
        let mut roles: BTreeMap<String, i64> = BTreeMap::new();
        let mut by_month: BTreeMap<String, i64> = BTreeMap::new();

        for row in &rows {
            if let Some(city) = &row.city {
                *cities.entry(city.clone()).or_default() += 1;
            }
            if let Some(state) = &row.state {
                *states.entry(state.clone()).or_default() += 1;
            }
            if let Some(role) = &row.role {
                *roles.entry(role.clone()).or_default() += 1;
            }
            *by_month.entry(row.created_at.format("%Y-%m").to_string()).or_default() += 1;
        }

        Ok(StatsSummary {
            total: rows.len() as i64,
            distinct_cities: cities.len() as i64,
            distinct_states: states.len() as i64,
            distinct_roles: roles.len() as i64,
            most_common_city: mode(&cities),
            most_common_state: mode(&states),
            most_common_role: mode(&roles),
            role_distribution: roles,
            state_distribution: states,
            registrations_by_month: by_month,
        })
    }
}

/// Most frequent key. Iteration is in key order, so a strict `>` keeps the
/// lexicographically smallest key when counts tie.
fn mode(counts: &BTreeMap<String, i64>) -> Option<String> {
    let mut best: Option<(&String, i64)> = None;
    for (key, &count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key.clone())
}
