//! Database models for employees.

use std::collections::BTreeMap;

use crate::api::models::employees::{EmployeeCreate, EmployeeUpdate};
use crate::types::EmployeeId;
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for creating a new employee
#[derive(Debug, Clone)]
pub struct EmployeeCreateDBRequest {
    pub full_name: String,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<String>,
}

impl From<EmployeeCreate> for EmployeeCreateDBRequest {
    fn from(api: EmployeeCreate) -> Self {
        Self {
            full_name: api.full_name,
            address: api.address,
            neighborhood: api.neighborhood,
            city: api.city,
            state: api.state,
            postal_code: api.postal_code,
            phone: api.phone,
            birth_date: api.birth_date,
            role: api.role,
        }
    }
}

/// Database request for updating an employee. Updates replace every mutable
/// column, so the shape matches the create request.
#[derive(Debug, Clone)]
pub struct EmployeeUpdateDBRequest {
    pub full_name: String,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<String>,
}

impl From<EmployeeUpdate> for EmployeeUpdateDBRequest {
    fn from(api: EmployeeUpdate) -> Self {
        Self {
            full_name: api.full_name,
            address: api.address,
            neighborhood: api.neighborhood,
            city: api.city,
            state: api.state,
            postal_code: api.postal_code,
            phone: api.phone,
            birth_date: api.birth_date,
            role: api.role,
        }
    }
}

/// Database response for an employee
#[derive(Debug, Clone)]
pub struct EmployeeDBResponse {
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

/// Aggregate view over the whole registry
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub total: i64,
    pub distinct_cities: i64,
    pub distinct_states: i64,
    pub distinct_roles: i64,
    /// Mode values; `None` when the registry has no value for the column.
    /// Ties resolve to the lexicographically smallest value.
    pub most_common_city: Option<String>,
    pub most_common_state: Option<String>,
    pub most_common_role: Option<String>,
    /// Occurrences per role / per state, for chart rendering.
    pub role_distribution: BTreeMap<String, i64>,
    pub state_distribution: BTreeMap<String, i64>,
    /// Registrations per `YYYY-MM` month, ordered by month.
    pub registrations_by_month: BTreeMap<String, i64>,
}
