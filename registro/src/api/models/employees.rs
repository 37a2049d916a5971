//! API request/response models for employees.

use std::collections::BTreeMap;

use crate::db::models::employees::{EmployeeDBResponse, StatsSummary};
use crate::types::EmployeeId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Employee request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeCreate {
    pub full_name: String,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    /// Two-letter state (UF) code, e.g. "SP"
    pub state: Option<String>,
    /// CEP, with or without the dash
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<String>,
}

impl EmployeeCreate {
    /// Trim every string field and map emptied-out optionals to `None`, so
    /// `""` and absent mean the same thing from here on.
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            address: normalize(self.address),
            neighborhood: normalize(self.neighborhood),
            city: normalize(self.city),
            state: normalize(self.state).map(|s| s.to_uppercase()),
            postal_code: normalize(self.postal_code),
            phone: normalize(self.phone),
            birth_date: self.birth_date,
            role: normalize(self.role),
        }
    }
}

/// Updates replace the full record, so the payload has the same shape as a
/// create request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeUpdate {
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

impl From<EmployeeUpdate> for EmployeeCreate {
    fn from(update: EmployeeUpdate) -> Self {
        Self {
            full_name: update.full_name,
            address: update.address,
            neighborhood: update.neighborhood,
            city: update.city,
            state: update.state,
            postal_code: update.postal_code,
            phone: update.phone,
            birth_date: update.birth_date,
            role: update.role,
        }
    }
}

impl From<EmployeeCreate> for EmployeeUpdate {
    fn from(create: EmployeeCreate) -> Self {
        Self {
            full_name: create.full_name,
            address: create.address,
            neighborhood: create.neighborhood,
            city: create.city,
            state: create.state,
            postal_code: create.postal_code,
            phone: create.phone,
            birth_date: create.birth_date,
            role: create.role,
        }
    }
}

// Employee response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
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

impl From<EmployeeDBResponse> for EmployeeResponse {
    fn from(db: EmployeeDBResponse) -> Self {
        Self {
            id: db.id,
            full_name: db.full_name,
            address: db.address,
            neighborhood: db.neighborhood,
            city: db.city,
            state: db.state,
            postal_code: db.postal_code,
            phone: db.phone,
            birth_date: db.birth_date,
            role: db.role,
            created_at: db.created_at,
        }
    }
}

/// Query parameters for listing employees
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListEmployeesQuery {
    /// Filter by name (case-insensitive substring match)
    pub name: Option<String>,

    /// Filter by role (exact match)
    pub role: Option<String>,

    /// Filter by state code (exact match)
    pub state: Option<String>,
}

/// Query parameters for deleting an employee
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DeleteEmployeeQuery {
    /// Deletion only proceeds when this is true; otherwise the server answers
    /// 409 and nothing is removed
    #[serde(default)]
    pub confirm: bool,
}

/// Aggregate statistics for the registry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total: i64,
    pub distinct_cities: i64,
    pub distinct_states: i64,
    pub distinct_roles: i64,
    /// `null` when no employee has a city recorded
    pub most_common_city: Option<String>,
    pub most_common_state: Option<String>,
    pub most_common_role: Option<String>,
    /// Occurrences per role / per state, for chart rendering
    pub role_distribution: BTreeMap<String, i64>,
    pub state_distribution: BTreeMap<String, i64>,
    /// Registrations per `YYYY-MM` month
    pub registrations_by_month: BTreeMap<String, i64>,
}

impl From<StatsSummary> for StatsResponse {
    fn from(db: StatsSummary) -> Self {
        Self {
            total: db.total,
            distinct_cities: db.distinct_cities,
            distinct_states: db.distinct_states,
            distinct_roles: db.distinct_roles,
            most_common_city: db.most_common_city,
            most_common_state: db.most_common_state,
            most_common_role: db.most_common_role,
            role_distribution: db.role_distribution,
            state_distribution: db.state_distribution,
            registrations_by_month: db.registrations_by_month,
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_and_drops_empty() {
        let payload = EmployeeCreate {
            full_name: "  Maria Souza  ".to_string(),
            address: Some("   ".to_string()),
            neighborhood: None,
            city: Some(" Campinas ".to_string()),
            state: Some("sp".to_string()),
            postal_code: Some("".to_string()),
            phone: None,
            birth_date: None,
            role: Some("Analista".to_string()),
        }
        .normalized();

        assert_eq!(payload.full_name, "Maria Souza");
        assert!(payload.address.is_none());
        assert!(payload.postal_code.is_none());
        assert_eq!(payload.city.as_deref(), Some("Campinas"));
        assert_eq!(payload.state.as_deref(), Some("SP"));
    }
}
