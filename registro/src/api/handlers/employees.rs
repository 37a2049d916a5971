//! HTTP handlers for the employee registry.

use crate::{
    api::models::employees::{
        DeleteEmployeeQuery, EmployeeCreate, EmployeeResponse, EmployeeUpdate, ListEmployeesQuery,
    },
    db::{
        handlers::{
            employees::{EmployeeFilter, Employees},
            repository::Repository,
        },
        models::employees::{EmployeeCreateDBRequest, EmployeeUpdateDBRequest},
    },
    errors::Error,
    types::EmployeeId,
    validation, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

impl From<ListEmployeesQuery> for EmployeeFilter {
    fn from(query: ListEmployeesQuery) -> Self {
        Self {
            name: query.name.filter(|s| !s.trim().is_empty()),
            role: query.role.filter(|s| !s.trim().is_empty()),
            state: query.state.filter(|s| !s.trim().is_empty()),
        }
    }
}

// POST /employees - Register a new employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    summary = "Register employee",
    description = "Validate and persist a new employee record",
    request_body = EmployeeCreate,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 422, description = "Payload failed field validation"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<EmployeeCreate>,
) -> Result<(StatusCode, Json<EmployeeResponse>), Error> {
    let payload = payload.normalized();

    let errors = validation::validate(&payload);
    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }

    let mut repo = Employees::new(&state.db);
    let employee = repo.create(&EmployeeCreateDBRequest::from(payload)).await?;

    Ok((StatusCode::CREATED, Json(employee.into())))
}

// GET /employees - List employees, optionally filtered
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    summary = "List employees",
    description = "List employees, newest first, optionally filtered by name, role, or state",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "Matching employees", body = [EmployeeResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<Vec<EmployeeResponse>>, Error> {
    let mut repo = Employees::new(&state.db);
    let employees = repo.list(&query.into()).await?;

    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

// GET /employees/{id} - Get a single employee
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "employees",
    summary = "Get employee",
    params(("id" = i64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee record", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Result<Json<EmployeeResponse>, Error> {
    let mut repo = Employees::new(&state.db);
    let employee = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Employee".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(employee.into()))
}

// PUT /employees/{id} - Replace an employee record
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "employees",
    summary = "Update employee",
    description = "Replace every mutable field of an existing employee record",
    params(("id" = i64, Path, description = "Employee ID")),
    request_body = EmployeeUpdate,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Payload failed field validation"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    Json(payload): Json<EmployeeUpdate>,
) -> Result<Json<EmployeeResponse>, Error> {
    // Same normalization and validation rules as create
    let payload = EmployeeCreate::from(payload).normalized();

    let errors = validation::validate(&payload);
    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }

    let mut repo = Employees::new(&state.db);
    let updated = repo
        .update(id, &EmployeeUpdateDBRequest::from(EmployeeUpdate::from(payload)))
        .await?;
    if !updated {
        return Err(Error::NotFound {
            resource: "Employee".to_string(),
            id: id.to_string(),
        });
    }

    let employee = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Employee".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(employee.into()))
}

// DELETE /employees/{id} - Remove an employee, guarded by explicit confirmation
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "employees",
    summary = "Delete employee",
    description = "Remove an employee record. Requires confirm=true; without it nothing is deleted",
    params(
        ("id" = i64, Path, description = "Employee ID"),
        DeleteEmployeeQuery,
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Deletion not confirmed"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    Query(query): Query<DeleteEmployeeQuery>,
) -> Result<StatusCode, Error> {
    if !query.confirm {
        return Err(Error::Conflict {
            message: "Deletion requires confirm=true".to_string(),
        });
    }

    let mut repo = Employees::new(&state.db);
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "Employee".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
