//! OpenAPI documentation for the registry API at `/api/v1/*`.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::employees::{
    DeleteEmployeeQuery, EmployeeCreate, EmployeeResponse, EmployeeUpdate, ListEmployeesQuery, StatsResponse,
};
use crate::validation::FieldError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Registro de Colaboradores",
        description = "Employee registry: CRUD over a single SQLite table, CSV export, and registry statistics."
    ),
    paths(
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        handlers::export::export_employees,
        handlers::stats::get_statistics,
    ),
    components(schemas(
        EmployeeCreate,
        EmployeeUpdate,
        EmployeeResponse,
        ListEmployeesQuery,
        DeleteEmployeeQuery,
        StatsResponse,
        FieldError,
    )),
    tags(
        (name = "employees", description = "Employee registry management"),
        (name = "statistics", description = "Aggregate registry statistics"),
    )
)]
pub struct ApiDoc;
