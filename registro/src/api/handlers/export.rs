//! CSV export of the registry.

use crate::{
    api::models::employees::ListEmployeesQuery,
    db::{
        handlers::{employees::Employees, repository::Repository},
        models::employees::EmployeeDBResponse,
    },
    errors::Error,
    AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

/// Column headers, matching the labels the registry has always exported with.
const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Nome Completo",
    "Cidade",
    "UF",
    "Telefone",
    "Cargo",
    "Nascimento",
    "Cadastrado em",
];

// GET /employees/export - Download the (optionally filtered) registry as CSV
#[utoipa::path(
    get,
    path = "/employees/export",
    tag = "employees",
    summary = "Export employees as CSV",
    description = "Download the registry as a CSV attachment; accepts the same filters as the list endpoint",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn export_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<impl IntoResponse, Error> {
    let mut repo = Employees::new(&state.db);
    let employees = repo.list(&query.into()).await?;

    let csv = to_csv(&employees);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"colaboradores.csv\""),
        ],
        csv,
    ))
}

fn to_csv(employees: &[EmployeeDBResponse]) -> String {
    let mut out = String::new();
    write_row(&mut out, CSV_HEADERS.iter().map(|h| h.to_string()));

    for employee in employees {
        write_row(
            &mut out,
            [
                employee.id.to_string(),
                employee.full_name.clone(),
                employee.city.clone().unwrap_or_default(),
                employee.state.clone().unwrap_or_default(),
                employee.phone.clone().unwrap_or_default(),
                employee.role.clone().unwrap_or_default(),
                employee
                    .birth_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default(),
                employee.created_at.format("%d/%m/%Y %H:%M").to_string(),
            ]
            .into_iter(),
        );
    }

    out
}

fn write_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields.map(|f| quote(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// RFC 4180 quoting: wrap fields containing commas, quotes, or line breaks,
/// doubling any embedded quotes.
fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
