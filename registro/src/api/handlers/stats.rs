//! Registry statistics endpoint.

use crate::{api::models::employees::StatsResponse, db::handlers::employees::Employees, errors::Error, AppState};
use axum::{extract::State, response::Json};

// GET /statistics - Aggregate view over the registry
#[utoipa::path(
    get,
    path = "/statistics",
    tag = "statistics",
    summary = "Registry statistics",
    description = "Totals, distinct counts, most common values, and registrations per month",
    responses(
        (status = 200, description = "Registry statistics", body = StatsResponse),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<StatsResponse>, Error> {
    let mut repo = Employees::new(&state.db);
    let stats = repo.compute_statistics().await?;

    Ok(Json(stats.into()))
}
