//! # registro: Employee Registry Service
//!
//! `registro` is a small control plane for an employee registry. It exposes a RESTful API
//! for registering, listing, updating, and removing employee records, backed by a single
//! SQLite table.
//!
//! ## Overview
//!
//! The service validates incoming records (required name, CEP and phone formats, known
//! state codes, plausible birth dates) before anything touches the database, and reports
//! every failing field at once so clients can fix a form in one pass. Records can be
//! filtered by name, role, and state, exported as a CSV attachment, and summarized through
//! a statistics endpoint (totals, distinct counts, most common values, registrations per
//! month).
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer
//! and uses SQLite via sqlx for persistence. The **API layer** ([`api`]) exposes the
//! management surface at `/api/v1/*` with interactive docs at `/docs`. The **database
//! layer** ([`db`]) uses the repository pattern: the employees repository handles all
//! queries and mutations against the `colaboradores` table, and migrations run
//! automatically on startup.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use registro::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = registro::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     registro::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{Router, routing::get};
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::EmployeeId;

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the registro database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allow_origin = if config.cors.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new().allow_origin(allow_origin);
    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Employee CRUD routes under `/api/v1`
/// - CSV export and statistics endpoints
/// - Interactive API docs at `/docs`
/// - CORS configuration
/// - Tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // API routes
    let api_routes = Router::new()
        .route(
            "/employees",
            get(api::handlers::employees::list_employees).post(api::handlers::employees::create_employee),
        )
        .route("/employees/export", get(api::handlers::export::export_employees))
        .route(
            "/employees/{id}",
            get(api::handlers::employees::get_employee)
                .put(api::handlers::employees::update_employee)
                .delete(api::handlers::employees::delete_employee),
        )
        .route("/statistics", get(api::handlers::stats::get_statistics))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] opens the database, runs migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: when the shutdown signal resolves, in-flight requests drain and the pool closes
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting registry with configuration: {:#?}", config);

        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.database.acquire_timeout_secs))
            .connect_with(config.connect_options())
            .await?;

        migrator().run(&pool).await?;

        Self::from_pool(config, pool)
    }

    /// Create an application on an already-migrated pool (used by tests)
    pub fn from_pool(config: Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Employee registry listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_then_fetch_employee(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        let created = server
            .post("/api/v1/employees")
            .json(&json!({
                "full_name": "  João Silva  ",
                "city": "São Paulo",
                "state": "SP",
                "postal_code": "01310-100",
                "phone": "(11) 99999-0000",
                "birth_date": "1985-07-03",
                "role": "Analista"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = created.json();
        assert_eq!(body["full_name"], "João Silva"); // trimmed on the way in
        let id = body["id"].as_i64().unwrap();

        let fetched = server.get(&format!("/api/v1/employees/{id}")).await;
        fetched.assert_status_ok();
        let fetched: serde_json::Value = fetched.json();
        assert_eq!(fetched["postal_code"], "01310-100");
        assert_eq!(fetched["address"], serde_json::Value::Null);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_invalid_payload_reports_every_field(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/api/v1/employees")
            .json(&json!({
                "full_name": "   ",
                "state": "XX",
                "postal_code": "99",
                "phone": "123"
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = response.json();
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["full_name", "postal_code", "phone", "state"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_missing_employee_is_404(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        let response = server.get("/api/v1/employees/4242").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_replaces_record(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        let id = seed_employee(&server, "Ana Lima").await;

        let response = server
            .put(&format!("/api/v1/employees/{id}"))
            .json(&json!({
                "full_name": "Ana Lima Santos",
                "role": "Diretor"
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["full_name"], "Ana Lima Santos");
        assert_eq!(body["role"], "Diretor");
        // Omitted fields are replaced with null
        assert_eq!(body["city"], serde_json::Value::Null);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_requires_confirmation(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        let id = seed_employee(&server, "Ana Lima").await;

        // First attempt without confirmation is rejected and the record survives
        let unconfirmed = server.delete(&format!("/api/v1/employees/{id}")).await;
        unconfirmed.assert_status(StatusCode::CONFLICT);
        server.get(&format!("/api/v1/employees/{id}")).await.assert_status_ok();

        // Confirmed delete removes it
        let confirmed = server.delete(&format!("/api/v1/employees/{id}?confirm=true")).await;
        confirmed.assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/employees/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Confirmed delete of a missing record is 404
        let gone = server.delete(&format!("/api/v1/employees/{id}?confirm=true")).await;
        gone.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_filters_by_name(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        seed_employee(&server, "Ana Lima").await;
        seed_employee(&server, "Carlos Lima").await;
        seed_employee(&server, "Beatriz Rocha").await;

        let response = server.get("/api/v1/employees?name=LIMA").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_csv_export(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        seed_employee(&server, "Ana Lima").await;

        let response = server.get("/api/v1/employees/export").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"colaboradores.csv\""
        );

        let csv = response.text();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Nome Completo,Cidade,UF,Telefone,Cargo,Nascimento,Cadastrado em"
        );
        assert!(lines.next().unwrap().contains("Ana Lima"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_statistics_endpoint(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        // Empty registry: zero counts, null modes
        let empty = server.get("/api/v1/statistics").await;
        empty.assert_status_ok();
        let body: serde_json::Value = empty.json();
        assert_eq!(body["total"], 0);
        assert_eq!(body["most_common_city"], serde_json::Value::Null);

        seed_employee(&server, "Ana Lima").await;
        seed_employee(&server, "Carlos Lima").await;

        let stats = server.get("/api/v1/statistics").await;
        let body: serde_json::Value = stats.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["most_common_state"], "SP");
        assert_eq!(body["registrations_by_month"].as_object().unwrap().len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_migrations_are_idempotent(pool: SqlitePool) {
        // The fixture has already applied migrations once; a second run must be a no-op
        crate::migrator().run(&pool).await.expect("re-running migrations should succeed");

        let server = create_test_app(pool).await;
        let id = seed_employee(&server, "Ana Lima").await;
        server.get(&format!("/api/v1/employees/{id}")).await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: SqlitePool) {
        let server = create_test_app(pool).await;
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }
}
