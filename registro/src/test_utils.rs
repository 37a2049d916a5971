//! Test utilities for integration testing (available with `test-utils` feature).

use crate::config::Config;
use axum_test::TestServer;
use serde_json::json;
use sqlx::SqlitePool;

/// Build a test server on top of an already-migrated pool (as provided by `#[sqlx::test]`).
pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::from_pool(config, pool).expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    }
}

/// Register a valid employee through the API and return its id.
pub async fn seed_employee(server: &TestServer, full_name: &str) -> i64 {
    let response = server
        .post("/api/v1/employees")
        .json(&json!({
            "full_name": full_name,
            "city": "São Paulo",
            "state": "SP",
            "postal_code": "01310-100",
            "phone": "(11) 99999-0000",
            "role": "Analista"
        }))
        .await;
    assert_eq!(response.status_code().as_u16(), 201, "seed employee should succeed");

    let body: serde_json::Value = response.json();
    body["id"].as_i64().expect("created employee has an id")
}
