//! Common test utilities for integration tests
//!
//! Tests run against the PostgreSQL database named by `DATABASE_URL`.
//! Every test creates its own records with fresh ids, so tests can share
//! one database and run in parallel.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rentroll_api::app::{build_router, AppState};
use rentroll_api::config::Config;
use rentroll_shared::db::migrations;
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Connects, applies migrations and builds the router
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty body comes back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("{} {} returned non-JSON body: {}", method, uri, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    /// Creates a property through the API and returns its id
    pub async fn create_property(&self, property_type: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/properties",
                serde_json::json!({
                    "name": format!("Test Property {}", Uuid::new_v4()),
                    "address": "1 Test Street",
                    "propertyType": property_type,
                    "monthlyRent": 1500.0,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create property: {body}");
        id_of(&body)
    }

    /// Creates a unit through the API and returns its id
    pub async fn create_unit(&self, property_id: Uuid, unit_number: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/units",
                serde_json::json!({
                    "propertyId": property_id,
                    "unitNumber": unit_number,
                    "rentAmount": 950.0,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create unit: {body}");
        id_of(&body)
    }

    /// Creates an unassigned tenant through the API and returns its id
    pub async fn create_tenant(&self, name: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/tenants",
                serde_json::json!({ "name": name, "phone": "555-0100" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create tenant: {body}");
        id_of(&body)
    }
}

/// Reads the `id` field of a JSON record
pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("response has no id: {body}"))
}
