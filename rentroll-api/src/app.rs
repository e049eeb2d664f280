//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use rentroll_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let app = build_router(AppState::new(pool, config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, error::ErrorResponse, middleware::error_detail::ErrorDetailLayer};
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rentroll_shared::services::Services;
use sqlx::PgPool;
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Entity services, all sharing `db`
    pub services: Services,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            services: Services::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/
///     ├── /properties   GET, POST, GET/PUT/DELETE /:id, POST /:id/tenants
///     ├── /units        GET, POST, GET/PUT/DELETE /:id, POST /:id/tenants,
///     │                 GET /by-property/:property_id
///     ├── /tenants      GET, POST, GET/PUT/DELETE /:id
///     └── /leases       GET, POST, GET/PUT/DELETE /:id,
///                       GET /by-tenant/:tenant_id, GET /by-unit/:unit_id
/// ```
///
/// Middleware, innermost first: request tracing, CORS, internal error
/// detail, panic catching.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let property_routes = Router::new()
        .route(
            "/",
            get(routes::properties::list_properties).post(routes::properties::create_property),
        )
        .route(
            "/:id",
            get(routes::properties::get_property)
                .put(routes::properties::update_property)
                .delete(routes::properties::delete_property),
        )
        .route("/:id/tenants", post(routes::properties::assign_tenant));

    let unit_routes = Router::new()
        .route("/", get(routes::units::list_units).post(routes::units::create_unit))
        .route(
            "/:id",
            get(routes::units::get_unit)
                .put(routes::units::update_unit)
                .delete(routes::units::delete_unit),
        )
        .route("/:id/tenants", post(routes::units::assign_tenant))
        .route("/by-property/:property_id", get(routes::units::list_units_by_property));

    let tenant_routes = Router::new()
        .route(
            "/",
            get(routes::tenants::list_tenants).post(routes::tenants::create_tenant),
        )
        .route(
            "/:id",
            get(routes::tenants::get_tenant)
                .put(routes::tenants::update_tenant)
                .delete(routes::tenants::delete_tenant),
        );

    let lease_routes = Router::new()
        .route("/", get(routes::leases::list_leases).post(routes::leases::create_lease))
        .route(
            "/:id",
            get(routes::leases::get_lease)
                .put(routes::leases::update_lease)
                .delete(routes::leases::delete_lease),
        )
        .route("/by-tenant/:tenant_id", get(routes::leases::list_leases_by_tenant))
        .route("/by-unit/:unit_id", get(routes::leases::list_leases_by_unit));

    let api_routes = Router::new()
        .nest("/properties", property_routes)
        .nest("/units", unit_routes)
        .nest("/tenants", tenant_routes)
        .nest("/leases", lease_routes);

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(ErrorDetailLayer::new(production))
        .layer(CatchPanicLayer::custom(move |panic| panic_response(panic, production)))
        .with_state(state)
}

/// Turns a handler panic into a 500 with the usual error body
fn panic_response(panic: Box<dyn Any + Send + 'static>, production: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "panic with non-string payload".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    let stack = (!production).then_some(detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(stack)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panic_response_hides_detail_in_production() {
        let response = panic_response(Box::new("boom"), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_panic_response_shows_detail_in_development() {
        let response = panic_response(Box::new(String::from("boom")), false);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["stack"], "boom");
    }
}
