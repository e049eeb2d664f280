//! Lease endpoints
//!
//! - `GET /api/leases` - All leases with tenant and unit
//! - `POST /api/leases` - Create lease (unit becomes OCCUPIED, tenant moves in)
//! - `GET /api/leases/:id` - One lease with tenant and unit
//! - `PUT /api/leases/:id` - Partial update
//! - `DELETE /api/leases/:id` - Delete
//! - `GET /api/leases/by-tenant/:tenant_id` - Leases of one tenant
//! - `GET /api/leases/by-unit/:unit_id` - Leases of one unit

use crate::{
    app::AppState,
    error::{validate_request, ApiJson, ApiPath, ApiResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rentroll_shared::models::lease::{CreateLease, Lease, LeaseWithParties, UpdateLease};
use uuid::Uuid;

pub async fn list_leases(State(state): State<AppState>) -> ApiResult<Json<Vec<LeaseWithParties>>> {
    Ok(Json(state.services.leases.get_all().await?))
}

pub async fn list_leases_by_tenant(
    State(state): State<AppState>,
    ApiPath(tenant_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<LeaseWithParties>>> {
    Ok(Json(state.services.leases.get_by_tenant(tenant_id).await?))
}

pub async fn list_leases_by_unit(
    State(state): State<AppState>,
    ApiPath(unit_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<LeaseWithParties>>> {
    Ok(Json(state.services.leases.get_by_unit(unit_id).await?))
}

/// Create lease
///
/// ```text
/// POST /api/leases
///
/// {
///   "tenantId": "...",
///   "unitId": "...",
///   "startDate": "2025-02-01",
///   "endDate": null
/// }
/// ```
///
/// Dates may be RFC 3339 or `YYYY-MM-DD`; `startDate` defaults to now.
///
/// # Errors
///
/// - `404 Not Found`: Tenant or unit does not exist; nothing is written
pub async fn create_lease(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateLease>,
) -> ApiResult<(StatusCode, Json<Lease>)> {
    validate_request(&req)?;

    let lease = state.services.leases.create(req).await?;
    Ok((StatusCode::CREATED, Json(lease)))
}

pub async fn get_lease(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LeaseWithParties>> {
    Ok(Json(state.services.leases.get_by_id(id).await?))
}

pub async fn update_lease(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateLease>,
) -> ApiResult<Json<Lease>> {
    validate_request(&req)?;

    Ok(Json(state.services.leases.update(id, req).await?))
}

pub async fn delete_lease(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.leases.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
