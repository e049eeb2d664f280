//! Tenant endpoints
//!
//! - `GET /api/tenants` - All tenants with their unit
//! - `POST /api/tenants` - Create tenant
//! - `GET /api/tenants/:id` - One tenant with unit and lease history
//! - `PUT /api/tenants/:id` - Partial update
//! - `DELETE /api/tenants/:id` - Delete (leases are kept)

use crate::{
    app::AppState,
    error::{validate_request, ApiJson, ApiPath, ApiResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rentroll_shared::models::tenant::{
    Tenant, TenantDetail, TenantForm, TenantWithUnit, UpdateTenant,
};
use uuid::Uuid;

pub async fn list_tenants(State(state): State<AppState>) -> ApiResult<Json<Vec<TenantWithUnit>>> {
    Ok(Json(state.services.tenants.get_all().await?))
}

/// Create tenant
///
/// ```text
/// POST /api/tenants
///
/// { "firstName": "Ada", "lastName": "Lovelace", "phone": "555-0100", "unitId": "..." }
/// ```
///
/// A full `name` may be sent instead of `firstName`/`lastName`.
pub async fn create_tenant(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<TenantForm>,
) -> ApiResult<(StatusCode, Json<Tenant>)> {
    validate_request(&form)?;

    let unit_id = form.unit_id;
    let tenant = state.services.tenants.create(form.into_create(unit_id)?).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<TenantDetail>> {
    Ok(Json(state.services.tenants.get_by_id(id).await?))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateTenant>,
) -> ApiResult<Json<Tenant>> {
    validate_request(&req)?;

    Ok(Json(state.services.tenants.update(id, req).await?))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.tenants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
