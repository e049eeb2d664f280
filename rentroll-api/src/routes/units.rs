//! Unit endpoints
//!
//! - `GET /api/units` - All units with their tenants
//! - `POST /api/units` - Create unit under an existing property
//! - `GET /api/units/:id` - One unit with its tenants
//! - `PUT /api/units/:id` - Partial update
//! - `DELETE /api/units/:id` - Delete (tenants and leases are kept)
//! - `GET /api/units/by-property/:property_id` - Units of one property
//! - `POST /api/units/:id/tenants` - Assign a new tenant to the unit

use crate::{
    app::AppState,
    error::{validate_request, ApiJson, ApiPath, ApiResult},
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rentroll_shared::{
    models::{
        tenant::TenantForm,
        unit::{CreateUnit, Unit, UnitWithTenants, UpdateUnit},
    },
    workflows::assignment::UnitAssignment,
};
use uuid::Uuid;

pub async fn list_units(State(state): State<AppState>) -> ApiResult<Json<Vec<UnitWithTenants>>> {
    Ok(Json(state.services.units.get_all().await?))
}

pub async fn list_units_by_property(
    State(state): State<AppState>,
    ApiPath(property_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Unit>>> {
    Ok(Json(state.services.units.get_by_property(property_id).await?))
}

/// Create unit
///
/// # Errors
///
/// - `404 Not Found`: `propertyId` does not exist
/// - `422 Unprocessable Entity`: Invalid fields, including a non-numeric rent
pub async fn create_unit(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUnit>,
) -> ApiResult<(StatusCode, Json<Unit>)> {
    validate_request(&req)?;

    let unit = state.services.units.create(req).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn get_unit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UnitWithTenants>> {
    Ok(Json(state.services.units.get_by_id(id).await?))
}

pub async fn update_unit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUnit>,
) -> ApiResult<Json<Unit>> {
    validate_request(&req)?;

    Ok(Json(state.services.units.update(id, req).await?))
}

pub async fn delete_unit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.units.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates a tenant in this unit and marks the unit OCCUPIED
pub async fn assign_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(form): ApiJson<TenantForm>,
) -> ApiResult<(StatusCode, Json<UnitAssignment>)> {
    validate_request(&form)?;

    let assignment = state.services.units.assign_tenant(id, form).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}
