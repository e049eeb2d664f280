//! Property endpoints
//!
//! - `GET /api/properties` - All properties with their units
//! - `POST /api/properties` - Create property
//! - `GET /api/properties/:id` - One property with its units
//! - `PUT /api/properties/:id` - Partial update
//! - `DELETE /api/properties/:id` - Delete (units are kept)
//! - `POST /api/properties/:id/tenants` - Assign a new tenant to a house

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
        property::{CreateProperty, Property, PropertyWithUnits, UpdateProperty},
        tenant::TenantForm,
    },
    workflows::assignment::HouseAssignment,
};
use uuid::Uuid;

pub async fn list_properties(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PropertyWithUnits>>> {
    Ok(Json(state.services.properties.get_all().await?))
}

/// Create property
///
/// ```text
/// POST /api/properties
///
/// {
///   "name": "Maple Court",
///   "address": "12 Maple St",
///   "propertyType": "APARTMENT"
/// }
/// ```
///
/// `propertyType` defaults to APARTMENT and `occupancy` to VACANT.
pub async fn create_property(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateProperty>,
) -> ApiResult<(StatusCode, Json<Property>)> {
    validate_request(&req)?;

    let property = state.services.properties.create(req).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn get_property(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<PropertyWithUnits>> {
    Ok(Json(state.services.properties.get_by_id(id).await?))
}

pub async fn update_property(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProperty>,
) -> ApiResult<Json<Property>> {
    validate_request(&req)?;

    Ok(Json(state.services.properties.update(id, req).await?))
}

pub async fn delete_property(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.services.properties.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign tenant to a house
///
/// Creates the tenant, links them to the house's backing unit (creating it
/// on first use) and marks the house OCCUPIED.
///
/// # Errors
///
/// - `404 Not Found`: No such property
/// - `422 Unprocessable Entity`: Property is not a house, or the form is invalid
pub async fn assign_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(form): ApiJson<TenantForm>,
) -> ApiResult<(StatusCode, Json<HouseAssignment>)> {
    validate_request(&form)?;

    let assignment = state.services.properties.assign_tenant(id, form).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}
