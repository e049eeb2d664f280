//! Tenant assignment workflows
//!
//! Assigning a tenant creates the tenant record and flips occupancy on what
//! they were assigned to. For a house the tenant goes into the house's
//! backing unit, which is created on first use.
//!
//! Each workflow runs in one transaction, so a tenant is never left created
//! without the matching occupancy change.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    common::OccupancyStatus,
    property::Property,
    tenant::{Tenant, TenantForm},
    unit::{CreateUnit, Unit},
};

/// Result of assigning a tenant to an apartment unit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAssignment {
    pub unit: Unit,
    pub tenant: Tenant,
}

/// Result of assigning a tenant to a house
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseAssignment {
    pub property: Property,

    /// Backing unit the tenant was linked to
    pub unit: Unit,

    pub tenant: Tenant,

    /// True if the backing unit was created by this assignment
    pub unit_created: bool,
}

/// Creates a tenant in `unit_id` and marks the unit OCCUPIED
///
/// # Errors
///
/// - `NotFound` if the unit does not exist
/// - `ValidationFailure` if the form has no name
pub async fn assign_to_unit(
    pool: &PgPool,
    unit_id: Uuid,
    form: TenantForm,
) -> DomainResult<UnitAssignment> {
    let create = form.into_create(Some(unit_id))?;

    let mut tx = pool.begin().await?;

    Unit::find_by_id(&mut *tx, unit_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Unit"))?;

    let tenant = Tenant::create(&mut *tx, create).await?;
    let unit = Unit::set_status(&mut *tx, unit_id, OccupancyStatus::Occupied)
        .await?
        .ok_or_else(|| DomainError::not_found("Unit"))?;

    tx.commit().await?;

    info!(tenant_id = %tenant.id, unit_id = %unit.id, "Tenant assigned to unit");

    Ok(UnitAssignment { unit, tenant })
}

/// Creates a tenant in a house and marks the house OCCUPIED
///
/// Uses the house's first unit, or synthesizes one numbered `HOUSE` with the
/// house's monthly rent.
///
/// # Errors
///
/// - `NotFound` if the property does not exist
/// - `ValidationFailure` if the property is not a house, or the form has no name
pub async fn assign_to_house(
    pool: &PgPool,
    property_id: Uuid,
    form: TenantForm,
) -> DomainResult<HouseAssignment> {
    let mut tx = pool.begin().await?;

    let property = Property::find_by_id(&mut *tx, property_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Property"))?;

    if !property.property_type.is_house() {
        return Err(DomainError::validation(
            "Tenants can only be assigned directly to a house; assign to a unit instead",
        ));
    }

    let existing = Unit::list_by_property(&mut *tx, property.id)
        .await?
        .into_iter()
        .next();

    let (unit, unit_created) = match existing {
        Some(unit) => {
            let unit = Unit::set_status(&mut *tx, unit.id, OccupancyStatus::Occupied)
                .await?
                .ok_or_else(|| DomainError::not_found("Unit"))?;
            (unit, false)
        }
        None => {
            let unit = Unit::create(
                &mut *tx,
                CreateUnit::for_house(property.id, property.monthly_rent),
            )
            .await?;
            debug!(property_id = %property.id, unit_id = %unit.id, "Created backing unit for house");
            (unit, true)
        }
    };

    let tenant = Tenant::create(&mut *tx, form.into_create(Some(unit.id))?).await?;

    let property = Property::set_occupancy(&mut *tx, property.id, OccupancyStatus::Occupied)
        .await?
        .ok_or_else(|| DomainError::not_found("Property"))?;

    tx.commit().await?;

    info!(
        tenant_id = %tenant.id,
        property_id = %property.id,
        unit_id = %unit.id,
        unit_created,
        "Tenant assigned to house"
    );

    Ok(HouseAssignment {
        property,
        unit,
        tenant,
        unit_created,
    })
}
