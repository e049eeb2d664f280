//! Unit service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::group_by;
use crate::error::{DomainError, DomainResult};
use crate::models::{
    property::Property,
    tenant::{Tenant, TenantForm},
    unit::{CreateUnit, Unit, UnitWithTenants, UpdateUnit},
};
use crate::workflows::assignment::{self, UnitAssignment};

#[derive(Clone)]
pub struct UnitService {
    pool: PgPool,
}

impl UnitService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All units, each with the tenants assigned to it
    pub async fn get_all(&self) -> DomainResult<Vec<UnitWithTenants>> {
        let units = Unit::list(&self.pool).await?;
        let ids: Vec<Uuid> = units.iter().map(|u| u.id).collect();
        let mut tenants = group_by(
            Tenant::list_by_units(&self.pool, &ids).await?,
            |tenant| tenant.unit_id,
        );

        Ok(units
            .into_iter()
            .map(|unit| UnitWithTenants {
                tenants: tenants.remove(&Some(unit.id)).unwrap_or_default(),
                unit,
            })
            .collect())
    }

    /// One unit with the tenants assigned to it
    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<UnitWithTenants> {
        let unit = Unit::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit"))?;
        let tenants = Tenant::list_by_unit(&self.pool, id).await?;

        Ok(UnitWithTenants { unit, tenants })
    }

    pub async fn get_by_property(&self, property_id: Uuid) -> DomainResult<Vec<Unit>> {
        Ok(Unit::list_by_property(&self.pool, property_id).await?)
    }

    /// Creates a unit under an existing property
    pub async fn create(&self, data: CreateUnit) -> DomainResult<Unit> {
        if Property::find_by_id(&self.pool, data.property_id).await?.is_none() {
            return Err(DomainError::not_found("Property"));
        }

        let unit = Unit::create(&self.pool, data).await?;
        info!(unit_id = %unit.id, property_id = %unit.property_id, "Unit created");
        Ok(unit)
    }

    pub async fn update(&self, id: Uuid, data: UpdateUnit) -> DomainResult<Unit> {
        Unit::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit"))
    }

    /// Deletes the unit; its tenants and leases stay behind
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Unit::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("Unit"));
        }
        info!(unit_id = %id, "Unit deleted");
        Ok(())
    }

    /// Assigns a new tenant to this unit
    pub async fn assign_tenant(&self, unit_id: Uuid, form: TenantForm) -> DomainResult<UnitAssignment> {
        assignment::assign_to_unit(&self.pool, unit_id, form).await
    }
}
