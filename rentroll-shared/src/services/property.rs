//! Property service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::group_by;
use crate::error::{DomainError, DomainResult};
use crate::models::{
    common::OccupancyStatus,
    property::{CreateProperty, Property, PropertyWithUnits, UpdateProperty},
    tenant::{Tenant, TenantForm},
    unit::Unit,
};
use crate::workflows::assignment::{self, HouseAssignment};

#[derive(Clone)]
pub struct PropertyService {
    pool: PgPool,
}

impl PropertyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All properties, each with its units
    pub async fn get_all(&self) -> DomainResult<Vec<PropertyWithUnits>> {
        let properties = Property::list(&self.pool).await?;
        let ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
        let mut units = group_by(
            Unit::list_by_properties(&self.pool, &ids).await?,
            |unit| unit.property_id,
        );

        Ok(properties
            .into_iter()
            .map(|property| PropertyWithUnits {
                units: units.remove(&property.id).unwrap_or_default(),
                property,
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<PropertyWithUnits> {
        let property = Property::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property"))?;
        let units = Unit::list_by_property(&self.pool, id).await?;

        Ok(PropertyWithUnits { property, units })
    }

    pub async fn create(&self, data: CreateProperty) -> DomainResult<Property> {
        let property = Property::create(&self.pool, data).await?;
        info!(property_id = %property.id, property_type = property.property_type.as_str(), "Property created");
        Ok(property)
    }

    /// Partial update
    ///
    /// A house can only be marked OCCUPIED once a tenant lives in it.
    pub async fn update(&self, id: Uuid, data: UpdateProperty) -> DomainResult<Property> {
        let existing = Property::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property"))?;

        let property_type = data.property_type.unwrap_or(existing.property_type);
        if data.occupancy == Some(OccupancyStatus::Occupied) && property_type.is_house() {
            let unit_ids: Vec<Uuid> = Unit::list_by_property(&self.pool, id)
                .await?
                .iter()
                .map(|unit| unit.id)
                .collect();
            if Tenant::list_by_units(&self.pool, &unit_ids).await?.is_empty() {
                return Err(DomainError::validation(
                    "Assign a tenant before marking this house occupied",
                ));
            }
        }

        Property::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| DomainError::not_found("Property"))
    }

    /// Deletes the property; its units stay behind
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Property::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("Property"));
        }
        info!(property_id = %id, "Property deleted");
        Ok(())
    }

    /// Assigns a new tenant to a house-type property
    pub async fn assign_tenant(
        &self,
        property_id: Uuid,
        form: TenantForm,
    ) -> DomainResult<HouseAssignment> {
        assignment::assign_to_house(&self.pool, property_id, form).await
    }
}
