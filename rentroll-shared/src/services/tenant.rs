//! Tenant service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{distinct_ids, index_by};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    lease::Lease,
    tenant::{CreateTenant, Tenant, TenantDetail, TenantWithUnit, UpdateTenant},
    unit::Unit,
};

#[derive(Clone)]
pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tenants, each with the unit they are assigned to
    pub async fn get_all(&self) -> DomainResult<Vec<TenantWithUnit>> {
        let tenants = Tenant::list(&self.pool).await?;
        let unit_ids = distinct_ids(tenants.iter().filter_map(|t| t.unit_id));
        let units = index_by(Unit::find_many(&self.pool, &unit_ids).await?, |u| u.id);

        Ok(tenants
            .into_iter()
            .map(|tenant| TenantWithUnit {
                unit: tenant.unit_id.and_then(|id| units.get(&id).cloned()),
                tenant,
            })
            .collect())
    }

    /// One tenant with their unit and every lease they have held
    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<TenantDetail> {
        let tenant = Tenant::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tenant"))?;

        let unit = match tenant.unit_id {
            Some(unit_id) => Unit::find_by_id(&self.pool, unit_id).await?,
            None => None,
        };
        let leases = Lease::list_by_tenant(&self.pool, id).await?;

        Ok(TenantDetail {
            tenant,
            unit,
            leases,
        })
    }

    /// Creates a tenant, checking the unit exists if one is given
    pub async fn create(&self, data: CreateTenant) -> DomainResult<Tenant> {
        if let Some(unit_id) = data.unit_id {
            if Unit::find_by_id(&self.pool, unit_id).await?.is_none() {
                return Err(DomainError::not_found("Unit"));
            }
        }

        let tenant = Tenant::create(&self.pool, data).await?;
        info!(tenant_id = %tenant.id, "Tenant created");
        Ok(tenant)
    }

    pub async fn update(&self, id: Uuid, data: UpdateTenant) -> DomainResult<Tenant> {
        Tenant::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| DomainError::not_found("Tenant"))
    }

    /// Deletes the tenant; their leases stay behind
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Tenant::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("Tenant"));
        }
        info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }
}
