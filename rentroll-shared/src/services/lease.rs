//! Lease service
//!
//! Reads attach the tenant and unit. Creation goes through the lease
//! workflow so the unit and tenant are updated in the same transaction.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{distinct_ids, index_by};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    lease::{CreateLease, Lease, LeaseWithParties, UpdateLease},
    tenant::Tenant,
    unit::Unit,
};
use crate::workflows;

#[derive(Clone)]
pub struct LeaseService {
    pool: PgPool,
}

impl LeaseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<LeaseWithParties>> {
        let leases = Lease::list(&self.pool).await?;
        self.with_parties(leases).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<LeaseWithParties> {
        let lease = Lease::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Lease"))?;

        let tenant = Tenant::find_by_id(&self.pool, lease.tenant_id).await?;
        let unit = Unit::find_by_id(&self.pool, lease.unit_id).await?;

        Ok(LeaseWithParties {
            lease,
            tenant,
            unit,
        })
    }

    pub async fn get_by_tenant(&self, tenant_id: Uuid) -> DomainResult<Vec<LeaseWithParties>> {
        let leases = Lease::list_by_tenant(&self.pool, tenant_id).await?;
        self.with_parties(leases).await
    }

    pub async fn get_by_unit(&self, unit_id: Uuid) -> DomainResult<Vec<LeaseWithParties>> {
        let leases = Lease::list_by_unit(&self.pool, unit_id).await?;
        self.with_parties(leases).await
    }

    /// Creates a lease, marking the unit occupied and moving the tenant into it
    pub async fn create(&self, data: CreateLease) -> DomainResult<Lease> {
        workflows::lease::create_lease(&self.pool, data).await
    }

    pub async fn update(&self, id: Uuid, data: UpdateLease) -> DomainResult<Lease> {
        Lease::update(&self.pool, id, data)
            .await?
            .ok_or_else(|| DomainError::not_found("Lease"))
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Lease::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("Lease"));
        }
        info!(lease_id = %id, "Lease deleted");
        Ok(())
    }

    async fn with_parties(&self, leases: Vec<Lease>) -> DomainResult<Vec<LeaseWithParties>> {
        let tenant_ids = distinct_ids(leases.iter().map(|l| l.tenant_id));
        let unit_ids = distinct_ids(leases.iter().map(|l| l.unit_id));

        let tenants = index_by(Tenant::find_many(&self.pool, &tenant_ids).await?, |t| t.id);
        let units = index_by(Unit::find_many(&self.pool, &unit_ids).await?, |u| u.id);

        Ok(leases
            .into_iter()
            .map(|lease| LeaseWithParties {
                tenant: tenants.get(&lease.tenant_id).cloned(),
                unit: units.get(&lease.unit_id).cloned(),
                lease,
            })
            .collect())
    }
}
