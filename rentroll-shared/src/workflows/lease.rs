//! Lease creation workflow
//!
//! Writing a lease also moves the unit to OCCUPIED and points the tenant at
//! the leased unit. The three writes commit together or not at all.
//!
//! # Example
//!
//! ```no_run
//! use rentroll_shared::models::lease::CreateLease;
//! use rentroll_shared::workflows::lease::create_lease;
//! use sqlx::PgPool;
//! use uuid::Uuid;
//!
//! # async fn example(pool: PgPool, tenant_id: Uuid, unit_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let lease = create_lease(&pool, CreateLease {
//!     tenant_id,
//!     unit_id,
//!     start_date: None,
//!     end_date: None,
//!     document_url: None,
//! }).await?;
//! assert!(lease.is_active());
//! # Ok(())
//! # }
//! ```

use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::{DomainError, DomainResult};
use crate::models::{
    common::OccupancyStatus,
    lease::{CreateLease, Lease},
    tenant::Tenant,
    unit::Unit,
};

/// Creates a lease and marks its unit occupied
///
/// # Errors
///
/// - `NotFound` if the tenant or the unit does not exist; nothing is written
/// - `Unhandled` on storage failure; the transaction is rolled back
pub async fn create_lease(pool: &PgPool, data: CreateLease) -> DomainResult<Lease> {
    let mut tx = pool.begin().await?;

    let tenant = Tenant::find_by_id(&mut *tx, data.tenant_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Tenant"))?;

    let unit = Unit::find_by_id(&mut *tx, data.unit_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Unit"))?;

    let lease = Lease::create(&mut *tx, data).await?;

    Unit::set_status(&mut *tx, unit.id, OccupancyStatus::Occupied).await?;

    if tenant.unit_id != Some(unit.id) {
        debug!(tenant_id = %tenant.id, unit_id = %unit.id, "Moving tenant to leased unit");
        Tenant::assign_unit(&mut *tx, tenant.id, unit.id).await?;
    }

    tx.commit().await?;

    info!(
        lease_id = %lease.id,
        tenant_id = %lease.tenant_id,
        unit_id = %lease.unit_id,
        "Lease created"
    );

    Ok(lease)
}
