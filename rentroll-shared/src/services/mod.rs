//! Per-entity CRUD services
//!
//! Each service owns a clone of the pool it was constructed with. Services
//! attach related records to reads and turn missing rows into `NotFound`.
//!
//! # Example
//!
//! ```no_run
//! use rentroll_shared::services::Services;
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let services = Services::new(pool);
//! let properties = services.properties.get_all().await?;
//! println!("{} properties", properties.len());
//! # Ok(())
//! # }
//! ```

pub mod lease;
pub mod property;
pub mod tenant;
pub mod unit;

use sqlx::PgPool;
use std::collections::HashMap;
use std::hash::Hash;

pub use lease::LeaseService;
pub use property::PropertyService;
pub use tenant::TenantService;
pub use unit::UnitService;

/// All services, built once from a single pool
#[derive(Clone)]
pub struct Services {
    pub properties: PropertyService,
    pub units: UnitService,
    pub tenants: TenantService,
    pub leases: LeaseService,
}

impl Services {
    pub fn new(pool: PgPool) -> Self {
        Self {
            properties: PropertyService::new(pool.clone()),
            units: UnitService::new(pool.clone()),
            tenants: TenantService::new(pool.clone()),
            leases: LeaseService::new(pool),
        }
    }
}

/// Buckets items by key, preserving order within each bucket
pub(crate) fn group_by<K, T>(items: Vec<T>, key: impl Fn(&T) -> K) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Indexes items by a unique key
pub(crate) fn index_by<K, T>(items: Vec<T>, key: impl Fn(&T) -> K) -> HashMap<K, T>
where
    K: Eq + Hash,
{
    items.into_iter().map(|item| (key(&item), item)).collect()
}

/// Deduplicated, non-empty ids for an `= ANY($1)` lookup
pub(crate) fn distinct_ids<I>(ids: I) -> Vec<uuid::Uuid>
where
    I: IntoIterator<Item = uuid::Uuid>,
{
    let mut ids: Vec<_> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_group_by_keeps_order() {
        let groups = group_by(vec![(1, "a"), (2, "b"), (1, "c")], |(k, _)| *k);
        assert_eq!(groups[&1], vec![(1, "a"), (1, "c")]);
        assert_eq!(groups[&2], vec![(2, "b")]);
    }

    #[test]
    fn test_index_by() {
        let index = index_by(vec![(1, "a"), (2, "b")], |(k, _)| *k);
        assert_eq!(index[&2], (2, "b"));
        assert!(!index.contains_key(&3));
    }

    #[test]
    fn test_distinct_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = distinct_ids(vec![a, b, a]);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }
}
