//! Lease model and database operations
//!
//! A lease ties a tenant to a unit for a period. A lease without an end date
//! is the tenant's active lease.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE leases (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     unit_id UUID NOT NULL,
//!     tenant_id UUID NOT NULL,
//!     start_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     end_date TIMESTAMPTZ,
//!     document_url TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::common::{nullable, nullable_date, optional_date};
use super::tenant::Tenant;
use super::unit::Unit;

/// Lease record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: DateTime<Utc>,

    /// `None` while the lease is open-ended
    pub end_date: Option<DateTime<Utc>>,

    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lease {
    /// True if the lease has no end date
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Lease with its tenant and unit
///
/// Either side may be missing if it was deleted after the lease was written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseWithParties {
    #[serde(flatten)]
    pub lease: Lease,
    pub tenant: Option<Tenant>,
    pub unit: Option<Unit>,
}

/// Input for creating a lease
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLease {
    pub tenant_id: Uuid,
    pub unit_id: Uuid,

    /// Defaults to the current time
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 2048, message = "Document URL must be 1-2048 characters"))]
    pub document_url: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLease {
    pub unit_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,

    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<DateTime<Utc>>,

    /// `null` reopens the lease
    #[serde(default, deserialize_with = "nullable_date")]
    pub end_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "nullable")]
    pub document_url: Option<Option<String>>,
}

impl Lease {
    /// Inserts a lease, stamping `start_date` with now if it is missing
    pub async fn create<'e, E>(executor: E, data: CreateLease) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lease>(
            r#"
            INSERT INTO leases (unit_id, tenant_id, start_date, end_date, document_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, unit_id, tenant_id, start_date, end_date, document_url,
                      created_at, updated_at
            "#,
        )
        .bind(data.unit_id)
        .bind(data.tenant_id)
        .bind(data.start_date.unwrap_or_else(Utc::now))
        .bind(data.end_date)
        .bind(data.document_url)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, unit_id, tenant_id, start_date, end_date, document_url,
                   created_at, updated_at
            FROM leases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all leases, most recent start first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, unit_id, tenant_id, start_date, end_date, document_url,
                   created_at, updated_at
            FROM leases
            ORDER BY start_date DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    pub async fn list_by_tenant<'e, E>(
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, unit_id, tenant_id, start_date, end_date, document_url,
                   created_at, updated_at
            FROM leases
            WHERE tenant_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await
    }

    pub async fn list_by_unit<'e, E>(executor: E, unit_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, unit_id, tenant_id, start_date, end_date, document_url,
                   created_at, updated_at
            FROM leases
            WHERE unit_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(executor)
        .await
    }

    /// Applies a partial update. Returns `None` for an unknown id.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateLease,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE leases SET updated_at = NOW()");

        if let Some(unit_id) = data.unit_id {
            query.push(", unit_id = ").push_bind(unit_id);
        }
        if let Some(tenant_id) = data.tenant_id {
            query.push(", tenant_id = ").push_bind(tenant_id);
        }
        if let Some(start_date) = data.start_date {
            query.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            query.push(", end_date = ").push_bind(end_date);
        }
        if let Some(document_url) = data.document_url {
            query.push(", document_url = ").push_bind(document_url);
        }

        query.push(" WHERE id = ").push_bind(id).push(
            " RETURNING id, unit_id, tenant_id, start_date, end_date, document_url, \
             created_at, updated_at",
        );

        query
            .build_query_as::<Lease>()
            .fetch_optional(executor)
            .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM leases WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lease(end_date: Option<DateTime<Utc>>) -> Lease {
        let now = Utc::now();
        Lease {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            start_date: now,
            end_date,
            document_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_lease_has_no_end_date() {
        assert!(lease(None).is_active());

        let ended = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        assert!(!lease(Some(ended)).is_active());
    }

    #[test]
    fn test_create_lease_optional_dates() {
        let create: CreateLease = serde_json::from_value(serde_json::json!({
            "tenantId": Uuid::new_v4(),
            "unitId": Uuid::new_v4()
        }))
        .unwrap();

        assert!(create.start_date.is_none());
        assert!(create.end_date.is_none());
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_update_lease_end_date_null_reopens() {
        let update: UpdateLease = serde_json::from_str(r#"{"endDate": null}"#).unwrap();
        assert_eq!(update.end_date, Some(None));
    }

    #[test]
    fn test_lease_serializes_camel_case() {
        let json = serde_json::to_value(lease(None)).unwrap();
        assert!(json.get("tenantId").is_some());
        assert!(json.get("endDate").unwrap().is_null());
    }
}
