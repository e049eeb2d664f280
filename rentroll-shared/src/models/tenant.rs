//! Tenant model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tenants (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     unit_id UUID,
//!     name VARCHAR(255) NOT NULL,
//!     phone VARCHAR(50) NOT NULL,
//!     email VARCHAR(255),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::common::nullable;
use super::lease::Lease;
use super::unit::Unit;
use crate::error::{DomainError, DomainResult};

/// Tenant record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    /// Assigned unit, if any
    pub unit_id: Option<Uuid>,

    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tenant with the unit it is assigned to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantWithUnit {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub unit: Option<Unit>,
}

/// Tenant with unit and full lease history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub unit: Option<Unit>,
    pub leases: Vec<Lease>,
}

impl TenantDetail {
    /// The open-ended lease, if the tenant has one
    pub fn active_lease(&self) -> Option<&Lease> {
        self.leases.iter().find(|lease| lease.is_active())
    }
}

/// Tenant fields as submitted by a form
///
/// Accepts either a full `name` or `firstName`/`lastName`, which are joined
/// with a space. Blank parts are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TenantForm {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Phone must be 1-50 characters"))]
    pub phone: String,

    pub email: Option<String>,

    /// Ignored by the assignment workflows, which pick the unit themselves
    pub unit_id: Option<Uuid>,
}

impl TenantForm {
    /// Full display name built from the submitted parts
    pub fn full_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Converts the form into an insert, linked to `unit_id`
    ///
    /// # Errors
    ///
    /// `ValidationFailure` if no name was given.
    pub fn into_create(self, unit_id: Option<Uuid>) -> DomainResult<CreateTenant> {
        let name = self.full_name();
        if name.is_empty() {
            return Err(DomainError::validation("Tenant name is required"));
        }

        Ok(CreateTenant {
            unit_id,
            name,
            phone: self.phone.trim().to_string(),
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        })
    }
}

/// Input for inserting a tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenant {
    pub unit_id: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenant {
    /// `null` unassigns the tenant
    #[serde(default, deserialize_with = "nullable")]
    pub unit_id: Option<Option<Uuid>>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Phone must be 1-50 characters"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
}

impl Tenant {
    pub async fn create<'e, E>(executor: E, data: CreateTenant) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (unit_id, name, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, unit_id, name, phone, email, created_at, updated_at
            "#,
        )
        .bind(data.unit_id)
        .bind(data.name)
        .bind(data.phone)
        .bind(data.email)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, unit_id, name, phone, email, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all tenants, newest first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, unit_id, name, phone, email, created_at, updated_at
            FROM tenants
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Lists the tenants assigned to one unit, newest first
    pub async fn list_by_unit<'e, E>(executor: E, unit_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, unit_id, name, phone, email, created_at, updated_at
            FROM tenants
            WHERE unit_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(executor)
        .await
    }

    /// Lists the tenants assigned to any of the given units, newest first
    pub async fn list_by_units<'e, E>(
        executor: E,
        unit_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, unit_id, name, phone, email, created_at, updated_at
            FROM tenants
            WHERE unit_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(unit_ids)
        .fetch_all(executor)
        .await
    }

    pub async fn find_many<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, unit_id, name, phone, email, created_at, updated_at
            FROM tenants
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// Applies a partial update. Returns `None` for an unknown id.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateTenant,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE tenants SET updated_at = NOW()");

        if let Some(unit_id) = data.unit_id {
            query.push(", unit_id = ").push_bind(unit_id);
        }
        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(email) = data.email {
            query.push(", email = ").push_bind(email);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, unit_id, name, phone, email, created_at, updated_at");

        query
            .build_query_as::<Tenant>()
            .fetch_optional(executor)
            .await
    }

    /// Points the tenant at a unit
    pub async fn assign_unit<'e, E>(
        executor: E,
        id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET unit_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, unit_id, name, phone, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(unit_id)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a tenant. Their leases are kept.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn form(first: &str, last: &str) -> TenantForm {
        TenantForm {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            phone: " 555-0100 ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_name_joins_parts() {
        assert_eq!(form("Ada", "Lovelace").full_name(), "Ada Lovelace");
        assert_eq!(form(" Ada ", "").full_name(), "Ada");
        assert_eq!(form("", "Lovelace").full_name(), "Lovelace");
    }

    #[test]
    fn test_full_name_prefers_name() {
        let mut f = form("Ada", "Lovelace");
        f.name = Some("Countess of Lovelace".to_string());
        assert_eq!(f.full_name(), "Countess of Lovelace");

        f.name = Some("   ".to_string());
        assert_eq!(f.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_into_create_trims_and_drops_blank_email() {
        let mut f = form("Ada", "Lovelace");
        f.email = Some("  ".to_string());
        let unit_id = Uuid::new_v4();

        let create = f.into_create(Some(unit_id)).unwrap();
        assert_eq!(create.unit_id, Some(unit_id));
        assert_eq!(create.phone, "555-0100");
        assert!(create.email.is_none());
    }

    #[test]
    fn test_into_create_requires_name() {
        let err = form("", " ").into_create(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_update_tenant_can_clear_unit() {
        let update: UpdateTenant = serde_json::from_str(r#"{"unitId": null}"#).unwrap();
        assert_eq!(update.unit_id, Some(None));

        let update: UpdateTenant = serde_json::from_str("{}").unwrap();
        assert_eq!(update.unit_id, None);
    }
}
