//! Unit model and database operations
//!
//! A unit is a rentable space owned by exactly one property. Houses get a
//! single backing unit numbered `HOUSE` the first time a tenant is assigned.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE units (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     property_id UUID NOT NULL,
//!     unit_number VARCHAR(50) NOT NULL,
//!     rent_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
//!     status occupancy_status NOT NULL DEFAULT 'VACANT',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::common::OccupancyStatus;
use super::tenant::Tenant;

/// Unit number given to the implicit unit backing a house
pub const HOUSE_UNIT_NUMBER: &str = "HOUSE";

/// Unit record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub rent_amount: f64,
    pub status: OccupancyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unit with its assigned tenants
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitWithTenants {
    #[serde(flatten)]
    pub unit: Unit,
    pub tenants: Vec<Tenant>,
}

/// Input for creating a unit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    pub property_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Unit number must be 1-50 characters"))]
    pub unit_number: String,

    #[validate(range(min = 0.0, message = "Rent amount cannot be negative"))]
    pub rent_amount: f64,

    #[serde(default)]
    pub status: OccupancyStatus,
}

impl CreateUnit {
    /// The backing unit synthesized for a house on first tenant assignment
    pub fn for_house(property_id: Uuid, monthly_rent: Option<f64>) -> Self {
        Self {
            property_id,
            unit_number: HOUSE_UNIT_NUMBER.to_string(),
            rent_amount: monthly_rent.unwrap_or(0.0),
            status: OccupancyStatus::Occupied,
        }
    }
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnit {
    pub property_id: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Unit number must be 1-50 characters"))]
    pub unit_number: Option<String>,

    #[validate(range(min = 0.0, message = "Rent amount cannot be negative"))]
    pub rent_amount: Option<f64>,

    pub status: Option<OccupancyStatus>,
}

impl Unit {
    pub async fn create<'e, E>(executor: E, data: CreateUnit) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (property_id, unit_number, rent_amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, property_id, unit_number, rent_amount, status, created_at, updated_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.unit_number)
        .bind(data.rent_amount)
        .bind(data.status)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, unit_number, rent_amount, status, created_at, updated_at
            FROM units
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all units, newest first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, unit_number, rent_amount, status, created_at, updated_at
            FROM units
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Lists the units of one property, oldest first
    ///
    /// For a house the first entry is its backing unit.
    pub async fn list_by_property<'e, E>(
        executor: E,
        property_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, unit_number, rent_amount, status, created_at, updated_at
            FROM units
            WHERE property_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(executor)
        .await
    }

    /// Lists the units belonging to any of the given properties
    pub async fn list_by_properties<'e, E>(
        executor: E,
        property_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, unit_number, rent_amount, status, created_at, updated_at
            FROM units
            WHERE property_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(property_ids)
        .fetch_all(executor)
        .await
    }

    /// Fetches the units with the given ids, in no particular order
    pub async fn find_many<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, property_id, unit_number, rent_amount, status, created_at, updated_at
            FROM units
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
        data: UpdateUnit,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE units SET updated_at = NOW()");

        if let Some(property_id) = data.property_id {
            query.push(", property_id = ").push_bind(property_id);
        }
        if let Some(unit_number) = data.unit_number {
            query.push(", unit_number = ").push_bind(unit_number);
        }
        if let Some(rent_amount) = data.rent_amount {
            query.push(", rent_amount = ").push_bind(rent_amount);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id).push(
            " RETURNING id, property_id, unit_number, rent_amount, status, created_at, updated_at",
        );

        query
            .build_query_as::<Unit>()
            .fetch_optional(executor)
            .await
    }

    pub async fn set_status<'e, E>(
        executor: E,
        id: Uuid,
        status: OccupancyStatus,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, property_id, unit_number, rent_amount, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a unit. Tenants and leases pointing at it are kept.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_unit_uses_monthly_rent() {
        let property_id = Uuid::new_v4();
        let unit = CreateUnit::for_house(property_id, Some(1500.0));

        assert_eq!(unit.property_id, property_id);
        assert_eq!(unit.unit_number, HOUSE_UNIT_NUMBER);
        assert_eq!(unit.rent_amount, 1500.0);
        assert_eq!(unit.status, OccupancyStatus::Occupied);
    }

    #[test]
    fn test_house_unit_without_rent() {
        let unit = CreateUnit::for_house(Uuid::new_v4(), None);
        assert_eq!(unit.rent_amount, 0.0);
    }

    #[test]
    fn test_create_unit_status_defaults_to_vacant() {
        let create: CreateUnit = serde_json::from_value(serde_json::json!({
            "propertyId": Uuid::new_v4(),
            "unitNumber": "1A",
            "rentAmount": 1200
        }))
        .unwrap();

        assert_eq!(create.status, OccupancyStatus::Vacant);
        assert_eq!(create.rent_amount, 1200.0);
    }

    #[test]
    fn test_non_numeric_rent_is_rejected() {
        let result: Result<CreateUnit, _> = serde_json::from_value(serde_json::json!({
            "propertyId": Uuid::new_v4(),
            "unitNumber": "1A",
            "rentAmount": "twelve hundred"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_update_unit_validation() {
        let update = UpdateUnit {
            unit_number: Some(String::new()),
            rent_amount: Some(-1.0),
            ..Default::default()
        };

        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit_number"));
        assert!(errors.field_errors().contains_key("rent_amount"));
    }
}
