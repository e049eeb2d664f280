//! Property model and database operations
//!
//! A property is either an apartment building that owns any number of units,
//! or a house that behaves as a single implicit unit. Rent, bedrooms,
//! bathrooms, and occupancy are only meaningful for houses.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE properties (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     address TEXT NOT NULL,
//!     property_type property_type NOT NULL DEFAULT 'APARTMENT',
//!     occupancy occupancy_status NOT NULL DEFAULT 'VACANT',
//!     monthly_rent DOUBLE PRECISION,
//!     bedrooms INTEGER,
//!     bathrooms INTEGER,
//!     city VARCHAR(255),
//!     country VARCHAR(255),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rentroll_shared::models::property::{CreateProperty, Property, PropertyType};
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! let property = Property::create(&pool, CreateProperty {
//!     name: "Sunrise".to_string(),
//!     address: "1 Main St".to_string(),
//!     property_type: PropertyType::Apartment,
//!     ..Default::default()
//! }).await?;
//! println!("Created property {}", property.id);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::common::{nullable, OccupancyStatus};
use super::unit::Unit;

/// Kind of property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    /// Multi-unit building
    #[default]
    Apartment,

    /// Single-family house, treated as one implicit unit
    House,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "APARTMENT",
            PropertyType::House => "HOUSE",
        }
    }

    pub fn is_house(&self) -> bool {
        matches!(self, PropertyType::House)
    }
}

/// Property record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub property_type: PropertyType,

    /// Only tracked for houses; apartments keep the default
    pub occupancy: OccupancyStatus,

    /// Houses only
    pub monthly_rent: Option<f64>,

    /// Houses only
    pub bedrooms: Option<i32>,

    /// Houses only
    pub bathrooms: Option<i32>,

    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property with its units attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyWithUnits {
    #[serde(flatten)]
    pub property: Property,
    pub units: Vec<Unit>,
}

/// Input for creating a property
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[serde(default)]
    pub property_type: PropertyType,

    /// Defaults to VACANT
    #[serde(default)]
    pub occupancy: OccupancyStatus,

    #[validate(range(min = 0.0, message = "Monthly rent cannot be negative"))]
    pub monthly_rent: Option<f64>,

    #[validate(range(min = 0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: Option<i32>,

    #[validate(range(min = 0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<i32>,

    pub city: Option<String>,
    pub country: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,

    pub property_type: Option<PropertyType>,
    pub occupancy: Option<OccupancyStatus>,

    /// `null` clears the rent
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0.0, message = "Monthly rent cannot be negative"))]
    pub monthly_rent: Option<Option<f64>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: Option<Option<i32>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<Option<i32>>,

    #[serde(default, deserialize_with = "nullable")]
    pub city: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
}

impl Property {
    /// Inserts a property and returns it with generated id and timestamps
    pub async fn create<'e, E>(executor: E, data: CreateProperty) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties
                (name, address, property_type, occupancy, monthly_rent,
                 bedrooms, bathrooms, city, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, address, property_type, occupancy, monthly_rent,
                      bedrooms, bathrooms, city, country, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.address)
        .bind(data.property_type)
        .bind(data.occupancy)
        .bind(data.monthly_rent)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .bind(data.city)
        .bind(data.country)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, address, property_type, occupancy, monthly_rent,
                   bedrooms, bathrooms, city, country, created_at, updated_at
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Lists all properties, newest first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT id, name, address, property_type, occupancy, monthly_rent,
                   bedrooms, bathrooms, city, country, created_at, updated_at
            FROM properties
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Applies a partial update
    ///
    /// Returns `None` if no property has this id. An empty update only bumps
    /// `updated_at`.
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateProperty,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE properties SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(address) = data.address {
            query.push(", address = ").push_bind(address);
        }
        if let Some(property_type) = data.property_type {
            query.push(", property_type = ").push_bind(property_type);
        }
        if let Some(occupancy) = data.occupancy {
            query.push(", occupancy = ").push_bind(occupancy);
        }
        if let Some(rent) = data.monthly_rent {
            query.push(", monthly_rent = ").push_bind(rent);
        }
        if let Some(bedrooms) = data.bedrooms {
            query.push(", bedrooms = ").push_bind(bedrooms);
        }
        if let Some(bathrooms) = data.bathrooms {
            query.push(", bathrooms = ").push_bind(bathrooms);
        }
        if let Some(city) = data.city {
            query.push(", city = ").push_bind(city);
        }
        if let Some(country) = data.country {
            query.push(", country = ").push_bind(country);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(
                " RETURNING id, name, address, property_type, occupancy, monthly_rent, \
                 bedrooms, bathrooms, city, country, created_at, updated_at",
            );

        query
            .build_query_as::<Property>()
            .fetch_optional(executor)
            .await
    }

    /// Sets house occupancy
    pub async fn set_occupancy<'e, E>(
        executor: E,
        id: Uuid,
        occupancy: OccupancyStatus,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET occupancy = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, address, property_type, occupancy, monthly_rent,
                      bedrooms, bathrooms, city, country, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(occupancy)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a property. Its units are left in place.
    ///
    /// Returns false if the property did not exist.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
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
    fn test_property_type_as_str() {
        assert_eq!(PropertyType::Apartment.as_str(), "APARTMENT");
        assert_eq!(PropertyType::House.as_str(), "HOUSE");
        assert!(PropertyType::House.is_house());
        assert!(!PropertyType::Apartment.is_house());
    }

    #[test]
    fn test_create_property_defaults() {
        let create: CreateProperty = serde_json::from_value(serde_json::json!({
            "name": "Sunrise",
            "address": "1 Main St"
        }))
        .unwrap();

        assert_eq!(create.property_type, PropertyType::Apartment);
        assert_eq!(create.occupancy, OccupancyStatus::Vacant);
        assert!(create.monthly_rent.is_none());
    }

    #[test]
    fn test_create_property_camel_case() {
        let create: CreateProperty = serde_json::from_value(serde_json::json!({
            "name": "Oak Cottage",
            "address": "4 Elm Rd",
            "propertyType": "HOUSE",
            "monthlyRent": 1850.0,
            "bedrooms": 3
        }))
        .unwrap();

        assert_eq!(create.property_type, PropertyType::House);
        assert_eq!(create.monthly_rent, Some(1850.0));
        assert_eq!(create.bedrooms, Some(3));
    }

    #[test]
    fn test_create_property_validation() {
        let create = CreateProperty {
            name: String::new(),
            address: "1 Main St".to_string(),
            monthly_rent: Some(-10.0),
            ..Default::default()
        };

        let errors = create.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("monthly_rent"));
    }

    #[test]
    fn test_update_property_default_is_empty() {
        let update = UpdateProperty::default();
        assert!(update.name.is_none());
        assert!(update.occupancy.is_none());
        assert!(update.city.is_none());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_property_null_clears_amounts() {
        let absent: UpdateProperty = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(absent.monthly_rent, None);
        assert_eq!(absent.bedrooms, None);

        let cleared: UpdateProperty = serde_json::from_value(serde_json::json!({
            "monthlyRent": null,
            "bedrooms": null
        }))
        .unwrap();
        assert_eq!(cleared.monthly_rent, Some(None));
        assert_eq!(cleared.bedrooms, Some(None));
        assert_eq!(cleared.bathrooms, None);

        let set: UpdateProperty =
            serde_json::from_value(serde_json::json!({ "monthlyRent": 1200.0 })).unwrap();
        assert_eq!(set.monthly_rent, Some(Some(1200.0)));
    }

    #[test]
    fn test_update_property_validates_inner_amounts() {
        let update = UpdateProperty {
            monthly_rent: Some(Some(-1.0)),
            bathrooms: Some(None),
            ..Default::default()
        };

        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("monthly_rent"));
        assert!(!fields.contains_key("bathrooms"));
    }
}
