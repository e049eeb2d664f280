//! Entity records and their SQL operations
//!
//! Every query function takes any Postgres executor, so the same call works
//! against the pool or inside a workflow's transaction.
//!
//! # Models
//!
//! - `property`: Apartment buildings and houses
//! - `unit`: Rentable units owned by a property
//! - `tenant`: People assigned to units
//! - `lease`: Tenancy periods linking a tenant to a unit
//! - `common`: Occupancy status and nullable-field helpers

pub mod common;
pub mod lease;
pub mod property;
pub mod tenant;
pub mod unit;
