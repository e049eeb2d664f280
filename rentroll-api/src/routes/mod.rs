//! API route handlers, one module per resource
//!
//! - `health`: Health check endpoint
//! - `properties`, `units`, `tenants`, `leases`: CRUD and workflow endpoints

pub mod health;
pub mod leases;
pub mod properties;
pub mod tenants;
pub mod units;
