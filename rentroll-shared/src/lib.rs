//! # Rentroll Shared Library
//!
//! Domain types, storage access, and write workflows used by the Rentroll
//! API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Entity records and their SQL operations
//! - `services`: Per-entity CRUD services with related records attached
//! - `workflows`: Cross-entity write workflows (lease creation, tenant assignment)
//! - `error`: Tagged domain error type

pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod workflows;

/// Current version of the Rentroll shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
