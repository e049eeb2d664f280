//! Database layer
//!
//! - `pool`: PostgreSQL connection pool
//! - `migrations`: Embedded schema migrations
//!
//! Entity queries live in `crate::models`.

pub mod migrations;
pub mod pool;
