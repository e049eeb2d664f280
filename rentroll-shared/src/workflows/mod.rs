//! Cross-entity write workflows
//!
//! These are the only operations that touch more than one table, and the
//! only ones that open a transaction.
//!
//! - `lease`: Lease creation (marks the unit occupied, moves the tenant)
//! - `assignment`: Tenant assignment to a unit or a house

pub mod assignment;
pub mod lease;
