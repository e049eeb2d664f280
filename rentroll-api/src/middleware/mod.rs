//! Middleware modules for the API server
//!
//! - `error_detail`: exposes internal error detail outside production

pub mod error_detail;
