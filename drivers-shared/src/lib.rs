//! # Drivers Shared Library
//!
//! Persistence layer for the drivers service, used by the API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool, migrations and seed data
//! - `models`: The `Driver` entity and its repository operations

pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
