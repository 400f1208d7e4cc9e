//! # Hostkeep Shared Library
//!
//! Domain types, persistence and business logic for the Hostkeep
//! property-management API.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: The `EntityStore` trait with PostgreSQL and in-memory backends
//! - `integrity`: Back-reference, counter and cascade maintenance, reconciliation
//! - `populate`: Reads with related records inlined
//! - `services`: Per-entity operations used by the HTTP layer
//! - `auth`: Password hashing, tokens and the bearer guard
//! - `db`: Connection pool and migrations
//! - `error`: Service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod integrity;
pub mod models;
pub mod populate;
pub mod services;
pub mod store;

/// Current version of the Hostkeep shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
