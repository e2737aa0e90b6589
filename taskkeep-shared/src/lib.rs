//! # TaskKeep Shared Library
//!
//! Core of the TaskKeep task tracker: models, stores, authentication
//! primitives, and the workflows the HTTP server calls.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, tokens, caller identity, ownership checks
//! - `db`: PostgreSQL pool and embedded migrations
//! - `error`: the workflow error type
//! - `models`: database models and their queries
//! - `services`: auth and task workflows
//! - `store`: store traits with PostgreSQL and in-memory implementations
//! - `validation`: input validation helpers

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

/// Current version of the TaskKeep shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
