//! Workflows that sit between the HTTP layer and the stores.
//!
//! - [`auth::AuthService`]: register, login, and token authentication
//! - [`tasks::TaskService`]: owner-scoped task CRUD

pub mod auth;
pub mod tasks;

pub use auth::{AccessToken, AuthService, Credentials};
pub use tasks::{NewTask, TaskService};
