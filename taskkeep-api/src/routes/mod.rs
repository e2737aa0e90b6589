/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Owner-scoped task management

pub mod auth;
pub mod health;
pub mod tasks;
