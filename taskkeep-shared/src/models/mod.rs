/// Database models and their queries
///
/// # Models
///
/// - `user`: registered accounts
/// - `task`: personal to-do items, each owned by one user
///
/// The workflows reach these through the store traits in `store`, never
/// directly.

pub mod task;
pub mod user;
