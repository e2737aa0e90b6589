/// Database plumbing: the PostgreSQL pool and embedded migrations
///
/// Table access lives on the models (`models::user`, `models::task`) and is
/// reached through the PostgreSQL stores in `store::postgres`.
///
/// # Example
///
/// ```no_run
/// use taskkeep_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
