pub mod pool;
pub mod subscriptions;
pub mod users;

pub use pool::create_pool;

use sqlx::SqlitePool;

/// Database handle shared across handlers (the pool is internally reference counted)
pub type Db = SqlitePool;

/// Apply the embedded migrations in `./migrations`
pub async fn run_migrations(pool: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

/// Check database connectivity with a trivial round trip
pub async fn ping(pool: &Db) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
