use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates the PostgreSQL pool backing the pattern store.
///
/// Connection is lazy so an unreachable database at startup degrades to the
/// file store instead of aborting the process.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect_lazy(database_url)?;

    info!("PostgreSQL pool configured for pattern store");
    Ok(pool)
}
