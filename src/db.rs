use anyhow::Context;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use tracing::info;

/// Opens the pool. `connect` establishes a first connection, so an unreachable
/// database fails here.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("connect to database")?;
    info!(max_connections, "connected to PostgreSQL");
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(db).await
}
