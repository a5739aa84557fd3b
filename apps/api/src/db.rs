use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::store::postgres::PgProfileStore;

/// Connects to PostgreSQL and prepares the profile record store, creating
/// its tables if needed.
pub async fn create_store(database_url: &str) -> Result<PgProfileStore> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    let store = PgProfileStore::new(pool);
    store.init_schema().await?;

    info!("PostgreSQL profile store ready");
    Ok(store)
}
