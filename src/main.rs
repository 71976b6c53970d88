use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use pubgames_api::config::ApiConfig;
use pubgames_db::{BookingStore, MemoryStore, PgStore, create_pool, schema::initialize_database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    pubgames_api::init_tracing(config.log_level)?;

    let store: Arc<dyn BookingStore> = if config.uses_memory_store() {
        warn!("Running on the in-memory store, nothing survives a restart");
        Arc::new(MemoryStore::new())
    } else {
        // Create database connection pool
        let db_pool = create_pool(&config.database_url).await?;

        // Initialize database schema
        initialize_database(&db_pool).await?;
        info!("Database schema ready");

        Arc::new(PgStore::new(db_pool))
    };

    // Start API server
    pubgames_api::start_server(config, store).await?;

    Ok(())
}
