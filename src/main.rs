use std::sync::Arc;

use clinicbook_api::{ApiState, config::ApiConfig, notifications::LogNotifier};
use clinicbook_db::{ClinicStore, MemoryStore, PgStore, create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Pick the store
    let store: Arc<dyn ClinicStore> = if config.uses_memory_store() {
        Arc::new(MemoryStore::new())
    } else {
        let db_pool = create_pool(&config.database_url).await?;
        initialize_database(&db_pool).await?;
        Arc::new(PgStore::new(db_pool))
    };

    let state = ApiState {
        store,
        notifier: Arc::new(LogNotifier),
        timezone: config.timezone,
        admin_password_hash: config.admin_password_hash.clone(),
        operator_email: config.admin_email.clone(),
    };

    // Start API server
    clinicbook_api::start_server(config, state).await?;

    Ok(())
}
