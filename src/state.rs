use std::sync::Arc;

use anyhow::anyhow;
use rollcall_config::{CorsConfig, DatabaseConfig, StoreBackend};
use rollcall_core::{Clock, SystemClock};
use rollcall_db::{MemoryStore, PgStore, Store};
use tracing::{info, warn};

/// Shared by every handler. The store and the clock are injected so tests can
/// substitute an in-memory store and a pinned date.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, cors_config: CorsConfig) -> Self {
        Self {
            store,
            clock,
            cors_config,
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database = DatabaseConfig::from_env()?;

    let store: Arc<dyn Store> = match database.backend {
        StoreBackend::Postgres => {
            let url = database
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;
            let store = PgStore::connect(url, database.max_connections).await?;
            store.migrate().await?;
            info!(max_connections = database.max_connections, "Connected to PostgreSQL");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(AppState::new(
        store,
        Arc::new(SystemClock),
        CorsConfig::from_env(),
    ))
}
