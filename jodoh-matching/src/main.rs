use std::sync::Arc;

use jodoh_matching::config::AppConfig;
use jodoh_matching::matching::MatchEngine;
use jodoh_matching::store::{MemoryStore, PgStore, Store};
use jodoh_matching::AppState;
use jodoh_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jodoh_shared::middleware::init_tracing("jodoh-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics = jodoh_shared::middleware::init_metrics()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url, config.db_pool_size)?)),
        None => {
            tracing::warn!("no database_url configured, matching state will not survive a restart");
            Arc::new(MemoryStore::default())
        }
    };

    let engine = MatchEngine::open(store, config.selection_options())?;

    let state = Arc::new(AppState { engine, metrics });

    let app = jodoh_matching::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "jodoh-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
