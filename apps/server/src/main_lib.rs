use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use walletbook_core::wallets::{
    HistoryService, HistoryServiceTrait, WalletService, WalletServiceTrait,
};
use walletbook_storage_sqlite::db::{self, write_actor};

pub struct AppState {
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub history_service: Arc<dyn HistoryServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("WB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    // All mutations go through the single writer connection.
    let writer = write_actor::spawn_writer(pool.as_ref().clone());

    let wallet_service = Arc::new(WalletService::new(writer.clone()));
    let history_service = Arc::new(HistoryService::new(writer));

    Ok(Arc::new(AppState {
        wallet_service,
        history_service,
    }))
}
