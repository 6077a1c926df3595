use crate::config::Config;
use crate::store::{AttendanceStore, MemoryStore, MySqlStore};
use actix_web::web::Data;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::warn;

/// Pick the record store for this process: MySQL when `DATABASE_URL` is set,
/// otherwise a process-local in-memory store.
pub async fn init_store(config: &Config) -> Result<Data<dyn AttendanceStore>> {
    let store: Arc<dyn AttendanceStore> = match &config.database_url {
        Some(url) => Arc::new(
            MySqlStore::connect(url)
                .await
                .context("Failed to connect to database")?,
        ),
        None => {
            warn!("DATABASE_URL not set, attendance is kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(Data::from(store))
}
