use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::adapters::{MemoryStore, SeaStore};
use crate::config::db::{StoreConfig, StoreKind};
use crate::error::AppError;
use crate::services::gateways::PersistenceGateway;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 1_000;

/// Retry a connection attempt with fixed interval delays.
/// Returns the result of the last attempt after all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "database connection established after retry");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "database connection failed, retrying");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Open a connection and bring the schema up to date.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging(false);

    let conn = retry_connection(
        || {
            let options = options.clone();
            async move { Database::connect(options).await.map_err(AppError::from) }
        },
        CONNECT_ATTEMPTS,
        CONNECT_RETRY_INTERVAL_MS,
    )
    .await?;

    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}

/// Build the persistence gateway named by the store config.
pub async fn connect_store(
    config: &StoreConfig,
) -> Result<Arc<dyn PersistenceGateway>, AppError> {
    match &config.kind {
        StoreKind::Postgres { url } => {
            let conn = connect_db(url).await?;
            info!(backend = "postgres", "store ready");
            Ok(Arc::new(SeaStore::new(conn)))
        }
        StoreKind::Memory => {
            warn!("using in-memory store, results are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
