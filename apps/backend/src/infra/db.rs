use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

/// Open the pooled connection backing the database principal store.
///
/// `acquire_timeout` should not exceed the principal lookup timeout, or a
/// starved pool surfaces as a lookup timeout rather than a pool error.
/// Does NOT run migrations.
pub async fn connect_db(
    database_url: &str,
    acquire_timeout: Duration,
) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.min_connections(1)
        .max_connections(16)
        .acquire_timeout(acquire_timeout)
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .map_err(|e| AppError::config(format!("failed to connect to database: {e}")))?;

    info!("Database connected");
    Ok(conn)
}
