//! Database layer for fbarchive.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use fbarchive_common::{AppError, Config};
use sea_orm::{ConnectionTrait, ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    tracing::info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Roll back the most recent `steps` migrations.
pub async fn rollback(db: &DatabaseConnection, steps: u32) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::down(db, Some(steps))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    tracing::info!(steps, "Database migrations rolled back");
    Ok(())
}
