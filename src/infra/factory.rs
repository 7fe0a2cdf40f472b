use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::availability::AvailabilityChecker;
use crate::domain::services::guest_directory::GuestDirectory;
use crate::domain::services::ticketing::TicketingEngine;
use crate::infra::repositories::{
    sqlite_event_repo::SqliteEventRepo, sqlite_guest_repo::SqliteGuestRepo,
    sqlite_package_repo::SqlitePackageRepo, sqlite_request_repo::SqliteRequestRepo,
    sqlite_ticket_repo::SqliteTicketRepo,
};
use crate::infra::storage::fs_voucher_storage::FsVoucherStorage;
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let guest_repo = Arc::new(SqliteGuestRepo::new(pool.clone()));
    let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
    let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
    let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
    let package_repo = Arc::new(SqlitePackageRepo::new(pool.clone()));

    let guest_directory = Arc::new(GuestDirectory::new(guest_repo.clone()));
    let availability = Arc::new(AvailabilityChecker::new(request_repo.clone(), event_repo.clone()));
    let ticketing = Arc::new(TicketingEngine::new(
        ticket_repo.clone(),
        guest_repo.clone(),
        guest_directory.clone(),
    ));

    AppState {
        config: config.clone(),
        guest_repo,
        request_repo,
        ticket_repo,
        event_repo,
        package_repo,
        voucher_storage: Arc::new(FsVoucherStorage::new(config.voucher_dir.clone())),
        guest_directory,
        availability,
        ticketing,
    }
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
