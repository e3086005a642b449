use std::sync::Arc;

use colored::Colorize;
use config::{Config, ConfigError, Store};
use guestlist_ledger::{
    Config as SeatingConfig, DatabaseError, MemoryDatabase, PgDatabase, Seating, SharedDatabase,
};
use guestlist_server::{run_server, ServerContext};
use log::{error, info, warn};
use thiserror::Error;

mod config;
mod logging;

#[derive(Debug, Error)]
enum GuestlistError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server stopped unexpectedly: {0}")]
    Server(#[from] std::io::Error),
}

impl GuestlistError {
    fn hint(&self) -> String {
        match self {
            GuestlistError::Config(_) => "Set DATABASE_URL to a postgres URL, or to \"memory\" to run without a database. Other settings are optional.".to_string(),
            GuestlistError::Database(_) => "This is a database error. Make sure postgres is running and DATABASE_URL points at it, then try again.".to_string(),
            GuestlistError::Server(_) => "The server could not listen or stopped. Check that GUESTLIST_SERVER_PORT is free.".to_string(),
        }
    }
}

async fn run(config: Config) -> Result<(), GuestlistError> {
    match &config.store {
        Store::Memory => {
            warn!("Using an in-memory database, nothing will be kept after shutdown");

            let database: SharedDatabase = Arc::new(MemoryDatabase::new());
            serve(database, &config).await
        }
        Store::Postgres(url) => {
            info!("Connecting to database...");

            let database = Arc::new(PgDatabase::new(url, config.max_connections).await?);
            database.migrate().await?;

            let result = serve(database.clone(), &config).await;

            info!("Closing database connections...");
            database.close().await;

            result
        }
    }
}

async fn serve(database: SharedDatabase, config: &Config) -> Result<(), GuestlistError> {
    if !config.table_locks {
        warn!("Table locks are disabled, concurrent registrations may overflow a table");
    }

    let seating = Seating::new(
        database,
        SeatingConfig {
            table_locks: config.table_locks,
        },
    );

    run_server(ServerContext::new(seating), config.port, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => error!("Could not listen for shutdown signal: {e}"),
    }
}

fn report(error: GuestlistError) {
    error!(
        "{} Read the error below to troubleshoot the issue.",
        "guestlist failed to start!".bold().red()
    );
    error!("{}", error);
    error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    logging::init_logger(config.as_ref().is_ok_and(|c| c.verbose));

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => info!("Stopped."),
        Err(error) => report(error),
    }
}
