use std::{env, str::FromStr};

use guestlist_server::DEFAULT_PORT;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} was not specified")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where guests and tables are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Store {
    Postgres(String),
    /// Nothing survives a restart
    Memory,
}

/// Settings read from the environment on startup
#[derive(Debug, Clone)]
pub struct Config {
    pub store: Store,
    pub port: u16,
    /// Size of the postgres connection pool
    pub max_connections: u32,
    /// Serialize capacity checks per table
    pub table_locks: bool,
    /// Include debug logs
    pub verbose: bool,
}

impl Config {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match lookup("DATABASE_URL") {
            Some(url) if url == "memory" => Store::Memory,
            Some(url) => Store::Postgres(url),
            None => return Err(ConfigError::Missing("DATABASE_URL")),
        };

        Ok(Self {
            store,
            port: parse_or(&lookup, "GUESTLIST_SERVER_PORT", DEFAULT_PORT)?,
            max_connections: parse_or(
                &lookup,
                "GUESTLIST_MAX_CONNECTIONS",
                Self::DEFAULT_MAX_CONNECTIONS,
            )?,
            table_locks: parse_or(&lookup, "GUESTLIST_TABLE_LOCKS", true)?,
            verbose: parse_or(&lookup, "GUESTLIST_VERBOSE", false)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
