//! Store backend selection.
//!
//! - `STORE_BACKEND`: `postgres` (default) or `memory`
//! - `DATABASE_URL`: required for `postgres`
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default `5`)

use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError(format!("unknown STORE_BACKEND '{other}'"))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::default(),
        };

        let url = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty());
        if backend == StoreBackend::Postgres && url.is_none() {
            return Err(ConfigError(
                "DATABASE_URL must be set when STORE_BACKEND=postgres".to_string(),
            ));
        }

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        Ok(Self {
            backend,
            url,
            max_connections,
        })
    }

    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 1,
        }
    }
}
