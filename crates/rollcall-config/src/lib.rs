//! # Rollcall Config
//!
//! Configuration loaded from environment variables:
//!
//! - [`server`]: listener address and observability switches
//! - [`database`]: store backend selection and pool sizing
//! - [`cors`]: allowed CORS origins
//!
//! ```ignore
//! use rollcall_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let database = DatabaseConfig::from_env()?;
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod server;

pub use cors::CorsConfig;
pub use database::{ConfigError, DatabaseConfig, StoreBackend};
pub use server::ServerConfig;
