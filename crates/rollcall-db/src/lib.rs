//! # Rollcall DB
//!
//! The [`Store`] abstraction and its two implementations:
//!
//! - [`PgStore`]: PostgreSQL via SQLx, migrations embedded from `migrations/`
//! - [`MemoryStore`]: process-local tables for tests and single-node demos
//!
//! ```ignore
//! use rollcall_db::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let mut uow = store.begin().await?;
//! let users = uow.list_users().await?;
//! uow.commit().await?;
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, UnitOfWork};
