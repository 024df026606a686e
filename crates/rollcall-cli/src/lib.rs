//! # Rollcall CLI
//!
//! Seeding utilities for Rollcall testing and development.
//!
//! The seeder writes through the [`Store`](rollcall_db::Store) interface, so
//! it runs the same against PostgreSQL and the in-memory store.
//!
//! ## Usage
//!
//! ```ignore
//! use rollcall_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(4, 40).with_courses(6);
//! seed_all(&store, &config, today).await?;
//! ```

pub mod seeder;
