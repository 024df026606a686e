//! # Rollcall Core
//!
//! Core types shared across the Rollcall API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`clock`]: Source of the server's current calendar date
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::errors::AppError;
//! use rollcall_core::clock::{Clock, SystemClock};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let today = SystemClock.today();
//! ```

pub mod clock;
pub mod errors;

// Re-export commonly used types at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{AppError, ErrorKind, ErrorResponse};
