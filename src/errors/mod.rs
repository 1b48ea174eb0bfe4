//! Centralized error handling for the live commentary engine
//!
//! Two layers of errors live here:
//!
//! - **Commentary Errors**: failures of a single fetch cycle (transport,
//!   protocol, timeout, decoding). These never escape the engine; they are
//!   folded into a skipped [`NormalizedResult`](crate::models::NormalizedResult)
//!   and the last good commentary stays on screen.
//! - **Application Errors**: configuration, validation and I/O problems raised
//!   while setting the engine up or running the CLI.
//!
//! # Usage
//!
//! ```rust
//! use live_commentary::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for a single fetch cycle
pub type CommentaryResult<T> = Result<T, CommentaryError>;
