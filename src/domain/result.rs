//! Result type alias for Blackout operations
//!
//! Provides a convenient `Result` type that defaults the error to
//! [`BlackoutError`], so most signatures can be written as `Result<T>`.

use super::errors::BlackoutError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, BlackoutError>;
