//! Base error type.
//!
//! Downstream crates define their own enums and wrap `CoreError` through a
//! `#[from]` variant where they need to surface it.

use thiserror::Error;

/// Errors raised by `ev-core` parsing and validation helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time of day {0:?}: expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
