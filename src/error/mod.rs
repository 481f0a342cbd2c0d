//! Error handling for errchain
//!
//! This module provides the chainable error type, its serialization,
//! result aliases, and error context utilities.

pub mod context;
mod serialize;
pub mod types;

pub use context::{OptionExt, ResultExt};
pub use types::{
    Cause, ChainError, ConfigError, ConfigResult, DynError, ErrorBuilder, IntoChainError,
    DEFAULT_NAME, SEPARATOR,
};

/// Result type whose failure is a [`ChainError`] by default
pub type Result<T, E = ChainError> = std::result::Result<T, E>;
