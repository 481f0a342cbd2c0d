//! Error context utilities for errchain
//!
//! These traits implement the wrap-and-rethrow convention: a caller that
//! cannot handle a failure adds a message and passes it on, keeping the
//! original error as the cause.

use crate::error::{ChainError, IntoChainError, Result};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T> {
    /// Wrap the error with a message
    fn context<C>(self, message: C) -> Result<T>
    where
        C: Into<String>;

    /// Wrap the error with a lazily built message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: IntoChainError,
{
    fn context<C>(self, message: C) -> Result<T>
    where
        C: Into<String>,
    {
        self.map_err(|err| ChainError::wrap(err, message))
    }

    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|err| ChainError::wrap(err, context()))
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert None into a new terminal error with `message`
    fn context<C>(self, message: C) -> Result<T>
    where
        C: Into<String>;

    /// Convert Option to Result with a custom error
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ChainError;
}

impl<T> OptionExt<T> for Option<T> {
    fn context<C>(self, message: C) -> Result<T>
    where
        C: Into<String>,
    {
        self.ok_or_else(|| ChainError::new(message))
    }

    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> ChainError,
    {
        self.ok_or_else(err_fn)
    }
}
