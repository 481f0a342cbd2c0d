//! errchain - causally linked errors
//!
//! This library creates errors, wraps them with context while keeping the
//! original as a traceable cause, walks the resulting chains, and turns
//! failing computations into explicit results.
//!
//! ```
//! use errchain::{new_error, wrap, deepest_cause, is_in_chain, ChainError};
//!
//! let root = new_error("connection refused");
//! let err = wrap(wrap(root.clone(), "fetching manifest"), "installing");
//!
//! assert_eq!(err.to_string(), "installing: fetching manifest: connection refused");
//! assert!(is_in_chain(&err, &root));
//!
//! let deepest = deepest_cause(&err).downcast_ref::<ChainError>().unwrap();
//! assert!(deepest.ptr_eq(&root));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use crate::core::{
    deepest_cause, find_in_chain, find_named, from_panic, is_in_chain, try_async, try_sync,
    Chain,
};
pub use error::{
    Cause, ChainError, ConfigError, ErrorBuilder, IntoChainError, OptionExt, Result, ResultExt,
};
pub use models::config::{Settings, StackCapture};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Create a terminal error carrying `message`
pub fn new_error(message: impl Into<String>) -> ChainError {
    ChainError::new(message)
}

/// Create an error with `message` whose cause is exactly `err`
pub fn wrap<E: IntoChainError>(err: E, message: impl Into<String>) -> ChainError {
    ChainError::wrap(err, message)
}
