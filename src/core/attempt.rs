//! Adapters from failing computations to explicit results
//!
//! A computation fails by returning `Err` or by panicking. Either way the
//! caller gets `Err(ChainError)`; errors that already are `ChainError`s come
//! back unchanged.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use serde_json::Value;

use crate::config;
use crate::error::{ChainError, IntoChainError, Result};

/// Message for panics whose payload has no string form
pub const OPAQUE_PANIC_MESSAGE: &str = "panicked with a non-string payload";

/// Run `f` now and turn its error or panic into a [`ChainError`]
pub fn try_sync<T, E, F>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: IntoChainError,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(failed(err.into_chain_error())),
        Err(payload) => Err(panicked(payload)),
    }
}

/// Await `future` and turn its error or panic into a [`ChainError`].
///
/// Nothing is added around the await: no timeout, retry or cancellation.
pub async fn try_async<T, E, Fut>(future: Fut) -> Result<T>
where
    Fut: Future<Output = std::result::Result<T, E>>,
    E: IntoChainError,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(failed(err.into_chain_error())),
        Err(payload) => Err(panicked(payload)),
    }
}

fn failed(err: ChainError) -> ChainError {
    if config::current().log_failures {
        log::debug!("computation failed: {}", err);
    }
    err
}

fn panicked(payload: Box<dyn Any + Send>) -> ChainError {
    let err = from_panic(payload);
    if config::current().log_failures {
        log::debug!("computation panicked: {}", err);
    }
    err
}

/// Coerce a panic payload into an error
pub fn from_panic(payload: Box<dyn Any + Send>) -> ChainError {
    let payload = match payload.downcast::<ChainError>() {
        Ok(err) => return *err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<String>() {
        Ok(message) => return ChainError::new(*message),
        Err(other) => other,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return ChainError::new(*message),
        Err(other) => other,
    };
    match payload.downcast::<Value>() {
        Ok(value) => ChainError::from_value(*value),
        Err(_) => ChainError::new(OPAQUE_PANIC_MESSAGE),
    }
}
