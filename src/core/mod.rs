//! Core functionality for chain traversal and failure capture

pub mod attempt;
pub mod chain;

pub use attempt::{from_panic, try_async, try_sync};
pub use chain::{deepest_cause, find_in_chain, find_named, is_in_chain, Chain};
