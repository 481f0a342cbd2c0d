//! Data models and structures for errchain

pub mod config;

pub use config::{PartialSettings, Settings, StackCapture};
