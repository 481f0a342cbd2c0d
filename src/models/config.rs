//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};

/// Process-wide settings for error construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// When to capture a backtrace at error creation
    pub stack_capture: StackCapture,

    /// Whether the try adapters log the failures they convert
    pub log_failures: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stack_capture: StackCapture::Auto,
            log_failures: true,
        }
    }
}

/// Backtrace capture policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackCapture {
    /// Capture only when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enable it
    #[default]
    Auto,
    /// Always capture, regardless of the environment
    Always,
    /// Never capture
    Never,
}

impl StackCapture {
    /// Capture a backtrace according to this policy.
    ///
    /// Returns `None` when the policy or the platform yields nothing usable.
    pub fn capture(self) -> Option<Backtrace> {
        let backtrace = match self {
            StackCapture::Auto => Backtrace::capture(),
            StackCapture::Always => Backtrace::force_capture(),
            StackCapture::Never => return None,
        };

        match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace),
            _ => None,
        }
    }
}

impl std::str::FromStr for StackCapture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(StackCapture::Auto),
            "always" | "1" | "full" => Ok(StackCapture::Always),
            "never" | "0" | "off" => Ok(StackCapture::Never),
            _ => Err(format!("Invalid stack capture policy: {}", s)),
        }
    }
}

impl std::fmt::Display for StackCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackCapture::Auto => write!(f, "auto"),
            StackCapture::Always => write!(f, "always"),
            StackCapture::Never => write!(f, "never"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub stack_capture: Option<StackCapture>,
    pub log_failures: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.stack_capture.is_some() {
            self.stack_capture = other.stack_capture;
        }
        if other.log_failures.is_some() {
            self.log_failures = other.log_failures;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(stack_capture) = self.stack_capture {
            settings.stack_capture = stack_capture;
        }
        if let Some(log_failures) = self.log_failures {
            settings.log_failures = log_failures;
        }

        settings
    }
}
