//! Error types and definitions for errchain
//!
//! [`ChainError`] is a shared handle to an immutable error node. A node is
//! either created by this crate (a name, a message, an optional backtrace,
//! an optional cause and extra fields) or adopted from a foreign
//! [`std::error::Error`] value.

use std::any::Any;
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config;
use crate::core::chain::{self, Chain};
use crate::models::config::StackCapture;

/// Name given to errors unless the builder sets another one
pub const DEFAULT_NAME: &str = "Error";

/// Separator placed between messages when a chain is rendered
pub const SEPARATOR: &str = ": ";

/// Any thread-safe foreign error
pub type DynError = dyn StdError + Send + Sync + 'static;

/// An immutable, causally linked error.
///
/// Cloning is cheap and keeps identity: every clone refers to the same
/// error, see [`ChainError::ptr_eq`].
#[derive(Clone)]
pub struct ChainError {
    repr: Arc<Repr>,
}

enum Repr {
    Native(Node),
    Foreign(Box<dyn Foreign>),
}

trait Foreign: Send + Sync {
    fn error(&self) -> &DynError;
}

/// An adopted error stored at the start of an allocation of its own, so
/// zero-sized errors still get an address no other node shares.
#[repr(C)]
struct Adopted<E> {
    error: E,
    _anchor: u8,
}

impl<E> Foreign for Adopted<E>
where
    E: StdError + Send + Sync + 'static,
{
    fn error(&self) -> &DynError {
        &self.error
    }
}

impl Foreign for Box<DynError> {
    fn error(&self) -> &DynError {
        &**self
    }
}

struct Node {
    name: Cow<'static, str>,
    message: String,
    backtrace: Option<Backtrace>,
    cause: Option<Cause>,
    fields: Map<String, Value>,
}

/// What an error was caused by
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another error; traversal continues through it
    Error(ChainError),
    /// A value that is not an error; traversal stops before it
    Value(Value),
}

impl ChainError {
    /// Create a terminal error carrying `message`
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBuilder::new(message).build()
    }

    /// Create an error whose cause is exactly `err`.
    ///
    /// A `ChainError` passed here is linked by identity, anything else is
    /// adopted first.
    pub fn wrap<E: IntoChainError>(err: E, message: impl Into<String>) -> Self {
        ErrorBuilder::new(message).cause(err).build()
    }

    /// Start building an error with a custom name, cause or fields
    pub fn builder(message: impl Into<String>) -> ErrorBuilder {
        ErrorBuilder::new(message)
    }

    /// Adopt a boxed foreign error. A boxed `ChainError` is unboxed instead.
    ///
    /// Boxed zero-sized errors have no address of their own; identity checks
    /// against them only hold through the returned handle.
    pub fn from_boxed(err: Box<DynError>) -> Self {
        match err.downcast::<ChainError>() {
            Ok(chain) => *chain,
            Err(foreign) => Self {
                repr: Arc::new(Repr::Foreign(Box::new(foreign))),
            },
        }
    }

    fn adopt<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            repr: Arc::new(Repr::Foreign(Box::new(Adopted {
                error: err,
                _anchor: 0,
            }))),
        }
    }

    /// Coerce an arbitrary value into an error whose message is the value's
    /// string form: strings verbatim, anything else as JSON text.
    pub fn from_value(value: Value) -> Self {
        let message = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        Self::new(message)
    }

    /// Kind tag; `"Error"` unless the builder set another name
    pub fn name(&self) -> &str {
        match &*self.repr {
            Repr::Native(node) => &node.name,
            Repr::Foreign(_) => DEFAULT_NAME,
        }
    }

    /// This error's own message, without its causes
    pub fn message(&self) -> Cow<'_, str> {
        match &*self.repr {
            Repr::Native(node) => Cow::Borrowed(&node.message),
            Repr::Foreign(err) => Cow::Owned(err.error().to_string()),
        }
    }

    /// Backtrace captured when the error was created, if any
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match &*self.repr {
            Repr::Native(node) => node.backtrace.as_ref(),
            Repr::Foreign(_) => None,
        }
    }

    /// Rendered backtrace, if one was captured
    pub fn stack(&self) -> Option<String> {
        self.backtrace().map(|bt| bt.to_string())
    }

    /// Direct cause, when it is an error
    pub fn cause(&self) -> Option<&ChainError> {
        match self.raw_cause() {
            Some(Cause::Error(err)) => Some(err),
            _ => None,
        }
    }

    /// Direct cause, when it is a plain value
    pub fn cause_value(&self) -> Option<&Value> {
        match self.raw_cause() {
            Some(Cause::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Direct cause of either kind
    pub fn raw_cause(&self) -> Option<&Cause> {
        match &*self.repr {
            Repr::Native(node) => node.cause.as_ref(),
            Repr::Foreign(_) => None,
        }
    }

    /// True when this error was created by wrapping another error
    pub fn is_wrapped(&self) -> bool {
        self.cause().is_some()
    }

    /// Extra field set at construction
    pub fn field(&self, key: &str) -> Option<&Value> {
        match &*self.repr {
            Repr::Native(node) => node.fields.get(key),
            Repr::Foreign(_) => None,
        }
    }

    /// Extra fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        let fields = match &*self.repr {
            Repr::Native(node) => Some(node.fields.iter()),
            Repr::Foreign(_) => None,
        };
        fields.into_iter().flatten()
    }

    /// True when this error was adopted from a foreign error value
    pub fn is_foreign(&self) -> bool {
        matches!(&*self.repr, Repr::Foreign(_))
    }

    /// The adopted foreign error, if this error wraps one
    pub fn foreign(&self) -> Option<&DynError> {
        match &*self.repr {
            Repr::Foreign(err) => Some(err.error()),
            Repr::Native(_) => None,
        }
    }

    /// True when both handles refer to the same error
    pub fn ptr_eq(&self, other: &ChainError) -> bool {
        Arc::ptr_eq(&self.repr, &other.repr)
    }

    /// Iterate over this error and its causes, outermost first
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Deepest error reachable from this one
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        chain::deepest_cause(self)
    }

    /// The node traversal sees for this handle: adopted errors are seen as
    /// the foreign value itself.
    pub(crate) fn as_node(&self) -> &(dyn StdError + 'static) {
        match &*self.repr {
            Repr::Foreign(err) => err.error(),
            Repr::Native(_) => self,
        }
    }

    /// Own message for native errors; `None` for adopted ones
    pub(crate) fn native_message(&self) -> Option<&str> {
        match &*self.repr {
            Repr::Native(node) => Some(&node.message),
            Repr::Foreign(_) => None,
        }
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.repr {
            Repr::Foreign(err) => fmt::Display::fmt(err.error(), f),
            Repr::Native(_) => chain::render(self, f),
        }
    }
}

impl fmt::Debug for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.repr {
            Repr::Native(node) => {
                let mut debug = f.debug_struct("ChainError");
                debug.field("name", &node.name).field("message", &node.message);
                if let Some(cause) = &node.cause {
                    debug.field("cause", cause);
                }
                if !node.fields.is_empty() {
                    debug.field("fields", &node.fields);
                }
                debug.finish()
            }
            Repr::Foreign(err) => f.debug_tuple("ChainError").field(&err.error()).finish(),
        }
    }
}

impl StdError for ChainError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &*self.repr {
            Repr::Native(node) => match &node.cause {
                Some(Cause::Error(err)) => Some(err.as_node()),
                _ => None,
            },
            Repr::Foreign(err) => err.error().source(),
        }
    }
}

// Long chains are torn down iteratively instead of through nested drops.
impl Drop for Node {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(Cause::Error(err)) = next {
            next = match Arc::try_unwrap(err.repr) {
                Ok(Repr::Native(mut node)) => node.cause.take(),
                _ => None,
            };
        }
    }
}

/// Conversion into a [`ChainError`] that keeps identity when the value
/// already is one.
pub trait IntoChainError {
    fn into_chain_error(self) -> ChainError;
}

impl<E> IntoChainError for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_chain_error(self) -> ChainError {
        let mut slot = Some(self);
        if let Some(chain) = (&mut slot as &mut dyn Any).downcast_mut::<Option<ChainError>>() {
            if let Some(chain) = chain.take() {
                return chain;
            }
        }
        match slot {
            Some(err) => ChainError::adopt(err),
            None => unreachable!("only a ChainError is taken out of the slot"),
        }
    }
}

/// Builder for errors that need more than a message
#[derive(Debug)]
pub struct ErrorBuilder {
    name: Cow<'static, str>,
    message: String,
    cause: Option<Cause>,
    fields: Map<String, Value>,
    capture: Option<StackCapture>,
}

impl ErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_NAME),
            message: message.into(),
            cause: None,
            fields: Map::new(),
            capture: None,
        }
    }

    /// Set the error name, used as its kind tag
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Link an error as the cause
    pub fn cause<E: IntoChainError>(mut self, err: E) -> Self {
        self.cause = Some(Cause::Error(err.into_chain_error()));
        self
    }

    /// Record a non-error value as the cause
    pub fn cause_value(mut self, value: impl Into<Value>) -> Self {
        self.cause = Some(Cause::Value(value.into()));
        self
    }

    /// Attach an extra field, e.g. a numeric code
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Override the configured backtrace policy for this error
    pub fn capture(mut self, policy: StackCapture) -> Self {
        self.capture = Some(policy);
        self
    }

    pub fn build(self) -> ChainError {
        let policy = self
            .capture
            .unwrap_or_else(|| config::current().stack_capture);

        ChainError {
            repr: Arc::new(Repr::Native(Node {
                name: self.name,
                message: self.message,
                backtrace: policy.capture(),
                cause: self.cause,
                fields: self.fields,
            })),
        }
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {}", .path.display())]
    NotFound { path: std::path::PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {}", .path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {}", .path.display())]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting holds a value that cannot be used
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Settings were already initialised for this process
    #[error("Settings are already installed")]
    AlreadyInstalled,
}

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
