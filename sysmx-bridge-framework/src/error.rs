//! Error types for the bridge framework.

use thiserror::Error;

use crate::lifecycle::RegistrationState;

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur in a bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The attribute is not part of the bridge's namespace, or is not writable.
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// The provider failed while computing an attribute.
    #[error("Unexpected error in provider fetch of {category}: {message}")]
    ProviderFailure { category: String, message: String },

    /// A writable attribute was given a value it cannot accept.
    #[error("Invalid value for attribute {attribute}: {reason}")]
    InvalidValue { attribute: String, reason: String },

    /// The bridge's identity could not be derived.
    #[error("Invalid identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    /// The bridge does not expose the requested operation.
    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    /// A lifecycle step was attempted from the wrong registration state.
    #[error("Cannot {operation} while {state}")]
    IllegalState {
        operation: &'static str,
        state: RegistrationState,
    },

    /// No bridge is registered under the given name.
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// A bridge is already registered under the given name.
    #[error("Instance already exists: {0}")]
    InstanceAlreadyExists(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parse error.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A registration hook refused to proceed.
    #[error("Registration hook failed: {0}")]
    HookFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create an attribute-not-found error.
    pub fn not_found(attribute: impl Into<String>) -> Self {
        Self::AttributeNotFound(attribute.into())
    }

    /// Create an invalid-value error.
    pub fn invalid_value(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }

    /// Create a hook failure, for `pre_deregister` implementations that
    /// cannot release their resources yet.
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::HookFailed(msg.into())
    }

    /// Whether this is an [`AttributeNotFound`](Self::AttributeNotFound) error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound(_))
    }
}

/// Wrap a provider error for the attribute category that was being read.
///
/// The provider's own error type never escapes a bridge; only its message
/// is kept.
pub fn unexpected_error<E>(category: impl Into<String>, err: E) -> BridgeError
where
    E: std::error::Error,
{
    BridgeError::ProviderFailure {
        category: category.into(),
        message: err.to_string(),
    }
}

impl From<sysmx_common::Error> for BridgeError {
    fn from(err: sysmx_common::Error) -> Self {
        match err {
            sysmx_common::Error::Config(msg) => Self::Config(msg),
            other => Self::Serialization(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<json5::Error> for BridgeError {
    fn from(err: json5::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
