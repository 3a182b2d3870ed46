//! Error types for the ShapeLearn server.
//!
//! Request-level failures never reach this type; handlers map them to
//! JSON error envelopes directly. These errors stop the server from
//! starting.

use std::path::PathBuf;

/// A specialized `Result` type for server setup.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while configuring or starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your shapelearn.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The listener could not bind its address.
    #[error("Failed to bind to {address}: {source}\n\nSuggestion: Try a different port with --port")]
    BindError {
        /// Address that was requested, as `host:port`.
        address: String,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// General I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `BindError` for the given host and port.
    #[must_use]
    pub fn bind(host: &str, port: u16, source: std::io::Error) -> Self {
        Self::BindError {
            address: format!("{host}:{port}"),
            source,
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_display() {
        let err = ServerError::config_validation("port must be greater than 0", "Set port");
        let msg = err.to_string();
        assert!(msg.contains("Invalid configuration: port must be greater than 0"));
        assert!(msg.contains("Suggestion: Set port"));
    }

    #[test]
    fn test_config_parse_display() {
        let err = ServerError::config_parse("/etc/shapelearn.json", "expected value");
        let msg = err.to_string();
        assert!(msg.contains("/etc/shapelearn.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_bind_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = ServerError::bind("0.0.0.0", 5000, io_err);
        let msg = err.to_string();
        assert!(msg.contains("Failed to bind to 0.0.0.0:5000: address in use"));
        assert!(msg.contains("Suggestion: Try a different port with --port"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: ServerError = io_err.into();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
