//! Error types shared across the conversion engine

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion error taxonomy
///
/// Every component surfaces errors to the caller of the conversion facade;
/// nothing is swallowed or replaced by a default value.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid base URI or namespace prefix
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown format name requested from the registry
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed input for a given format
    #[error("parse error in {format}: {message}")]
    Parse {
        format: String,
        /// Byte offset or 1-based line number, when the grammar can report one
        position: Option<usize>,
        message: String,
    },

    /// A value cannot be represented in the target format
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Two distinct node keys sanitize to the same URI
    #[error("identifier collision: keys {first:?} and {second:?} both map to <{uri}>")]
    IdentifierCollision {
        first: String,
        second: String,
        uri: String,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create an unsupported-format error
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Error::UnsupportedFormat(name.into())
    }

    /// Create a parse error with no position hint
    pub fn parse(format: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Parse {
            format: format.into(),
            position: None,
            message: msg.into(),
        }
    }

    /// Create a parse error carrying a position hint
    pub fn parse_at(format: impl Into<String>, position: usize, msg: impl Into<String>) -> Self {
        Error::Parse {
            format: format.into(),
            position: Some(position),
            message: msg.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Error::Encoding(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_position() {
        let err = Error::parse_at("turtle", 42, "unterminated string literal");
        match err {
            Error::Parse { format, position, .. } => {
                assert_eq!(format, "turtle");
                assert_eq!(position, Some(42));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collision_display() {
        let err = Error::IdentifierCollision {
            first: "a b".to_string(),
            second: "a%20b".to_string(),
            uri: "http://example.org/kg/a%20b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("identifier collision"));
        assert!(msg.contains("a%20b"));
    }
}
