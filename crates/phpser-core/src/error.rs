//! Error types for PHP serialization and deserialization.

use thiserror::Error;

/// Errors that can occur while encoding or decoding PHP serialized text.
#[derive(Error, Debug)]
pub enum PhpError {
    /// The value has no PHP serialized representation (e.g., an object with an
    /// invalid class name, or a serde value with non-string map keys).
    #[error("Encoding error: {0}")]
    Encode(String),

    /// The input text is not valid PHP serialized data.
    /// Includes the 0-based byte offset where the problem was detected.
    #[error("Decoding error at byte {offset}: {message}")]
    Decode { offset: usize, message: String },

    /// The JSON bridge could not parse its input or build its output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PhpError {
    pub(crate) fn encode(message: impl Into<String>) -> Self {
        PhpError::Encode(message.into())
    }

    pub(crate) fn decode(offset: usize, message: impl Into<String>) -> Self {
        PhpError::Decode {
            offset,
            message: message.into(),
        }
    }

    /// True for errors raised while producing serialized text.
    pub fn is_encode(&self) -> bool {
        matches!(self, PhpError::Encode(_))
    }

    /// True for errors raised while reading serialized text.
    pub fn is_decode(&self) -> bool {
        matches!(self, PhpError::Decode { .. })
    }

    /// Byte offset of a decoding error, if this is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            PhpError::Decode { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Convenience alias used throughout phpser-core.
pub type Result<T> = std::result::Result<T, PhpError>;
