//! Error types for STL decoding.

use std::fmt;
use thiserror::Error;

/// Where in the input a bad value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Line number in ASCII input (1-indexed).
    Line(usize),
    /// Byte offset into binary input.
    Offset(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {}", line),
            Location::Offset(offset) => write!(f, "byte offset {}", offset),
        }
    }
}

/// Errors that can occur while detecting or decoding an STL buffer.
///
/// Every error is terminal for the decode call that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StlError {
    /// Neither the binary size check nor the ASCII `solid` marker matched.
    #[error("Unrecognized format: buffer is neither binary STL nor ASCII STL")]
    UnrecognizedFormat,

    /// The declared triangle count needs more bytes than the buffer holds.
    #[error("Truncated binary STL: expected at least {expected} bytes, got {actual}")]
    TruncatedBinary {
        /// Minimum byte length implied by the header.
        expected: u64,
        /// Actual buffer length.
        actual: usize,
    },

    /// A facet does not hold exactly 3 vertices inside one `outer loop`.
    #[error("Malformed facet at line {line}: {reason}")]
    MalformedFacet {
        /// Line where the problem was noticed (1-indexed).
        line: usize,
        /// What was wrong with the facet.
        reason: String,
    },

    /// A numeric field is not a finite 32-bit float.
    #[error("Malformed number '{token}' at {location}")]
    MalformedNumber {
        /// Offending token, or the raw bit pattern for binary input.
        token: String,
        /// Approximate position of the token.
        location: Location,
    },

    /// A keyword is missing or out of sequence.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar required at this point.
        expected: String,
        /// What was actually there.
        found: String,
        /// Line number (1-indexed).
        line: usize,
    },
}

impl StlError {
    /// Create a malformed facet error.
    pub fn malformed_facet(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedFacet {
            line,
            reason: reason.into(),
        }
    }

    /// Create a malformed number error.
    pub fn malformed_number(token: impl Into<String>, location: Location) -> Self {
        Self::MalformedNumber {
            token: token.into(),
            location,
        }
    }

    /// Create an unexpected token error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StlError::TruncatedBinary {
            expected: 134,
            actual: 133,
        };
        assert_eq!(
            err.to_string(),
            "Truncated binary STL: expected at least 134 bytes, got 133"
        );

        let err = StlError::malformed_number("1.0x", Location::Line(4));
        assert_eq!(err.to_string(), "Malformed number '1.0x' at line 4");

        let err = StlError::malformed_number("0x7fc00000", Location::Offset(96));
        assert!(err.to_string().contains("byte offset 96"));
    }

    #[test]
    fn test_unexpected_token_message() {
        let err = StlError::unexpected("'endloop'", "'vertex'", 7);
        assert_eq!(
            err.to_string(),
            "Unexpected token at line 7: expected 'endloop', found 'vertex'"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<StlError>();
    }
}
