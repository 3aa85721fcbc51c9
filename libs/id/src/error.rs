//! Error type for id parsing.

use thiserror::Error;

/// Errors produced when parsing a canonical id string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input was empty.
    #[error("id cannot be empty")]
    Empty,

    /// The input has no `-` between prefix and payload.
    #[error("id missing '-' separator")]
    NoSeparator,

    /// The prefix names a different resource kind.
    #[error("wrong id prefix: expected '{expected}', found '{found}'")]
    WrongPrefix {
        expected: &'static str,
        found: String,
    },

    /// The payload is not a valid ULID.
    #[error("malformed ulid: {0}")]
    MalformedUlid(String),
}
