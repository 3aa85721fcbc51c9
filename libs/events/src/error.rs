//! Error surface of envelope construction.

use relay_resource::ResourceError;
use thiserror::Error;

/// Errors produced while constructing an envelope.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    /// A mandatory value is missing or unusable.
    #[error("undefined value: {0}")]
    UndefinedValue(String),

    /// The assembled draft does not match the required shape. Raised by
    /// resource finalization and propagated unchanged.
    #[error(transparent)]
    Structural(#[from] ResourceError),
}

impl EventError {
    pub(crate) fn undefined_name() -> Self {
        EventError::UndefinedValue("the event name is mandatory".to_string())
    }
}
