//! Data source error types

use std::time::Duration;

/// Errors returned by a [`DataSource`](crate::source::DataSource).
///
/// Every variant renders to a human-readable message suitable for an alert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The remote side rejected the request.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// Status code reported by the remote side.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed for any other reason.
    #[error("{0}")]
    Failed(String),
}

impl FetchError {
    /// Creates a generic failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Creates a rejection with a status code and message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
