//! Terminal client errors

use std::io;

/// Errors that end the terminal client.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
