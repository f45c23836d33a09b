//! Persistence error types

/// Errors raised by a [`PersistenceAdapter`](crate::persist::PersistenceAdapter).
///
/// The engine never surfaces these to the user: they are logged at the
/// adapter boundary and the layout keeps working for the session.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Database error from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// The store refused the write (e.g. quota exceeded).
    #[error("storage quota exceeded for key {key}")]
    QuotaExceeded {
        /// Key that was being written.
        key: String,
    },

    /// The store is not reachable at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A blob could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
