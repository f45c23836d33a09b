//! Layout persistence
//!
//! Provides the `PersistenceAdapter` trait, key/value stores implementing
//! it, and the restore/persist cycle that maps a [`LayoutState`] onto
//! independently versioned keys.

mod blob;
mod memory;
mod sqlite;

pub use blob::*;
pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::PersistError;

/// Durable key/value store that survives reloads.
///
/// Values are opaque strings. Implementations report failures; callers in
/// this crate log and otherwise ignore them.
///
/// # Example
///
/// ```ignore
/// use opsgrid_lib::persist::{MemoryStore, PersistenceAdapter};
///
/// let store = MemoryStore::new();
/// store.set("orders.columns.v1", "[\"date\"]".to_string()).await?;
/// assert!(store.get("orders.columns.v1").await?.is_some());
/// ```
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Reads the value for a key.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Writes the value for a key.
    async fn set(&self, key: &str, value: String) -> Result<(), PersistError>;

    /// Removes a key.
    async fn remove(&self, key: &str) -> Result<(), PersistError>;
}
