//! Restore/persist cycle for layout state.
//!
//! Each part of the layout lives under its own key with the schema version
//! in the key name, so bumping one schema never invalidates the others.
//! Anything unreadable is treated exactly like nothing stored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PersistenceAdapter;
use crate::catalog::ColumnCatalog;
use crate::catalog::RoleCheck;
use crate::error::PersistError;
use crate::layout::LayoutState;
use crate::layout::permitted_unique;
use crate::sort::SortSpec;

const COLUMNS_SCHEMA: u32 = 1;
const WIDTHS_SCHEMA: u32 = 1;
const SORT_SCHEMA: u32 = 1;

/// A separately stored part of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutSection {
    /// Visible column keys and their order.
    Columns,
    /// Width overrides.
    Widths,
    /// Active sort.
    Sort,
}

impl LayoutSection {
    /// Every section, in write order.
    pub const ALL: [LayoutSection; 3] = [
        LayoutSection::Columns,
        LayoutSection::Widths,
        LayoutSection::Sort,
    ];
}

/// Storage keys for one table type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key for the visible column list.
    pub columns: String,
    /// Key for the width map.
    pub widths: String,
    /// Key for the active sort.
    pub sort: String,
}

impl StorageKeys {
    /// Derives the keys for a namespace such as `"orders"`.
    pub fn new(namespace: &str) -> Self {
        Self {
            columns: format!("{}.columns.v{}", namespace, COLUMNS_SCHEMA),
            widths: format!("{}.widths.v{}", namespace, WIDTHS_SCHEMA),
            sort: format!("{}.sort.v{}", namespace, SORT_SCHEMA),
        }
    }

    /// Key for one section.
    pub fn for_section(&self, section: LayoutSection) -> &str {
        match section {
            LayoutSection::Columns => &self.columns,
            LayoutSection::Widths => &self.widths,
            LayoutSection::Sort => &self.sort,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SortBlob {
    key: String,
    direction: crate::sort::SortDirection,
}

/// Reads and parses one blob. Missing, failing and malformed all map to `None`.
async fn read_blob<T: DeserializeOwned>(adapter: &dyn PersistenceAdapter, key: &str) -> Option<T> {
    let raw = match adapter.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("failed to read layout key {}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding malformed layout key {}: {}", key, e);
            None
        }
    }
}

/// Builds the layout for an actor: catalog defaults overlaid with whatever
/// valid state the adapter holds.
///
/// Never fails. Unknown or restricted keys are dropped; a stored column
/// list that filters down to nothing falls back to the defaults.
pub async fn restore(
    catalog: &ColumnCatalog,
    role: &dyn RoleCheck,
    adapter: &dyn PersistenceAdapter,
    keys: &StorageKeys,
) -> LayoutState {
    let mut state = LayoutState::from_catalog(catalog, role);

    if let Some(stored) = read_blob::<Vec<String>>(adapter, &keys.columns).await {
        let columns = permitted_unique(&stored, catalog, role);
        if columns.len() < stored.len() {
            log::debug!(
                "dropped {} stored column key(s) for {}",
                stored.len() - columns.len(),
                keys.columns
            );
        }
        if !columns.is_empty() {
            state.set_visible(columns, catalog, role);
        }
    }

    if let Some(stored) = read_blob::<BTreeMap<String, serde_json::Value>>(adapter, &keys.widths).await {
        for (key, width) in stored {
            if !catalog.contains(&key) {
                log::debug!("dropped stored width for unknown column {}", key);
                continue;
            }
            match width.as_f64() {
                Some(px) if px.is_finite() => {
                    state.set_width(key, px.round().clamp(0.0, u32::MAX as f64) as u32);
                }
                _ => log::debug!("dropped non-numeric width for {}", key),
            }
        }
    }

    if let Some(Some(stored)) = read_blob::<Option<SortBlob>>(adapter, &keys.sort).await {
        if catalog.is_sortable(&stored.key, role) {
            state.set_sort(Some(SortSpec {
                key: stored.key,
                direction: stored.direction,
            }));
        } else {
            log::debug!("dropped stored sort on {}", stored.key);
        }
    }

    state
}

/// Serializes one section of the layout.
pub fn encode_section(state: &LayoutState, section: LayoutSection) -> Result<String, PersistError> {
    let encoded = match section {
        LayoutSection::Columns => serde_json::to_string(state.visible_columns()),
        LayoutSection::Widths => {
            let widths: BTreeMap<_, _> = state.column_widths().iter().collect();
            serde_json::to_string(&widths)
        }
        LayoutSection::Sort => match state.sort() {
            Some(sort) => serde_json::to_string(&SortBlob {
                key: sort.key.clone(),
                direction: sort.direction,
            }),
            None => Ok("null".to_string()),
        },
    };
    encoded.map_err(PersistError::from)
}

/// Writes the given sections through the adapter.
///
/// Failures are logged and swallowed; returns the number of sections that
/// were written successfully.
pub async fn persist_sections(
    state: &LayoutState,
    adapter: &dyn PersistenceAdapter,
    keys: &StorageKeys,
    sections: &[LayoutSection],
) -> usize {
    let mut written = 0;
    for &section in sections {
        let key = keys.for_section(section);
        let blob = match encode_section(state, section) {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!("failed to encode layout key {}: {}", key, e);
                continue;
            }
        };
        match adapter.set(key, blob).await {
            Ok(()) => written += 1,
            Err(e) => log::warn!("failed to persist layout key {}: {}", key, e),
        }
    }
    written
}

/// Writes the full layout through the adapter.
pub async fn persist(state: &LayoutState, adapter: &dyn PersistenceAdapter, keys: &StorageKeys) -> usize {
    persist_sections(state, adapter, keys, &LayoutSection::ALL).await
}

/// Removes every stored section.
pub async fn clear(adapter: &dyn PersistenceAdapter, keys: &StorageKeys) {
    for section in LayoutSection::ALL {
        let key = keys.for_section(section);
        if let Err(e) = adapter.remove(key).await {
            log::warn!("failed to clear layout key {}: {}", key, e);
        }
    }
}
