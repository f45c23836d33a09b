//! Layout state: visible column order, widths and active sort.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::catalog::ColumnCatalog;
use crate::catalog::MIN_COLUMN_WIDTH;
use crate::catalog::RoleCheck;
use crate::reorder;
use crate::sort::SortDirection;
use crate::sort::SortSpec;

/// Mutable presentation state of one table.
///
/// Invariants maintained by every mutating method:
/// - `visible_columns` holds unique keys that exist in the catalog and pass
///   the role check, and is never empty while the catalog has a permitted
///   column.
/// - every stored width is at least [`MIN_COLUMN_WIDTH`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutState {
    visible_columns: Vec<String>,
    column_widths: HashMap<String, u32>,
    sort: Option<SortSpec>,
}

impl LayoutState {
    /// Builds the default layout for an actor from catalog defaults.
    pub fn from_catalog(catalog: &ColumnCatalog, role: &dyn RoleCheck) -> Self {
        let mut state = Self {
            visible_columns: catalog.default_visible_keys(role),
            column_widths: HashMap::new(),
            sort: None,
        };
        state.ensure_not_empty(catalog, role);
        state
    }

    /// Visible column keys, left to right.
    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    /// Explicit width overrides by key.
    pub fn column_widths(&self) -> &HashMap<String, u32> {
        &self.column_widths
    }

    /// The active sort, if any column has been sorted.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The active sort key.
    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_ref().map(|s| s.key.as_str())
    }

    /// The active sort direction.
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.as_ref().map(|s| s.direction)
    }

    /// Returns `true` if the key is currently visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible_columns.iter().any(|k| k == key)
    }

    /// Position of a visible key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.visible_columns.iter().position(|k| k == key)
    }

    /// Effective width for a key: override, catalog default, or the floor.
    pub fn width_of(&self, key: &str, catalog: &ColumnCatalog) -> u32 {
        self.column_widths
            .get(key)
            .copied()
            .unwrap_or_else(|| catalog.default_width(key))
            .max(MIN_COLUMN_WIDTH)
    }

    /// Stores a width override, clamped to the floor. Returns the stored width.
    pub fn set_width(&mut self, key: impl Into<String>, width: u32) -> u32 {
        let width = width.max(MIN_COLUMN_WIDTH);
        self.column_widths.insert(key.into(), width);
        width
    }

    /// Puts back a width override taken earlier, or drops the override if
    /// there was none.
    pub fn restore_width(&mut self, key: &str, previous: Option<u32>) {
        match previous {
            Some(width) => {
                self.set_width(key, width);
            }
            None => {
                self.column_widths.remove(key);
            }
        }
    }

    /// Replaces the active sort.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Moves a visible column next to another one. See [`reorder::move_column`].
    pub fn move_column(&mut self, dragged: &str, target: &str, insert_after: bool) -> bool {
        reorder::move_column(&mut self.visible_columns, dragged, target, insert_after)
    }

    /// Appends a permitted column to the right edge.
    ///
    /// Returns `false` if the key is unknown, restricted or already visible.
    pub fn show(&mut self, key: &str, catalog: &ColumnCatalog, role: &dyn RoleCheck) -> bool {
        if self.is_visible(key) || !catalog.is_permitted(key, role) {
            return false;
        }
        self.visible_columns.push(key.to_string());
        true
    }

    /// Removes a column, falling back to a single default column if the
    /// table would otherwise be empty.
    pub fn hide(&mut self, key: &str, catalog: &ColumnCatalog, role: &dyn RoleCheck) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };
        self.visible_columns.remove(index);
        self.ensure_not_empty(catalog, role);
        true
    }

    /// Replaces the visible set and order.
    ///
    /// Unknown, restricted and duplicate keys are dropped. An empty result
    /// falls back to a single default column.
    pub fn set_visible(
        &mut self,
        keys: impl IntoIterator<Item = impl AsRef<str>>,
        catalog: &ColumnCatalog,
        role: &dyn RoleCheck,
    ) {
        self.visible_columns = permitted_unique(keys, catalog, role);
        self.ensure_not_empty(catalog, role);
    }

    /// Re-validates the whole state against the catalog and actor.
    ///
    /// Returns `true` if anything had to change.
    pub fn sanitize(&mut self, catalog: &ColumnCatalog, role: &dyn RoleCheck) -> bool {
        let before = self.clone();

        self.visible_columns = permitted_unique(&self.visible_columns, catalog, role);
        self.ensure_not_empty(catalog, role);

        self.column_widths.retain(|key, _| catalog.contains(key));
        for width in self.column_widths.values_mut() {
            *width = (*width).max(MIN_COLUMN_WIDTH);
        }

        if self
            .sort
            .as_ref()
            .is_some_and(|s| !catalog.is_sortable(&s.key, role))
        {
            self.sort = None;
        }

        *self != before
    }

    /// Restores the single-column fallback if nothing is visible.
    pub(crate) fn ensure_not_empty(&mut self, catalog: &ColumnCatalog, role: &dyn RoleCheck) {
        if !self.visible_columns.is_empty() {
            return;
        }
        match catalog.fallback_key(role) {
            Some(key) => {
                log::debug!("layout would be empty, falling back to '{}'", key);
                self.visible_columns.push(key);
            }
            None => log::warn!("no permitted column in catalog, table has no columns"),
        }
    }
}

/// Filters keys to unique, known, permitted entries preserving order.
pub(crate) fn permitted_unique(
    keys: impl IntoIterator<Item = impl AsRef<str>>,
    catalog: &ColumnCatalog,
    role: &dyn RoleCheck,
) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            (catalog.is_permitted(key, role) && seen.insert(key.to_string()))
                .then(|| key.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ActorRoles, AllowAll, ColumnDescriptor};

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(vec![
            ColumnDescriptor::new("date", "Date", 110),
            ColumnDescriptor::new("amount", "Amount", 120),
            ColumnDescriptor::new("cost", "Cost", 120).restricted_to(["admin"]),
            ColumnDescriptor::new("note", "Note", 200).hidden().unsortable(),
        ])
    }

    #[test]
    fn test_defaults_follow_catalog() {
        let catalog = catalog();
        let state = LayoutState::from_catalog(&catalog, &AllowAll);
        assert_eq!(state.visible_columns(), ["date", "amount", "cost"]);
        assert_eq!(state.width_of("note", &catalog), 200);
        assert!(state.sort().is_none());
    }

    #[test]
    fn test_hide_all_keeps_one_column() {
        let catalog = catalog();
        let mut state = LayoutState::from_catalog(&catalog, &AllowAll);
        for key in ["date", "amount", "cost"] {
            assert!(state.hide(key, &catalog, &AllowAll));
        }
        assert_eq!(state.visible_columns(), ["date"]);
    }

    #[test]
    fn test_show_rejects_restricted() {
        let catalog = catalog();
        let viewer = ActorRoles::new(&catalog, ["viewer"]);
        let mut state = LayoutState::from_catalog(&catalog, &viewer);
        assert!(!state.show("cost", &catalog, &viewer));
        assert!(!state.show("unknown", &catalog, &viewer));
        assert!(state.show("note", &catalog, &viewer));
        assert_eq!(state.visible_columns(), ["date", "amount", "note"]);
    }

    #[test]
    fn test_set_width_clamps() {
        let mut state = LayoutState::default();
        assert_eq!(state.set_width("date", 10), MIN_COLUMN_WIDTH);
        assert_eq!(state.column_widths().get("date"), Some(&MIN_COLUMN_WIDTH));
    }

    #[test]
    fn test_sanitize_after_role_change() {
        let catalog = catalog();
        let mut state = LayoutState::from_catalog(&catalog, &AllowAll);
        state.set_sort(Some(SortSpec::desc("cost")));
        state.set_width("cost", 300);

        let viewer = ActorRoles::new(&catalog, ["viewer"]);
        assert!(state.sanitize(&catalog, &viewer));
        assert_eq!(state.visible_columns(), ["date", "amount"]);
        assert!(state.sort().is_none());
        // Widths for restricted keys survive; they only matter once visible.
        assert_eq!(state.column_widths().get("cost"), Some(&300));
        assert!(!state.sanitize(&catalog, &viewer));
    }

    #[test]
    fn test_set_visible_drops_duplicates() {
        let catalog = catalog();
        let mut state = LayoutState::from_catalog(&catalog, &AllowAll);
        state.set_visible(["amount", "amount", "ghost", "date"], &catalog, &AllowAll);
        assert_eq!(state.visible_columns(), ["amount", "date"]);

        state.set_visible(Vec::<String>::new(), &catalog, &AllowAll);
        assert_eq!(state.visible_columns(), ["date"]);
    }
}
