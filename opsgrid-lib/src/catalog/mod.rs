//! Column catalog
//!
//! Static description of every column a table type can show. One catalog is
//! defined per table type and shared by every engine instance of that type.

mod column;
mod role;

pub use column::*;
pub use role::*;

use std::collections::HashSet;

/// Engine-wide minimum column width in pixels.
pub const MIN_COLUMN_WIDTH: u32 = 50;

/// Columns sharing a category, in catalog order.
#[derive(Debug, Clone)]
pub struct ColumnGroup<'a> {
    /// Category label, `None` for uncategorised columns.
    pub category: Option<&'a str>,
    /// Columns in this group.
    pub columns: Vec<&'a ColumnDescriptor>,
}

/// Ordered set of column descriptors for one table type.
///
/// Keys are unique; a duplicate key is dropped with a warning and the first
/// descriptor wins.
///
/// # Example
///
/// ```
/// use opsgrid_lib::catalog::{ColumnCatalog, ColumnDescriptor};
///
/// let catalog = ColumnCatalog::new(vec![
///     ColumnDescriptor::new("date", "Date", 110),
///     ColumnDescriptor::new("amount", "Amount", 120).category("Sales"),
///     ColumnDescriptor::new("cost", "Cost", 120).restricted_to(["admin"]),
/// ]);
///
/// assert!(catalog.contains("amount"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnCatalog {
    /// Creates a catalog from descriptors, keeping catalog order.
    pub fn new(columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for column in columns {
            if !seen.insert(column.key.clone()) {
                log::warn!("duplicate column key '{}' in catalog, ignoring", column.key);
                continue;
            }
            kept.push(column);
        }
        Self { columns: kept }
    }

    /// Returns the descriptor for a key.
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns `true` if the key exists in the catalog.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Number of columns in the catalog.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the catalog has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `true` if the key exists and the actor may see it.
    pub fn is_permitted(&self, key: &str, role: &dyn RoleCheck) -> bool {
        self.contains(key) && role.is_allowed(key)
    }

    /// Returns `true` if the key exists, is sortable and is permitted.
    pub fn is_sortable(&self, key: &str, role: &dyn RoleCheck) -> bool {
        self.get(key).is_some_and(|c| c.sortable) && role.is_allowed(key)
    }

    /// Default width for a key, or the engine floor for unknown keys.
    pub fn default_width(&self, key: &str) -> u32 {
        self.get(key)
            .map(|c| c.default_width)
            .unwrap_or(MIN_COLUMN_WIDTH)
    }

    /// Keys visible by default for the given actor, in catalog order.
    pub fn default_visible_keys(&self, role: &dyn RoleCheck) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible && role.is_allowed(&c.key))
            .map(|c| c.key.clone())
            .collect()
    }

    /// The single column to show when a layout would otherwise be empty.
    ///
    /// Prefers the first default-visible permitted column, then the first
    /// permitted column of any kind.
    pub fn fallback_key(&self, role: &dyn RoleCheck) -> Option<String> {
        self.columns
            .iter()
            .find(|c| c.default_visible && role.is_allowed(&c.key))
            .or_else(|| self.columns.iter().find(|c| role.is_allowed(&c.key)))
            .map(|c| c.key.clone())
    }

    /// Permitted columns grouped by category, groups in order of first use.
    pub fn groups(&self, role: &dyn RoleCheck) -> Vec<ColumnGroup<'_>> {
        let mut groups: Vec<ColumnGroup<'_>> = Vec::new();
        for column in self.columns.iter().filter(|c| role.is_allowed(&c.key)) {
            let category = column.category.as_deref();
            match groups.iter_mut().find(|g| g.category == category) {
                Some(group) => group.columns.push(column),
                None => groups.push(ColumnGroup {
                    category,
                    columns: vec![column],
                }),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(vec![
            ColumnDescriptor::new("date", "Date", 110).category("Order"),
            ColumnDescriptor::new("sku", "SKU", 20).category("Order"),
            ColumnDescriptor::new("amount", "Amount", 120).category("Sales"),
            ColumnDescriptor::new("cost", "Cost", 120)
                .category("Sales")
                .restricted_to(["admin"]),
            ColumnDescriptor::new("note", "Note", 200).hidden(),
            ColumnDescriptor::new("date", "Duplicate", 90),
        ])
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get("date").map(|c| c.display_name.as_str()), Some("Date"));
    }

    #[test]
    fn test_default_width_has_floor() {
        let catalog = catalog();
        assert_eq!(catalog.default_width("sku"), MIN_COLUMN_WIDTH);
        assert_eq!(catalog.default_width("missing"), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_default_visible_respects_roles() {
        let catalog = catalog();
        let viewer = ActorRoles::new(&catalog, ["viewer"]);
        let admin = ActorRoles::new(&catalog, ["admin"]);
        assert_eq!(
            catalog.default_visible_keys(&viewer),
            vec!["date", "sku", "amount"]
        );
        assert_eq!(
            catalog.default_visible_keys(&admin),
            vec!["date", "sku", "amount", "cost"]
        );
    }

    #[test]
    fn test_fallback_skips_to_permitted_column() {
        let catalog = ColumnCatalog::new(vec![
            ColumnDescriptor::new("cost", "Cost", 100).restricted_to(["admin"]),
            ColumnDescriptor::new("note", "Note", 100).hidden(),
        ]);
        let viewer = ActorRoles::new(&catalog, ["viewer"]);
        assert_eq!(catalog.fallback_key(&viewer).as_deref(), Some("note"));
    }

    #[test]
    fn test_groups_follow_catalog_order() {
        let catalog = catalog();
        let viewer = ActorRoles::new(&catalog, ["viewer"]);
        let groups = catalog.groups(&viewer);
        let labels: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(labels, vec![Some("Order"), Some("Sales"), None]);
        assert_eq!(groups[1].columns.len(), 1);
    }
}
