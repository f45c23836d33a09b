//! Column descriptor

use super::MIN_COLUMN_WIDTH;
use super::RoleRestriction;

/// Immutable description of one column.
///
/// Columns are visible by default and sortable unless marked otherwise.
///
/// # Examples
///
/// ```
/// use opsgrid_lib::catalog::ColumnDescriptor;
///
/// let cost = ColumnDescriptor::new("cost", "Unit cost", 120)
///     .category("Finance")
///     .restricted_to(["admin"]);
/// let note = ColumnDescriptor::new("note", "Note", 240).hidden().unsortable();
///
/// assert!(cost.sortable);
/// assert!(!note.default_visible);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Unique column key.
    pub key: String,
    /// Header text.
    pub display_name: String,
    /// Default width in pixels, never below [`MIN_COLUMN_WIDTH`].
    pub default_width: u32,
    /// Whether the column is shown when nothing is stored.
    pub default_visible: bool,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Grouping label for column choosers.
    pub category: Option<String>,
    /// Roles allowed to see this column; `None` means everyone.
    pub restriction: Option<RoleRestriction>,
}

impl ColumnDescriptor {
    /// Create a new column with an explicit default width.
    ///
    /// Widths below the engine floor are raised to it.
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, default_width: u32) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            default_width: default_width.max(MIN_COLUMN_WIDTH),
            default_visible: true,
            sortable: true,
            category: None,
            restriction: None,
        }
    }

    /// Hide the column unless the user turns it on.
    pub fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    /// Disable sorting on this column.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Set the grouping category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict the column to actors holding any of the given roles.
    pub fn restricted_to<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restriction = Some(RoleRestriction::any_of(roles));
        self
    }
}
