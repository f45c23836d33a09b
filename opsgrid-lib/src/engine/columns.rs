//! Column chooser operations and programmatic layout changes.

use crate::catalog::ColumnCatalog;
use crate::catalog::RoleCheck;
use crate::layout::LayoutState;
use crate::persist::LayoutSection;
use crate::persist::clear;
use crate::sort::next_sort;

use super::TableEngine;

/// One entry of the column chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoice {
    pub key: String,
    pub display_name: String,
    pub category: Option<String>,
    pub visible: bool,
}

impl TableEngine {
    /// Every column the actor may see, grouped by category, with its
    /// visibility.
    pub fn column_choices(&self) -> Vec<ColumnChoice> {
        self.read(|inner| {
            self.services
                .catalog
                .groups(&*inner.role)
                .into_iter()
                .flat_map(|group| group.columns)
                .map(|column| ColumnChoice {
                    key: column.key.clone(),
                    display_name: column.display_name.clone(),
                    category: column.category.clone(),
                    visible: inner.layout.is_visible(&column.key),
                })
                .collect()
        })
    }

    /// Applies a layout mutation; on change re-lays-out and persists the
    /// column order.
    async fn change_columns<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut LayoutState, &ColumnCatalog, &dyn RoleCheck) -> bool,
    {
        let changed = self.update(|inner, services| {
            let changed = f(&mut inner.layout, &*services.catalog, &*inner.role);
            if changed {
                inner.rerender(services);
            }
            changed
        });
        if changed {
            self.flush(&[LayoutSection::Columns]).await;
        }
        changed
    }

    /// Moves a visible column before or after another visible column.
    ///
    /// A no-op if either key is not visible or both are the same.
    pub async fn move_column(&self, dragged: &str, target: &str, insert_after: bool) -> bool {
        self.change_columns(|layout, _, _| layout.move_column(dragged, target, insert_after))
            .await
    }

    /// Appends a permitted column to the right edge.
    pub async fn show_column(&self, key: &str) -> bool {
        self.change_columns(|layout, catalog, role| layout.show(key, catalog, role))
            .await
    }

    /// Hides a column. Hiding the last one leaves a single fallback column.
    pub async fn hide_column(&self, key: &str) -> bool {
        self.change_columns(|layout, catalog, role| {
            let before = layout.visible_columns().to_vec();
            layout.hide(key, catalog, role) && layout.visible_columns() != before.as_slice()
        })
        .await
    }

    /// Shows a hidden column or hides a visible one.
    pub async fn toggle_column(&self, key: &str) -> bool {
        if self.read(|inner| inner.layout.is_visible(key)) {
            self.hide_column(key).await
        } else {
            self.show_column(key).await
        }
    }

    /// Replaces the visible set and order in one go.
    ///
    /// Unknown, restricted and duplicate keys are dropped.
    pub async fn set_visible_columns<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.change_columns(|layout, catalog, role| {
            let before = layout.visible_columns().to_vec();
            layout.set_visible(keys, catalog, role);
            layout.visible_columns() != before.as_slice()
        })
        .await
    }

    /// Hides every column; exactly one fallback column remains.
    pub async fn hide_all(&self) -> bool {
        self.set_visible_columns(std::iter::empty::<&str>()).await
    }

    /// Toggles sort on a sortable column.
    ///
    /// A new column starts descending, the active column flips direction.
    /// Resets to page 1, persists the sort and re-fetches. If that fetch
    /// fails the previous sort comes back along with the previous rows.
    /// Returns `false` (and does nothing) for unknown, unsortable or
    /// restricted columns.
    pub async fn toggle_sort(&self, key: &str) -> bool {
        let toggled = self.update(|inner, services| {
            if !services.catalog.is_sortable(key, &*inner.role) {
                log::debug!("sort toggle on {} ignored", key);
                return false;
            }
            let next = next_sort(inner.layout.sort(), key);
            log::debug!("sort {} {:?}", next.key, next.direction);
            inner.layout.set_sort(Some(next));
            inner.current_page = 1;
            inner.rerender(services);
            true
        });
        if !toggled {
            return false;
        }

        self.flush(&[LayoutSection::Sort]).await;
        self.refresh().await;
        true
    }

    /// Restores catalog defaults and forgets the stored layout.
    ///
    /// Re-fetches from page 1 if a sort was active.
    pub async fn reset_layout(&self) {
        let had_sort = self.update(|inner, services| {
            let had_sort = inner.layout.sort().is_some();
            inner.layout = LayoutState::from_catalog(&services.catalog, &*inner.role);
            inner.rerender(services);
            if had_sort {
                inner.current_page = 1;
            }
            had_sort
        });
        log::debug!("layout reset to catalog defaults");

        clear(&*self.services.store, &self.services.keys).await;
        if had_sort {
            self.refresh().await;
        }
    }
}
