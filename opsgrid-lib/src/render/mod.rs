//! Table rendering model
//!
//! Turns a [`LayoutState`] and a page of rows into header and body cells
//! with resolved widths. Rendering targets draw a [`RenderedTable`]; they
//! never consult the layout directly, so header and body cannot disagree on
//! column order or width.

use std::sync::Arc;

use crate::catalog::ColumnCatalog;
use crate::catalog::RoleCheck;
use crate::format::Formatters;
use crate::layout::LayoutState;
use crate::model::Row;
use crate::sort::SortIndicator;

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: u32,
    pub indicator: SortIndicator,
}

impl HeaderCell {
    /// Returns `true` if clicking the header toggles sort.
    pub fn is_clickable(&self) -> bool {
        self.indicator.is_clickable()
    }
}

/// One body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyCell {
    pub key: String,
    pub text: String,
    pub width: u32,
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<BodyCell>,
}

/// Header plus body, column-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTable {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
    /// Index of a column in the rendered header.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.header.iter().position(|cell| cell.key == key)
    }

    /// Sets the width of an already rendered column, header and body alike.
    ///
    /// Returns `false` if the column is not rendered.
    pub fn apply_column_width(&mut self, key: &str, width: u32) -> bool {
        let Some(index) = self.column_index(key) else {
            return false;
        };
        self.header[index].width = width;
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(index) {
                cell.width = width;
            }
        }
        true
    }

    /// Left edge of a header cell, in pixels from the table's left edge.
    pub fn header_offset(&self, index: usize) -> u32 {
        self.header.iter().take(index).map(|cell| cell.width).sum()
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> u32 {
        self.header.iter().map(|cell| cell.width).sum()
    }

    /// Header column under a horizontal position, with the offset into it.
    pub fn column_at(&self, x: u32) -> Option<(usize, u32)> {
        let mut left = 0;
        for (index, cell) in self.header.iter().enumerate() {
            if x < left + cell.width {
                return Some((index, x - left));
            }
            left += cell.width;
        }
        None
    }

    /// Returns `true` if every body row matches the header cell for cell.
    pub fn is_aligned(&self) -> bool {
        self.rows.iter().all(|row| {
            row.cells.len() == self.header.len()
                && row
                    .cells
                    .iter()
                    .zip(&self.header)
                    .all(|(cell, head)| cell.key == head.key && cell.width == head.width)
        })
    }

    /// Returns `true` if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

/// Produces [`RenderedTable`]s for one catalog.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    catalog: Arc<ColumnCatalog>,
    formatters: Formatters,
}

impl TableRenderer {
    pub fn new(catalog: Arc<ColumnCatalog>, formatters: Formatters) -> Self {
        Self { catalog, formatters }
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn formatters(&self) -> &Formatters {
        &self.formatters
    }

    /// Renders the visible columns of a layout for a page of rows.
    ///
    /// Columns the role check rejects are skipped even if the layout still
    /// lists them.
    pub fn render(&self, layout: &LayoutState, rows: &[Row], role: &dyn RoleCheck) -> RenderedTable {
        let columns: Vec<_> = layout
            .visible_columns()
            .iter()
            .filter_map(|key| match self.catalog.get(key) {
                Some(column) if role.is_allowed(key) => Some(column),
                Some(_) => {
                    log::debug!("skipping restricted column '{}' at render", key);
                    None
                }
                None => None,
            })
            .collect();

        let header = columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.display_name.clone(),
                width: layout.width_of(&column.key, &self.catalog),
                indicator: SortIndicator::for_column(column, layout.sort()),
            })
            .collect::<Vec<_>>();

        let rows = rows
            .iter()
            .map(|row| RenderedRow {
                id: row.id().to_string(),
                cells: header
                    .iter()
                    .map(|head| BodyCell {
                        key: head.key.clone(),
                        text: self.formatters.display(&head.key, row),
                        width: head.width,
                    })
                    .collect(),
            })
            .collect();

        RenderedTable { header, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AllowAll, ColumnDescriptor};
    use crate::format;
    use crate::sort::{SortDirection, SortSpec};

    fn renderer() -> TableRenderer {
        let catalog = ColumnCatalog::new(vec![
            ColumnDescriptor::new("date", "Date", 110),
            ColumnDescriptor::new("amount", "Amount", 120),
            ColumnDescriptor::new("note", "Note", 200).unsortable(),
            ColumnDescriptor::new("cost", "Cost", 90).restricted_to(["admin"]),
        ]);
        let formatters = Formatters::new().with("amount", format::currency("$"));
        TableRenderer::new(Arc::new(catalog), formatters)
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new("1").set("date", "2024-01-02").set("amount", 12.5f64),
            Row::new("2").set("amount", 3i64).set("note", "rush"),
        ]
    }

    #[test]
    fn test_render_header_and_body() {
        let renderer = renderer();
        let mut layout = LayoutState::from_catalog(renderer.catalog(), &AllowAll);
        layout.set_sort(Some(SortSpec::desc("amount")));

        let table = renderer.render(&layout, &rows(), &AllowAll);

        let keys: Vec<_> = table.header.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["date", "amount", "note", "cost"]);
        assert_eq!(table.header[1].indicator, SortIndicator::Active(SortDirection::Descending));
        assert_eq!(table.header[0].indicator, SortIndicator::Inactive);
        assert!(!table.header[2].is_clickable());

        assert_eq!(table.rows[0].cells[1].text, "$12.50");
        assert_eq!(table.rows[1].cells[0].text, "-");
        assert_eq!(table.rows[1].cells[2].text, "rush");
        assert!(table.is_aligned());
    }

    #[test]
    fn test_render_skips_rejected_columns() {
        let renderer = renderer();
        let layout = LayoutState::from_catalog(renderer.catalog(), &AllowAll);
        let deny_cost = |key: &str| key != "cost";

        let table = renderer.render(&layout, &rows(), &deny_cost);

        assert_eq!(table.column_index("cost"), None);
        assert!(table.rows.iter().all(|r| r.cells.len() == 3));
        assert!(table.is_aligned());
    }

    #[test]
    fn test_apply_column_width_and_hit_test() {
        let renderer = renderer();
        let layout = LayoutState::from_catalog(renderer.catalog(), &AllowAll);
        let mut table = renderer.render(&layout, &rows(), &AllowAll);

        assert!(table.apply_column_width("amount", 150));
        assert!(!table.apply_column_width("missing", 150));
        assert!(table.rows.iter().all(|r| r.cells[1].width == 150));
        assert!(table.is_aligned());

        assert_eq!(table.header_offset(2), 260);
        assert_eq!(table.column_at(0), Some((0, 0)));
        assert_eq!(table.column_at(115), Some((1, 5)));
        assert_eq!(table.column_at(table.total_width()), None);
    }
}
