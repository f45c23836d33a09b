//! Single-key sort state and the header toggle rule.

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::ColumnDescriptor;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Returns `true` for ascending order.
    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// The active sort: one column key and a direction.
///
/// # Example
///
/// ```
/// use opsgrid_lib::sort::{SortDirection, SortSpec};
///
/// let sort = SortSpec::desc("amount");
/// assert_eq!(sort.direction, SortDirection::Descending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key being sorted on.
    pub key: String,
    /// Direction of the sort.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a key.
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on a key.
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Computes the sort after a header click on `column_key`.
///
/// A click on a new column always starts descending so the largest values
/// come first. A click on the active column flips its direction; there is no
/// way back to "unsorted" by clicking.
pub fn next_sort(current: Option<&SortSpec>, column_key: &str) -> SortSpec {
    match current {
        Some(active) if active.key == column_key => SortSpec {
            key: active.key.clone(),
            direction: active.direction.flipped(),
        },
        _ => SortSpec::desc(column_key),
    }
}

/// Header decoration for a column given the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    /// The column is the active sort key.
    Active(SortDirection),
    /// Sortable but not currently sorted.
    Inactive,
    /// Not sortable; no glyph and no click target.
    Unsortable,
}

impl SortIndicator {
    /// Resolves the indicator for a column.
    pub fn for_column(column: &ColumnDescriptor, sort: Option<&SortSpec>) -> Self {
        if !column.sortable {
            return SortIndicator::Unsortable;
        }
        match sort {
            Some(active) if active.key == column.key => SortIndicator::Active(active.direction),
            _ => SortIndicator::Inactive,
        }
    }

    /// Glyph shown next to the header label.
    pub fn glyph(self) -> &'static str {
        match self {
            SortIndicator::Active(SortDirection::Ascending) => "▲",
            SortIndicator::Active(SortDirection::Descending) => "▼",
            SortIndicator::Inactive => "⇅",
            SortIndicator::Unsortable => "",
        }
    }

    /// Returns `true` if the header should respond to clicks.
    pub fn is_clickable(self) -> bool {
        !matches!(self, SortIndicator::Unsortable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_click_sorts_descending() {
        assert_eq!(next_sort(None, "amount"), SortSpec::desc("amount"));
    }

    #[test]
    fn test_repeated_clicks_alternate() {
        let mut sort = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            let next = next_sort(sort.as_ref(), "amount");
            seen.push(next.direction);
            sort = Some(next);
        }
        assert_eq!(
            seen,
            vec![
                SortDirection::Descending,
                SortDirection::Ascending,
                SortDirection::Descending,
                SortDirection::Ascending,
            ]
        );
    }

    #[test]
    fn test_switching_column_resets_to_descending() {
        let current = SortSpec::asc("date");
        assert_eq!(next_sort(Some(&current), "amount"), SortSpec::desc("amount"));
    }

    #[test]
    fn test_indicator_kinds() {
        let amount = ColumnDescriptor::new("amount", "Amount", 100);
        let note = ColumnDescriptor::new("note", "Note", 100).unsortable();
        let sort = SortSpec::asc("amount");

        assert_eq!(
            SortIndicator::for_column(&amount, Some(&sort)),
            SortIndicator::Active(SortDirection::Ascending)
        );
        assert_eq!(SortIndicator::for_column(&amount, None), SortIndicator::Inactive);
        assert_eq!(SortIndicator::for_column(&note, Some(&sort)), SortIndicator::Unsortable);
        assert!(!SortIndicator::Unsortable.is_clickable());
        assert_eq!(SortIndicator::Unsortable.glyph(), "");
    }
}
