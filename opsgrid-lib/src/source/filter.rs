//! Filter types for page queries.

use std::cmp::Ordering;

use crate::model::Row;
use crate::model::Value;

/// A filter condition on row fields.
///
/// Filters can be combined using [`Filter::And`] and [`Filter::Or`].
///
/// # Example
///
/// ```
/// use opsgrid_lib::source::Filter;
///
/// let filter = Filter::and([
///     Filter::eq("status", "paid"),
///     Filter::gt("amount", 100i64),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Equality.
    Eq(String, Value),
    /// Not equal.
    Ne(String, Value),
    /// Greater than.
    Gt(String, Value),
    /// Greater than or equal.
    Ge(String, Value),
    /// Less than.
    Lt(String, Value),
    /// Less than or equal.
    Le(String, Value),
    /// Case-insensitive substring match on the displayed value.
    Contains(String, String),
    /// Field is null or missing.
    IsNull(String),
    /// Field is present and not null.
    IsNotNull(String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    /// Creates a substring filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Creates an is-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    /// Combines filters with AND.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Combines filters with OR.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Evaluates the filter against a row.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(field, value) => values_equal(row.value(field), value),
            Filter::Ne(field, value) => !values_equal(row.value(field), value),
            Filter::Gt(field, value) => present_cmp(row, field, value) == Some(Ordering::Greater),
            Filter::Ge(field, value) => matches!(present_cmp(row, field, value), Some(o) if o != Ordering::Less),
            Filter::Lt(field, value) => present_cmp(row, field, value) == Some(Ordering::Less),
            Filter::Le(field, value) => matches!(present_cmp(row, field, value), Some(o) if o != Ordering::Greater),
            Filter::Contains(field, needle) => row
                .value(field)
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Filter::IsNull(field) => row.value(field).is_null(),
            Filter::IsNotNull(field) => !row.value(field).is_null(),
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
        }
    }
}

/// Compares a present field against a value; `None` when the field is null.
fn present_cmp(row: &Row, field: &str, value: &Value) -> Option<Ordering> {
    let current = row.value(field);
    (!current.is_null()).then(|| current.sort_cmp(value))
}

/// Equality that treats numbers of different representations as equal.
fn values_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    a.as_f64().is_some() && b.as_f64().is_some() && a.sort_cmp(b) == Ordering::Equal
}

/// The filters applied to a table, combined with AND.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter (builder pattern).
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a filter.
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Returns the filters.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns `true` if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns `true` if the row passes every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row() -> Row {
        Row::new("1")
            .set("status", "Paid")
            .set("amount", Decimal::new(12050, 2))
            .set("units", 3i64)
    }

    #[test]
    fn test_comparisons() {
        let row = row();
        assert!(Filter::eq("status", "Paid").matches(&row));
        assert!(Filter::ne("status", "Refunded").matches(&row));
        assert!(Filter::gt("amount", 100i64).matches(&row));
        assert!(Filter::le("units", 3i64).matches(&row));
        assert!(!Filter::lt("units", 3i64).matches(&row));
        assert!(Filter::eq("units", 3.0f64).matches(&row));
    }

    #[test]
    fn test_missing_fields() {
        let row = row();
        assert!(Filter::is_null("channel").matches(&row));
        assert!(!Filter::gt("channel", 1i64).matches(&row));
        assert!(Filter::is_not_null("status").matches(&row));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        assert!(Filter::contains("status", "pai").matches(&row()));
    }

    #[test]
    fn test_combinators() {
        let row = row();
        let set: FilterSet = [
            Filter::or([Filter::eq("status", "Refunded"), Filter::eq("status", "Paid")]),
            Filter::and([Filter::ge("units", 1i64), Filter::lt("units", 10i64)]),
        ]
        .into_iter()
        .collect();
        assert!(set.matches(&row));
        assert!(!set.clone().with(Filter::is_null("status")).matches(&row));
    }
}
