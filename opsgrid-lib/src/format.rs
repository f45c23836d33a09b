//! Cell formatters
//!
//! Maps a column key to a function turning the raw value (and its row) into
//! display text. Columns without a formatter fall back to the value's plain
//! text, with `-` standing in for null or missing values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;

use crate::model::Row;
use crate::model::Value;

/// Placeholder text for null or missing values.
pub const EMPTY_CELL: &str = "-";

/// A cell formatter.
pub type FormatFn = dyn Fn(&Value, &Row) -> String + Send + Sync;

/// Registry of formatters by column key.
///
/// # Example
///
/// ```
/// use opsgrid_lib::format::{self, Formatters};
/// use opsgrid_lib::model::Row;
///
/// let formatters = Formatters::new().with("amount", format::currency("$"));
/// let row = Row::new("1").set("amount", 1234.5f64);
///
/// assert_eq!(formatters.display("amount", &row), "$1,234.50");
/// assert_eq!(formatters.display("missing", &row), "-");
/// ```
#[derive(Clone, Default)]
pub struct Formatters {
    by_key: HashMap<String, Arc<FormatFn>>,
}

impl Formatters {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a formatter (builder pattern).
    pub fn with<F>(mut self, key: impl Into<String>, formatter: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.insert(key, formatter);
        self
    }

    /// Registers a formatter.
    pub fn insert<F>(&mut self, key: impl Into<String>, formatter: F)
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.by_key.insert(key.into(), Arc::new(formatter));
    }

    /// Returns `true` if a formatter is registered for the key.
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Display text for one cell.
    pub fn display(&self, key: &str, row: &Row) -> String {
        let value = row.value(key);
        match self.by_key.get(key) {
            Some(formatter) => formatter(value, row),
            None => plain(value),
        }
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.by_key.keys().collect();
        keys.sort();
        f.debug_struct("Formatters").field("keys", &keys).finish()
    }
}

/// Plain text for a value, `-` for null.
pub fn plain(value: &Value) -> String {
    if value.is_null() {
        EMPTY_CELL.to_string()
    } else {
        value.to_string()
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::from_f64(*f),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Inserts thousands separators into the integer part of a number.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Money with two decimals, thousands separators and a symbol prefix.
pub fn currency(symbol: &str) -> impl Fn(&Value, &Row) -> String + Send + Sync + 'static {
    let symbol = symbol.to_string();
    move |value, _row| match to_decimal(value) {
        Some(amount) => {
            let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let text = group_thousands(&format!("{:.2}", rounded.abs()));
            if rounded.is_sign_negative() && !rounded.is_zero() {
                format!("-{}{}", symbol, text)
            } else {
                format!("{}{}", symbol, text)
            }
        }
        None => plain(value),
    }
}

/// Whole numbers with thousands separators.
pub fn integer() -> impl Fn(&Value, &Row) -> String + Send + Sync + 'static {
    |value, _row| match to_decimal(value) {
        Some(n) => group_thousands(&n.round().to_string()),
        None => plain(value),
    }
}

/// Ratios (`0.125`) as percentages (`12.5%`) with fixed decimals.
pub fn percent(decimals: u32) -> impl Fn(&Value, &Row) -> String + Send + Sync + 'static {
    move |value, _row| match to_decimal(value) {
        Some(ratio) => {
            let pct = (ratio * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}%", decimals as usize, pct)
        }
        None => plain(value),
    }
}

/// Date-times rendered with a chrono format string.
pub fn date(pattern: &str) -> impl Fn(&Value, &Row) -> String + Send + Sync + 'static {
    let pattern = pattern.to_string();
    move |value, _row| match value {
        Value::DateTime(dt) => dt.format(&pattern).to_string(),
        other => plain(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cell<F: Fn(&Value, &Row) -> String>(f: F, value: impl Into<Value>) -> String {
        f(&value.into(), &Row::new("r"))
    }

    #[test]
    fn test_plain_fallback() {
        let formatters = Formatters::new();
        let row = Row::new("1").set("sku", "A-1").set("note", Value::Null);
        assert_eq!(formatters.display("sku", &row), "A-1");
        assert_eq!(formatters.display("note", &row), "-");
        assert_eq!(formatters.display("absent", &row), "-");
    }

    #[test]
    fn test_currency() {
        assert_eq!(cell(currency("$"), Decimal::new(123456789, 2)), "$1,234,567.89");
        assert_eq!(cell(currency("¥"), 5i64), "¥5.00");
        assert_eq!(cell(currency("$"), Decimal::new(-150, 2)), "-$1.50");
        assert_eq!(cell(currency("$"), Value::Null), "-");
    }

    #[test]
    fn test_integer_and_percent() {
        assert_eq!(cell(integer(), 1234567i64), "1,234,567");
        assert_eq!(cell(integer(), -1000i64), "-1,000");
        assert_eq!(cell(percent(1), 0.125f64), "12.5%");
        assert_eq!(cell(percent(0), Decimal::new(3, 1)), "30%");
    }

    #[test]
    fn test_date() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(cell(date("%Y-%m-%d"), dt), "2024-03-09");
    }
}
