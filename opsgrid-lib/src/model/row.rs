//! Dynamic table row

use std::collections::HashMap;

use super::Value;

/// A single row returned by a data source.
///
/// Rows hold field values as a `HashMap<String, Value>` keyed by column key.
///
/// # Example
///
/// ```
/// use opsgrid_lib::model::Row;
///
/// let row = Row::new("order-1")
///     .set("sku", "SKU-1001")
///     .set("units", 3i64);
///
/// assert_eq!(row.get("sku").and_then(|v| v.as_str()), Some("SKU-1001"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    id: String,
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Returns the row identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, or `Value::Null` when absent.
    pub fn value(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}
