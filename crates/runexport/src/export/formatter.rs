//! Per-field value formatting.

use std::collections::HashMap;

use serde_json::Value;

use crate::data::Record;

/// A display formatter for one field.
///
/// Receives the raw value and the whole record, so a formatter may derive
/// its output from sibling fields.
pub type FieldFormatter = Box<dyn Fn(&Value, &Record) -> Value + Send + Sync>;

/// Registry mapping field keys to optional formatters.
///
/// Fields without a registered formatter pass their raw value through
/// unchanged. Formatting is per-field: registering a formatter for one key
/// never affects the rendering of another.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, FieldFormatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a formatter for a field key, replacing any previous one.
    pub fn register(
        mut self,
        field: impl Into<String>,
        formatter: impl Fn(&Value, &Record) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.formatters.insert(field.into(), Box::new(formatter));
        self
    }

    /// Format one field value in the context of its record.
    pub fn format(&self, field: &str, value: &Value, record: &Record) -> Value {
        match self.formatters.get(field) {
            Some(formatter) => formatter(value, record),
            None => value.clone(),
        }
    }
}
