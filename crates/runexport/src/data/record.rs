//! Run records and their QC flag annotations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reference to a named entity (detector, flag type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A quality-control flag attached to a run.
///
/// `detector` is the grouping dimension: every distinct detector name in a
/// batch becomes one output column. `flag_type` is the display label, and
/// `from`/`to` bound the flagged time window (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcFlag {
    pub detector: NamedRef,
    pub flag_type: NamedRef,
    pub from: i64,
    pub to: i64,
}

impl QcFlag {
    pub fn new(detector: impl Into<String>, flag_type: impl Into<String>, from: i64, to: i64) -> Self {
        Self {
            detector: NamedRef::new(detector),
            flag_type: NamedRef::new(flag_type),
            from,
            to,
        }
    }
}

/// One exportable entity, e.g. a run.
///
/// Domain fields are an ordered key/value map so that exported columns keep
/// the order the fields were defined in. The flag collection may be empty;
/// it may also be replaced wholesale by an enrichment step before export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qc_flags: Vec<QcFlag>,
}

impl Record {
    /// Create a record with no fields and no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, preserving insertion order.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach a QC flag.
    pub fn with_flag(mut self, flag: QcFlag) -> Self {
        self.qc_flags.push(flag);
        self
    }

    /// Replace the entire flag collection.
    pub fn with_flags(mut self, flags: Vec<QcFlag>) -> Self {
        self.qc_flags = flags;
        self
    }

    /// Get a field value by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Read an integer identifier field, e.g. the run number.
    pub fn integer_field(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_order_is_preserved() {
        let record = Record::new()
            .with_field("runNumber", 42)
            .with_field("environmentId", "prod")
            .with_field("duration", 3600);

        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["runNumber", "environmentId", "duration"]);
    }

    #[test]
    fn test_integer_field() {
        let record = Record::new()
            .with_field("runNumber", 7)
            .with_field("label", "seven");

        assert_eq!(record.integer_field("runNumber"), Some(7));
        assert_eq!(record.integer_field("label"), None);
        assert_eq!(record.integer_field("missing"), None);
    }

    #[test]
    fn test_deserialize_from_wire_shape() {
        let record: Record = serde_json::from_value(json!({
            "runNumber": 1,
            "qcFlags": [
                {"detector": {"name": "TPC"}, "flagType": {"name": "BAD"}, "from": 10, "to": 20}
            ]
        }))
        .unwrap();

        assert_eq!(record.integer_field("runNumber"), Some(1));
        assert_eq!(record.qc_flags.len(), 1);
        assert_eq!(record.qc_flags[0].detector.name, "TPC");
        assert_eq!(record.qc_flags[0].flag_type.name, "BAD");
    }
}
