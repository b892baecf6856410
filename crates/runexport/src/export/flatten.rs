//! Flattening of per-record QC flags into fixed detector columns.

use indexmap::IndexSet;

use crate::data::Record;

/// Discover every distinct detector name across a batch of records.
///
/// Iteration order is first-appearance order, which is also the order the
/// detector columns are appended to each output row. A record with no flags
/// contributes nothing.
pub fn discover_detectors(records: &[Record]) -> IndexSet<String> {
    let mut detectors = IndexSet::new();
    for record in records {
        for flag in &record.qc_flags {
            detectors.insert(flag.detector.name.clone());
        }
    }
    detectors
}

/// Render the cell for one detector column of one record.
///
/// Each flag renders as `"<flag type name or empty> ( from: <from> to: <to> )"`;
/// multiple flags for the same detector are joined with `|`. A record with no
/// flags for this detector yields an empty string.
pub fn render_flag_cell(record: &Record, detector: &str) -> String {
    record
        .qc_flags
        .iter()
        .filter(|flag| flag.detector.name == detector)
        .map(|flag| {
            format!(
                "{} ( from: {} to: {} )",
                flag.flag_type.name, flag.from, flag.to
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QcFlag;

    #[test]
    fn test_discovery_order_is_first_appearance() {
        let records = vec![
            Record::new().with_flag(QcFlag::new("TPC", "BAD", 0, 1)),
            Record::new()
                .with_flag(QcFlag::new("ITS", "LIMITED", 0, 1))
                .with_flag(QcFlag::new("TPC", "GOOD", 2, 3)),
            Record::new().with_flag(QcFlag::new("FT0", "BAD", 0, 1)),
        ];

        let discovered = discover_detectors(&records);
        let detectors: Vec<&str> = discovered.iter().map(String::as_str).collect();
        assert_eq!(detectors, vec!["TPC", "ITS", "FT0"]);
    }

    #[test]
    fn test_records_without_flags_contribute_nothing() {
        let records = vec![Record::new(), Record::new()];
        assert!(discover_detectors(&records).is_empty());
    }

    #[test]
    fn test_single_flag_cell() {
        let record = Record::new().with_flag(QcFlag::new("TPC", "BAD", 10, 20));
        assert_eq!(render_flag_cell(&record, "TPC"), "BAD ( from: 10 to: 20 )");
    }

    #[test]
    fn test_multiple_flags_joined_with_pipe() {
        let record = Record::new()
            .with_flag(QcFlag::new("TPC", "BAD", 10, 20))
            .with_flag(QcFlag::new("TPC", "LIMITED", 30, 40));
        assert_eq!(
            render_flag_cell(&record, "TPC"),
            "BAD ( from: 10 to: 20 )|LIMITED ( from: 30 to: 40 )"
        );
    }

    #[test]
    fn test_detector_without_flags_renders_empty() {
        let record = Record::new().with_flag(QcFlag::new("TPC", "BAD", 10, 20));
        assert_eq!(render_flag_cell(&record, "ITS"), "");
    }

    #[test]
    fn test_empty_flag_type_name() {
        let record = Record::new().with_flag(QcFlag::new("TPC", "", 10, 20));
        assert_eq!(render_flag_cell(&record, "TPC"), " ( from: 10 to: 20 )");
    }
}
