use super::*;
use crate::app::services::export_writer::ExportSchema;
use crate::constants::{DEFAULT_TIMEZONE_SUFFIX, EXPORT_COLUMN_MAPPING, TIMEZONE_SUFFIX_FIELDS};

fn default_schema() -> ExportSchema {
    ExportSchema::new(
        EXPORT_COLUMN_MAPPING,
        TIMEZONE_SUFFIX_FIELDS,
        DEFAULT_TIMEZONE_SUFFIX,
    )
}

#[test]
fn test_fields_follow_target_order() {
    assert_eq!(
        default_schema().fields(),
        vec![
            "name",
            "PRN_KICO_SEAL",
            "MMS_SEAL_NO",
            "PRN_RECEIVED_DATE",
            "PORT_PRN_BAG_CONDITION_STATUS",
            "PRN_WAREHOUSE_NAME",
            "PRN_TRUCK_REG",
            "WITNESS_PRN_USER",
            "PRN_FORM_COMPLETE",
        ]
    );
}

#[test]
fn test_missing_sources_become_null() {
    let table = enriched_table(&[("BAG1", Some("KS-1"), Some(at(8, 0)))]);
    let export = default_schema().map(&table);

    assert_eq!(export.len(), 1);
    assert_eq!(export.rows[0].values.len(), 9);
    assert_eq!(export.value(0, "name"), Some("BAG1"));
    assert_eq!(export.value(0, "PRN_KICO_SEAL"), Some("KS-1"));
    for field in [
        "MMS_SEAL_NO",
        "PRN_RECEIVED_DATE",
        "PORT_PRN_BAG_CONDITION_STATUS",
        "PRN_WAREHOUSE_NAME",
        "PRN_TRUCK_REG",
        "WITNESS_PRN_USER",
    ] {
        assert_eq!(export.value(0, field), None, "{field} should be null");
    }
}

#[test]
fn test_suffix_applies_only_to_present_timezone_fields() {
    let table = enriched_table(&[
        ("BAG1", Some("KS-1"), Some(at(8, 5))),
        ("BAG2", None, None),
    ]);
    let export = default_schema().map(&table);

    assert_eq!(export.value(0, "PRN_FORM_COMPLETE"), Some("2024-03-10 08:05:00+02:00"));
    assert_eq!(export.value(0, "PRN_KICO_SEAL"), Some("KS-1"));
    assert_eq!(export.value(1, "PRN_FORM_COMPLETE"), None);
    assert_eq!(export.value(1, "PRN_KICO_SEAL"), None);
}

#[test]
fn test_source_names_match_exactly() {
    let schema = ExportSchema::new(&[("kico seal no.", "SEAL")], &[], "");
    let table = enriched_table(&[("BAG1", Some("KS-1"), None)]);
    let export = schema.map(&table);
    assert_eq!(export.value(0, "SEAL"), None);
}

#[test]
fn test_empty_selection_keeps_the_schema() {
    let table = enriched_table(&[]);
    let export = default_schema().map(&table);
    assert!(export.is_empty());
    assert_eq!(export.fields.len(), 9);
    assert_eq!(export.to_report().columns, default_schema().fields());
}
