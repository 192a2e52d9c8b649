use super::*;
use crate::app::services::record_processor::anomaly::flag_suspicious_identifiers;
use crate::app::services::record_processor::deduplication::detect_duplicates;
use proptest::prelude::*;

fn identifier_of_length(length: usize) -> String {
    "X".repeat(length)
}

#[test]
fn test_flagging_band_is_inclusive() {
    let lengths = [15, 16, 20, 24, 25];
    let rows = lengths
        .iter()
        .enumerate()
        .map(|(offset, &length)| {
            row(
                Some(identifier_of_length(length).as_str()),
                "HR",
                "SEAL",
                Some(at(2024, 1, 1, 8 + offset as u32, 0)),
            )
        })
        .collect();
    let (enriched, columns, mut stats) = enrich(&minimal_table(rows));

    let flagged = flag_suspicious_identifiers(
        &enriched,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
    );

    let flagged_lengths: Vec<usize> = flagged
        .iter()
        .map(|row| row.raw_identifier.chars().count())
        .collect();
    // Newest first: the 24-char identifier was added last
    assert_eq!(flagged_lengths, vec![24, 20, 16]);
    assert_eq!(stats.flagged_records, 3);
}

#[test]
fn test_flagged_row_projection() {
    let raw = "BAG-2024-000017";
    let padded = format!("{raw}X");
    let table = minimal_table(vec![row(
        Some(padded.as_str()),
        "HR",
        "SEAL-77",
        Some(at(2024, 5, 4, 13, 15)),
    )]);
    let (enriched, columns, mut stats) = enrich(&table);
    let flagged = flag_suspicious_identifiers(
        &enriched,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
    );

    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].raw_identifier, padded);
    assert_eq!(flagged[0].seal_number.as_deref(), Some("SEAL-77"));
    assert_eq!(flagged[0].added_time, Some(at(2024, 5, 4, 13, 15)));
}

#[test]
fn test_flagging_uses_raw_length_not_effective_identifier() {
    // 23 characters: keyed by its Bag attribute, still flagged on raw length
    let raw = "Lot=LOT123, Bag: BAG456";
    let table = minimal_table(vec![row(Some(raw), "HR", "S", Some(at(2024, 1, 1, 8, 0)))]);
    let (enriched, columns, mut stats) = enrich(&table);
    let flagged = flag_suspicious_identifiers(
        &enriched,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
    );

    assert_eq!(enriched.records()[0].effective_identifier.as_deref(), Some("BAG456"));
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].raw_identifier, raw);
}

#[test]
fn test_duplicate_records_are_also_flagged() {
    let suspicious = identifier_of_length(18);
    let table = minimal_table(vec![
        row(Some(suspicious.as_str()), "HR-1", "S1", Some(at(2024, 1, 1, 8, 0))),
        row(Some(suspicious.as_str()), "HR-2", "S2", Some(at(2024, 1, 1, 9, 0))),
    ]);
    let (enriched, columns, mut stats) = enrich(&table);
    let duplicates = detect_duplicates(&enriched, &columns, &mut stats);
    let flagged = flag_suspicious_identifiers(
        &enriched,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
    );

    assert_eq!(duplicates.len(), 1);
    assert_eq!(flagged.len(), 2);
}

#[test]
fn test_missing_identifiers_are_never_flagged() {
    let table = minimal_table(vec![row(None, "HR", "S", Some(at(2024, 1, 1, 8, 0)))]);
    let (enriched, columns, mut stats) = enrich(&table);
    let flagged = flag_suspicious_identifiers(
        &enriched,
        &columns,
        &IdentifierThresholds::default(),
        &mut stats,
    );
    assert!(flagged.is_empty());
}

#[test]
fn test_custom_band() {
    let thresholds = IdentifierThresholds {
        flag_min_length: 4,
        flag_max_length: 6,
        ..IdentifierThresholds::default()
    };
    let table = minimal_table(vec![
        row(Some("ABC"), "HR", "S", Some(at(2024, 1, 1, 8, 0))),
        row(Some("ABCD"), "HR", "S", Some(at(2024, 1, 1, 9, 0))),
        row(Some("ABCDEFG"), "HR", "S", Some(at(2024, 1, 1, 10, 0))),
    ]);
    let (enriched, columns, mut stats) = enrich(&table);
    let flagged = flag_suspicious_identifiers(&enriched, &columns, &thresholds, &mut stats);

    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].raw_identifier, "ABCD");
}

proptest! {
    #[test]
    fn test_flagged_iff_length_in_band(length in 1usize..40) {
        let raw = identifier_of_length(length);
        let table = minimal_table(vec![row(Some(raw.as_str()), "HR", "S", Some(at(2024, 1, 1, 8, 0)))]);
        let (enriched, columns, mut stats) = enrich(&table);
        let flagged = flag_suspicious_identifiers(
            &enriched,
            &columns,
            &IdentifierThresholds::default(),
            &mut stats,
        );
        prop_assert_eq!(flagged.len() == 1, (16..=24).contains(&length));
    }
}
