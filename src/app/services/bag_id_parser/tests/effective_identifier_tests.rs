//! Tests for the effective identifier rule

use super::*;
use crate::app::services::bag_id_parser::{derive_effective_identifier, parse_bag_identifier};
use crate::constants::DEFAULT_EFFECTIVE_ID_MIN_LENGTH;
use proptest::prelude::*;

#[test]
fn test_long_identifier_uses_bag_attribute() {
    let raw = "Lot=LOT123, Bag: BAG456";
    assert_eq!(raw.chars().count(), 23);
    let attributes = parse_bag_identifier(raw);
    assert_eq!(
        derive_effective_identifier(raw, &attributes, DEFAULT_EFFECTIVE_ID_MIN_LENGTH),
        Some("BAG456".to_string())
    );
}

#[test]
fn test_identifier_of_exactly_cutoff_length_is_verbatim() {
    let raw = "Lot=ABCDEF,Bag=XYZ12";
    assert_eq!(raw.chars().count(), 20);
    let attributes = parse_bag_identifier(raw);
    assert_eq!(
        derive_effective_identifier(raw, &attributes, DEFAULT_EFFECTIVE_ID_MIN_LENGTH),
        Some(raw.to_string())
    );
}

#[test]
fn test_long_identifier_without_bag_attribute_is_absent() {
    let raw = "Lot=LOT123, Seal: SEAL77";
    let attributes = parse_bag_identifier(raw);
    assert_eq!(
        derive_effective_identifier(raw, &attributes, DEFAULT_EFFECTIVE_ID_MIN_LENGTH),
        None
    );
}

#[test]
fn test_length_counts_characters_not_bytes() {
    // 20 characters but more than 20 bytes
    let raw = "ÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉ";
    assert_eq!(raw.chars().count(), 20);
    assert_eq!(
        derive_effective_identifier(raw, &parsed(&[]), DEFAULT_EFFECTIVE_ID_MIN_LENGTH),
        Some(raw.to_string())
    );
}

proptest! {
    #[test]
    fn prop_effective_identifier_depends_only_on_length_and_bag(
        raw in "[A-Za-z0-9]{1,40}",
        bag in prop::option::of(VALUE_PATTERN),
    ) {
        let attributes = match &bag {
            Some(bag) => parsed(&[("Bag", bag.as_str())]),
            None => parsed(&[]),
        };
        let result = derive_effective_identifier(&raw, &attributes, DEFAULT_EFFECTIVE_ID_MIN_LENGTH);
        if raw.chars().count() <= DEFAULT_EFFECTIVE_ID_MIN_LENGTH {
            prop_assert_eq!(result, Some(raw.clone()));
        } else {
            prop_assert_eq!(result, bag);
        }
    }
}
