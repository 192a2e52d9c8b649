//! Tests for bag identifier parsing and effective identifier derivation

pub mod effective_identifier_tests;

use crate::app::models::ParsedIdentifier;

/// Build a parsed identifier from literal pairs
pub fn parsed(pairs: &[(&str, &str)]) -> ParsedIdentifier {
    let mut parsed = ParsedIdentifier::new();
    for (key, value) in pairs {
        parsed.insert(*key, *value);
    }
    parsed
}

/// Attribute keys that contain no grammar separators
pub const KEY_PATTERN: &str = "[A-Za-z][A-Za-z0-9_]{0,7}";

/// Attribute values that contain no grammar separators
pub const VALUE_PATTERN: &str = "[A-Za-z0-9]{1,12}";
