//! Bag identifier parsing
//!
//! Turns one raw bag identifier string into a mapping of attributes and derives
//! the effective identifier used as the duplicate-detection key.
//!
//! # Identifier shapes
//!
//! Short identifiers (a bare bag number typed or scanned on its own) are used
//! verbatim. Long identifiers are structured strings such as
//! `Lot=LOT123, Bag: BAG456`, from which the `Bag` attribute is taken.
//!
//! ```rust
//! use port_receiving::app::services::bag_id_parser::{derive_effective_identifier, parse_bag_identifier};
//!
//! let parsed = parse_bag_identifier("Lot=LOT123, Bag: BAG456");
//! assert_eq!(parsed.get("Lot"), Some("LOT123"));
//! assert_eq!(derive_effective_identifier("Lot=LOT123, Bag: BAG456", &parsed, 20).as_deref(), Some("BAG456"));
//! ```

pub mod grammar;

#[cfg(test)]
pub mod tests;

use crate::app::models::ParsedIdentifier;
use crate::constants::BAG_ATTRIBUTE;

pub use grammar::{COLON_GRAMMAR, EQUALS_GRAMMAR, GRAMMARS, PairGrammar};

/// Parse a raw identifier with every grammar, later grammars winning on collision
///
/// Never fails: malformed or empty input yields an empty mapping.
pub fn parse_bag_identifier(raw: &str) -> ParsedIdentifier {
    GRAMMARS
        .iter()
        .map(|grammar| grammar.parse(raw))
        .fold(ParsedIdentifier::new(), ParsedIdentifier::merge)
}

/// Canonical per-record key
///
/// Identifiers longer than `min_structured_length` characters resolve to their
/// parsed `Bag` attribute; shorter ones are used as-is. Returns `None` when a
/// long identifier carries no `Bag` attribute.
pub fn derive_effective_identifier(
    raw: &str,
    parsed: &ParsedIdentifier,
    min_structured_length: usize,
) -> Option<String> {
    if raw.chars().count() > min_structured_length {
        parsed.get(BAG_ATTRIBUTE).map(str::to_string)
    } else {
        Some(raw.to_string())
    }
}
