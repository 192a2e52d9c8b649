//! Attribute micro-grammars found in the bag identifier field
//!
//! Scanners emit `key=value` pairs while manual entries use `key: value`, and a
//! single field may mix both. Each convention is an independent [`PairGrammar`]
//! applied to the same comma-split segments.

use crate::app::models::ParsedIdentifier;
use crate::constants::{COLON_SEPARATOR, EQUALS_SEPARATOR, SEGMENT_SEPARATOR};

/// A `key<separator>value` pair convention over comma-separated segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairGrammar {
    pub name: &'static str,
    pub separator: &'static str,
}

/// Scanner convention
pub const EQUALS_GRAMMAR: PairGrammar = PairGrammar {
    name: "equals",
    separator: EQUALS_SEPARATOR,
};

/// Manual-entry convention
pub const COLON_GRAMMAR: PairGrammar = PairGrammar {
    name: "colon",
    separator: COLON_SEPARATOR,
};

/// Grammars in application order; later grammars win on key collision
pub const GRAMMARS: &[PairGrammar] = &[EQUALS_GRAMMAR, COLON_GRAMMAR];

impl PairGrammar {
    /// Parse one segment, splitting on the first separator occurrence
    ///
    /// Keys are trimmed; values are kept exactly as written.
    pub fn parse_segment(&self, segment: &str) -> Option<(String, String)> {
        let (key, value) = segment.split_once(self.separator)?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }

    /// Collect every matching segment of a raw identifier
    ///
    /// Segments without the separator are dropped. A key repeated within the
    /// same grammar keeps its last value.
    pub fn parse(&self, raw: &str) -> ParsedIdentifier {
        let mut parsed = ParsedIdentifier::new();
        for segment in raw.split(SEGMENT_SEPARATOR) {
            if let Some((key, value)) = self.parse_segment(segment) {
                parsed.insert(key, value);
            }
        }
        parsed
    }
}
