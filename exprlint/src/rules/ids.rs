//! Centralized rule IDs for exprlint.

/// Ordering: strict greater-than comparison.
pub const RULE_ID_NUMBER_LINE: &str = "EXL-W001";

/// Parse failure while reading an expression file.
pub const RULE_ID_PARSE_ERROR: &str = "EXL-E001";
