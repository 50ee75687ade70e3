//! Byte-range safe code rewriter.
//!
//! This module provides a reusable rewriter that applies code edits
//! using byte ranges, preserving formatting and handling overlaps safely.
//!
//! # Usage
//!
//! ```
//! use exprlint::fix::{ByteRangeRewriter, Edit};
//!
//! let source = "x > 5";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::new(0, 5, "5 < x"));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, "5 < x");
//! ```

use thiserror::Error;

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Replacement content
    pub replacement: String,
    /// Optional description for logging
    pub description: Option<String>,
}

impl Edit {
    /// Create a new edit
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
            description: None,
        }
    }

    /// Create an edit with description
    #[must_use]
    pub fn with_description(
        start_byte: usize,
        end_byte: usize,
        replacement: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
            description: Some(description.into()),
        }
    }

    /// Check if this edit overlaps with another
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two or more edits have overlapping ranges
    #[error("overlapping edits at indices {edit_a} and {edit_b}")]
    OverlappingEdits {
        /// Index of first overlapping edit
        edit_a: usize,
        /// Index of second overlapping edit
        edit_b: usize,
    },
    /// Edit range is out of bounds
    #[error("edit {edit_index} out of bounds: end byte {end_byte} > source length {source_len}")]
    OutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// End byte of the edit
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
}

/// Safe code rewriter using byte ranges
///
/// This rewriter applies edits in reverse order to preserve byte positions,
/// and validates that edits don't overlap.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code
    source: String,
    /// Pending edits
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Get the number of pending edits
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Check if there are any pending edits
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap or are out of bounds
    pub fn validate(&self) -> Result<(), RewriteError> {
        // Check bounds
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.end_byte > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    end_byte: edit.end_byte,
                    source_len: self.source.len(),
                });
            }
        }

        // Check overlaps
        for i in 0..self.edits.len() {
            for j in (i + 1)..self.edits.len() {
                if self.edits[i].overlaps(&self.edits[j]) {
                    return Err(RewriteError::OverlappingEdits {
                        edit_a: i,
                        edit_b: j,
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source
    ///
    /// Edits are applied in reverse order (by start position) to preserve
    /// byte offsets as we modify the string.
    ///
    /// # Errors
    /// Returns error if edits overlap or are out of bounds
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted_edits = self.edits;

        // Sort by start position descending (apply from end to start)
        sorted_edits.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));

        // Apply edits
        for edit in sorted_edits {
            result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacement() {
        let source = "x > 5";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(0, 5, "5 < x"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "5 < x");
    }

    #[test]
    fn test_multiple_non_overlapping_edits() {
        let source = "a > 1\nb > 2\n";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(0, 5, "1 < a"));
        rewriter.add_edit(Edit::new(6, 11, "2 < b"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "1 < a\n2 < b\n");
    }

    #[test]
    fn test_overlapping_edits_error() {
        let source = "hello world";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(0, 8, "hi"));
        rewriter.add_edit(Edit::new(5, 10, "there"));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OverlappingEdits { .. })));
    }

    #[test]
    fn test_out_of_bounds_error() {
        let source = "short";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(0, 100, "long"));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OutOfBounds { .. })));
    }

    #[test]
    fn test_adjacent_non_overlapping_edits() {
        let source = "abcdef";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(0, 3, "XXX"));
        rewriter.add_edit(Edit::new(3, 6, "YYY"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "XXXYYY");
    }

    #[test]
    fn test_empty_edits() {
        let source = "x > 5";
        let rewriter = ByteRangeRewriter::new(source);
        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, source);
    }

    #[test]
    fn test_preserves_surrounding_text() {
        let source = "# threshold check\nx > 5  # noqa-free\n";
        let start = source.find("x > 5").expect("find expression");
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::with_description(
            start,
            start + 5,
            "5 < x",
            "Reverse inequality",
        ));

        let result = rewriter.apply().expect("should apply");
        assert!(result.contains("# threshold check"));
        assert!(result.contains("5 < x  # noqa-free"));
    }
}
