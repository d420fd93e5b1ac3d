//! Text diffing between two documents, line-by-line with optional
//! character-level refinement.
//!
//! The entry point is [`compute_diff`], which takes both documents as
//! slices of lines and returns [`LineChange`]s in 1-based editor
//! coordinates. Each sufficiently small line change can carry nested
//! [`CharChange`]s locating the exact character spans that differ.
//!
//! ```
//! use textdiff_core::{compute_diff, DiffOptions};
//!
//! let original = ["fn main() {", "    println!(\"hi\");", "}"];
//! let modified = ["fn main() {", "    println!(\"hello\");", "}"];
//! let result = compute_diff(&original, &modified, &DiffOptions::default())?;
//! assert_eq!(result.changes.len(), 1);
//! assert_eq!(result.changes[0].original_start_line_number, 2);
//! # Ok::<(), textdiff_core::DiffError>(())
//! ```
//!
//! The underlying engine ([`lcs::LcsDiff`]) is generic over any
//! [`sequence::DiffSequence`] and is also usable directly, e.g. through
//! [`string_diff`] for plain character diffs.

pub mod lcs;
pub mod line_diff;
pub mod sequence;

pub use lcs::{DiffChange, LcsDiff, LcsDiffResult};
pub use line_diff::{compute_diff, string_diff};
pub use sequence::{CharSequence, DiffSequence, LineSequence};

use thiserror::Error;

/// Errors reported by the diff entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// A document is given as a slice of lines; even an empty document
    /// has one empty line, so an empty slice is a caller bug.
    #[error("a document must have at least one line")]
    EmptyInput,
}

/// Knobs for [`compute_diff`].
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Refine small line changes down to character spans.
    pub should_compute_char_changes: bool,
    /// Merge character changes separated by insignificant matching runs.
    pub should_post_process_char_changes: bool,
    /// Compare lines without their leading and trailing whitespace;
    /// whitespace-only differences are then reported as separate
    /// dedicated changes.
    pub should_ignore_trim_whitespace: bool,
    /// Shift change boundaries toward blank lines and block edges.
    pub should_make_pretty_diff: bool,
    /// Overall wall-clock budget in milliseconds; 0 means unlimited.
    /// When exceeded, the result is an over-approximation and
    /// [`LineDiffResult::quit_early`] is set.
    pub max_computation_time_ms: u64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            should_compute_char_changes: true,
            should_post_process_char_changes: true,
            should_ignore_trim_whitespace: false,
            should_make_pretty_diff: true,
            max_computation_time_ms: 0,
        }
    }
}

/// A contiguous run of differing lines.
///
/// Line numbers are 1-based and inclusive. A side that is empty (a pure
/// insertion or deletion) has its end line number set to 0 and its start
/// line number naming the line *before* which nothing was touched on
/// that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub original_start_line_number: u32,
    pub original_end_line_number: u32,
    pub modified_start_line_number: u32,
    pub modified_end_line_number: u32,
    /// Character-level detail, present when refinement was requested and
    /// the change was small enough to refine in time.
    pub char_changes: Option<Vec<CharChange>>,
}

/// A character span that differs, in 1-based (line, column) coordinates
/// with exclusive end columns. A side that is empty has all four of its
/// numbers set to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharChange {
    pub original_start_line_number: u32,
    pub original_start_column: u32,
    pub original_end_line_number: u32,
    pub original_end_column: u32,
    pub modified_start_line_number: u32,
    pub modified_start_column: u32,
    pub modified_end_line_number: u32,
    pub modified_end_column: u32,
}

/// Result of [`compute_diff`].
#[derive(Debug, Clone)]
pub struct LineDiffResult {
    /// True when the computation budget ran out; the changes then
    /// over-approximate the true difference but still cover it.
    pub quit_early: bool,
    pub changes: Vec<LineChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = DiffOptions::default();
        assert!(options.should_compute_char_changes);
        assert!(options.should_post_process_char_changes);
        assert!(!options.should_ignore_trim_whitespace);
        assert!(options.should_make_pretty_diff);
        assert_eq!(options.max_computation_time_ms, 0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = compute_diff(&[], &["a"], &DiffOptions::default()).unwrap_err();
        assert_eq!(err, DiffError::EmptyInput);
        let err = compute_diff(&["a"], &[], &DiffOptions::default()).unwrap_err();
        assert_eq!(err, DiffError::EmptyInput);
    }
}
