//! Line-level diff orchestration.
//!
//! Runs the LCS engine over line hashes, optionally refines each line
//! change with a character-level diff, and reports everything in 1-based
//! editor coordinates. When whitespace is ignored at the line level, a
//! reconciliation pass re-surfaces whitespace-only differences as
//! dedicated changes so no edit is silently dropped.

use std::time::{Duration, Instant};

use crate::lcs::{DiffChange, LcsDiff};
use crate::sequence::{first_non_blank_column, last_non_blank_column, CharSequence, LineSequence};
use crate::{CharChange, DiffError, DiffOptions, LineChange, LineDiffResult};

/// Line changes spanning this many lines or more on either side are not
/// refined with character-level diffs.
const MAX_CHAR_DIFF_LINES: usize = 20;

/// A bounded budget never spends more than this on character-level
/// refinement; an unbounded budget is not capped.
const MAX_CHAR_DIFF_RUNTIME_MS: u64 = 5000;

/// Character changes separated by fewer matching characters than this
/// are merged into one.
const MINIMUM_MATCHING_CHARACTERS: usize = 3;

/// Wall-clock budget shared by the diff passes. A zero configured limit
/// means unlimited.
#[derive(Clone, Copy)]
struct TimeBudget {
    start: Instant,
    limit: Option<Duration>,
}

impl TimeBudget {
    fn new(limit_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            limit: (limit_ms > 0).then(|| Duration::from_millis(limit_ms)),
        }
    }

    /// The same clock with the limit capped at `cap_ms`. An unbounded
    /// budget stays unbounded.
    fn capped(&self, cap_ms: u64) -> Self {
        let cap = Duration::from_millis(cap_ms);
        Self {
            start: self.start,
            limit: self.limit.map(|limit| limit.min(cap)),
        }
    }

    fn can_continue(&self) -> bool {
        self.limit.map_or(true, |limit| self.start.elapsed() < limit)
    }
}

/// Compute the line differences between two texts, given as slices of
/// lines without their terminators.
pub fn compute_diff(
    original_lines: &[&str],
    modified_lines: &[&str],
    options: &DiffOptions,
) -> Result<LineDiffResult, DiffError> {
    if original_lines.is_empty() || modified_lines.is_empty() {
        return Err(DiffError::EmptyInput);
    }
    DiffComputer::new(original_lines, modified_lines, options).compute()
}

/// Character-level diff of two strings, exposed for callers that want
/// the raw edit script without line bookkeeping.
pub fn string_diff(original: &str, modified: &str, pretty: bool) -> Vec<DiffChange> {
    let original = CharSequence::from_str(original);
    let modified = CharSequence::from_str(modified);
    LcsDiff::new(&original, &modified, None)
        .compute_diff(pretty)
        .changes
}

struct DiffComputer<'a> {
    original_lines: &'a [&'a str],
    modified_lines: &'a [&'a str],
    original: LineSequence<'a>,
    modified: LineSequence<'a>,
    should_compute_char_changes: bool,
    should_post_process_char_changes: bool,
    should_ignore_trim_whitespace: bool,
    should_make_pretty_diff: bool,
    line_budget: TimeBudget,
    char_budget: TimeBudget,
}

impl<'a> DiffComputer<'a> {
    fn new(
        original_lines: &'a [&'a str],
        modified_lines: &'a [&'a str],
        options: &DiffOptions,
    ) -> Self {
        let line_budget = TimeBudget::new(options.max_computation_time_ms);
        let char_budget = line_budget.capped(MAX_CHAR_DIFF_RUNTIME_MS);
        Self {
            original_lines,
            modified_lines,
            original: LineSequence::new(original_lines, options.should_ignore_trim_whitespace),
            modified: LineSequence::new(modified_lines, options.should_ignore_trim_whitespace),
            should_compute_char_changes: options.should_compute_char_changes,
            should_post_process_char_changes: options.should_post_process_char_changes,
            should_ignore_trim_whitespace: options.should_ignore_trim_whitespace,
            should_make_pretty_diff: options.should_make_pretty_diff,
            line_budget,
            char_budget,
        }
    }

    fn compute(&self) -> Result<LineDiffResult, DiffError> {
        // An empty document still has one (empty) line; covering changes
        // for these shapes avoids running the engine at all.
        if self.original_lines == [""] {
            if self.modified_lines == [""] {
                return Ok(LineDiffResult {
                    quit_early: false,
                    changes: Vec::new(),
                });
            }
            return Ok(LineDiffResult {
                quit_early: false,
                changes: vec![LineChange {
                    original_start_line_number: 1,
                    original_end_line_number: 1,
                    modified_start_line_number: 1,
                    modified_end_line_number: self.modified_lines.len() as u32,
                    char_changes: None,
                }],
            });
        }
        if self.modified_lines == [""] {
            return Ok(LineDiffResult {
                quit_early: false,
                changes: vec![LineChange {
                    original_start_line_number: 1,
                    original_end_line_number: self.original_lines.len() as u32,
                    modified_start_line_number: 1,
                    modified_end_line_number: 1,
                    char_changes: None,
                }],
            });
        }

        let budget = self.line_budget;
        let can_continue: &dyn Fn(usize, usize) -> bool = &move |_, _| budget.can_continue();
        let result = LcsDiff::new(&self.original, &self.modified, Some(can_continue))
            .compute_diff(self.should_make_pretty_diff);

        let changes = if self.should_ignore_trim_whitespace {
            self.reconcile_and_map(&result.changes)
        } else {
            result
                .changes
                .iter()
                .map(|change| self.line_change_from_diff(change))
                .collect()
        };

        Ok(LineDiffResult {
            quit_early: result.quit_early,
            changes,
        })
    }

    /// Walk the matched regions between line changes, re-surfacing lines
    /// that compared equal only because their edge whitespace was ignored.
    fn reconcile_and_map(&self, raw_changes: &[DiffChange]) -> Vec<LineChange> {
        let mut result: Vec<LineChange> = Vec::new();
        let mut original_line_index = 0usize;
        let mut modified_line_index = 0usize;

        for i in 0..=raw_changes.len() {
            let next_change = raw_changes.get(i);
            let original_stop =
                next_change.map_or(self.original_lines.len(), |c| c.original_start);
            let modified_stop =
                next_change.map_or(self.modified_lines.len(), |c| c.modified_start);

            while original_line_index < original_stop && modified_line_index < modified_stop {
                let original_line = self.original_lines[original_line_index];
                let modified_line = self.modified_lines[modified_line_index];
                if original_line != modified_line {
                    // These lines differ only in leading or trailing
                    // whitespace.
                    self.reconcile_line_whitespace(
                        &mut result,
                        original_line_index,
                        original_line,
                        modified_line_index,
                        modified_line,
                    );
                }
                original_line_index += 1;
                modified_line_index += 1;
            }

            if let Some(change) = next_change {
                result.push(self.line_change_from_diff(change));
                original_line_index = change.original_end();
                modified_line_index = change.modified_end();
            }
        }

        result
    }

    fn reconcile_line_whitespace(
        &self,
        result: &mut Vec<LineChange>,
        original_line_index: usize,
        original_line: &str,
        modified_line_index: usize,
        modified_line: &str,
    ) {
        let original_line_number = original_line_index as u32 + 1;
        let modified_line_number = modified_line_index as u32 + 1;

        // Leading whitespace. Walking back over identical blanks narrows
        // the reported span to where the indentation actually diverges.
        {
            let mut original_column = first_non_blank_column(original_line) as usize;
            let mut modified_column = first_non_blank_column(modified_line) as usize;
            let original_bytes = original_line.as_bytes();
            let modified_bytes = modified_line.as_bytes();
            while original_column > 1
                && modified_column > 1
                && original_bytes[original_column - 2] == modified_bytes[modified_column - 2]
            {
                original_column -= 1;
                modified_column -= 1;
            }
            if original_column > 1 || modified_column > 1 {
                self.push_trim_whitespace_char_change(
                    result,
                    original_line_number,
                    1,
                    original_column as u32,
                    modified_line_number,
                    1,
                    modified_column as u32,
                );
            }
        }

        // Trailing whitespace. The tails past the last non-blank are all
        // ASCII blanks, so their common prefix can be taken bytewise.
        {
            let original_max_column = original_line.chars().count() + 1;
            let modified_max_column = modified_line.chars().count() + 1;
            let mut original_column = last_non_blank_column(original_line) as usize;
            let mut modified_column = last_non_blank_column(modified_line) as usize;
            let original_tail = trailing_blanks(original_line);
            let modified_tail = trailing_blanks(modified_line);
            let common = original_tail
                .bytes()
                .zip(modified_tail.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            original_column += common;
            modified_column += common;
            if original_column < original_max_column || modified_column < modified_max_column {
                self.push_trim_whitespace_char_change(
                    result,
                    original_line_number,
                    original_column as u32,
                    original_max_column as u32,
                    modified_line_number,
                    modified_column as u32,
                    modified_max_column as u32,
                );
            }
        }
    }

    /// Record a whitespace-only difference, extending the previous
    /// whitespace-only change when it covers the directly preceding line
    /// pair.
    #[allow(clippy::too_many_arguments)]
    fn push_trim_whitespace_char_change(
        &self,
        result: &mut Vec<LineChange>,
        original_line_number: u32,
        original_start_column: u32,
        original_end_column: u32,
        modified_line_number: u32,
        modified_start_column: u32,
        modified_end_column: u32,
    ) {
        let char_change = CharChange {
            original_start_line_number: original_line_number,
            original_start_column,
            original_end_line_number: original_line_number,
            original_end_column,
            modified_start_line_number: modified_line_number,
            modified_start_column,
            modified_end_line_number: modified_line_number,
            modified_end_column,
        };

        if let Some(previous) = result.last_mut() {
            // Insertions and deletions keep their own identity.
            let mergeable = previous.original_end_line_number != 0
                && previous.modified_end_line_number != 0
                && previous.original_end_line_number + 1 == original_line_number
                && previous.modified_end_line_number + 1 == modified_line_number;
            if mergeable {
                previous.original_end_line_number = original_line_number;
                previous.modified_end_line_number = modified_line_number;
                if self.should_compute_char_changes {
                    if let Some(char_changes) = previous.char_changes.as_mut() {
                        char_changes.push(char_change);
                    }
                }
                return;
            }
        }

        result.push(LineChange {
            original_start_line_number: original_line_number,
            original_end_line_number: original_line_number,
            modified_start_line_number: modified_line_number,
            modified_end_line_number: modified_line_number,
            char_changes: self.should_compute_char_changes.then(|| vec![char_change]),
        });
    }

    fn line_change_from_diff(&self, change: &DiffChange) -> LineChange {
        let char_changes = self.compute_char_changes(change);

        let (original_start_line_number, original_end_line_number) =
            if change.original_length == 0 {
                // Pure insertion: report the line before the insertion
                // point, with end 0.
                (change.original_start as u32, 0)
            } else {
                (
                    change.original_start as u32 + 1,
                    change.original_end() as u32,
                )
            };
        let (modified_start_line_number, modified_end_line_number) =
            if change.modified_length == 0 {
                (change.modified_start as u32, 0)
            } else {
                (
                    change.modified_start as u32 + 1,
                    change.modified_end() as u32,
                )
            };

        LineChange {
            original_start_line_number,
            original_end_line_number,
            modified_start_line_number,
            modified_end_line_number,
            char_changes,
        }
    }

    /// Character-level refinement of one line change. Only done for
    /// changes small on both sides and only while the character budget
    /// lasts.
    fn compute_char_changes(&self, change: &DiffChange) -> Option<Vec<CharChange>> {
        if !self.should_compute_char_changes {
            return None;
        }
        if change.original_length == 0 || change.original_length >= MAX_CHAR_DIFF_LINES {
            return None;
        }
        if change.modified_length == 0 || change.modified_length >= MAX_CHAR_DIFF_LINES {
            return None;
        }
        if !self.char_budget.can_continue() {
            return None;
        }

        let original = self.original.create_char_sequence(
            self.should_ignore_trim_whitespace,
            change.original_start,
            change.original_end() - 1,
        );
        let modified = self.modified.create_char_sequence(
            self.should_ignore_trim_whitespace,
            change.modified_start,
            change.modified_end() - 1,
        );

        let budget = self.char_budget;
        let can_continue: &dyn Fn(usize, usize) -> bool = &move |_, _| budget.can_continue();
        let mut raw = LcsDiff::new(&original, &modified, Some(can_continue))
            .compute_diff(true)
            .changes;
        if self.should_post_process_char_changes {
            raw = post_process_char_changes(raw);
        }

        Some(
            raw.iter()
                .map(|c| char_change_from_diff(c, &original, &modified))
                .collect(),
        )
    }
}

/// The blank tail of a line, past its last non-blank character.
fn trailing_blanks(line: &str) -> &str {
    &line[line.trim_end_matches([' ', '\t']).len()..]
}

/// Merge character changes separated by runs of matching characters too
/// short to be meaningful on their own.
fn post_process_char_changes(raw_changes: Vec<DiffChange>) -> Vec<DiffChange> {
    if raw_changes.len() <= 1 {
        return raw_changes;
    }
    let mut iter = raw_changes.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut result = vec![first];
    for change in iter {
        if let Some(previous) = result.last_mut() {
            let original_matching = change.original_start - previous.original_end();
            let modified_matching = change.modified_start - previous.modified_end();
            if original_matching.min(modified_matching) < MINIMUM_MATCHING_CHARACTERS {
                previous.original_length = change.original_end() - previous.original_start;
                previous.modified_length = change.modified_end() - previous.modified_start;
                continue;
            }
        }
        result.push(change);
    }
    result
}

fn char_change_from_diff(
    change: &DiffChange,
    original: &CharSequence,
    modified: &CharSequence,
) -> CharChange {
    let (
        original_start_line_number,
        original_start_column,
        original_end_line_number,
        original_end_column,
    ) = if change.original_length == 0 {
        (0, 0, 0, 0)
    } else {
        let first = change.original_start;
        let last = change.original_end() - 1;
        (
            original.start_line_number(first),
            original.start_column(first),
            original.end_line_number(last),
            original.end_column(last),
        )
    };
    let (
        modified_start_line_number,
        modified_start_column,
        modified_end_line_number,
        modified_end_column,
    ) = if change.modified_length == 0 {
        (0, 0, 0, 0)
    } else {
        let first = change.modified_start;
        let last = change.modified_end() - 1;
        (
            modified.start_line_number(first),
            modified.start_column(first),
            modified.end_line_number(last),
            modified.end_column(last),
        )
    };
    CharChange {
        original_start_line_number,
        original_start_column,
        original_end_line_number,
        original_end_column,
        modified_start_line_number,
        modified_start_column,
        modified_end_line_number,
        modified_end_column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_process_merges_short_matching_runs() {
        // "ab" matches between the two changes: shorter than three
        // characters, so the changes fuse.
        let raw = vec![DiffChange::new(0, 1, 0, 1), DiffChange::new(3, 1, 3, 1)];
        let merged = post_process_char_changes(raw);
        assert_eq!(merged, vec![DiffChange::new(0, 4, 0, 4)]);
    }

    #[test]
    fn post_process_keeps_long_matching_runs() {
        let raw = vec![DiffChange::new(0, 1, 0, 1), DiffChange::new(4, 1, 4, 1)];
        let kept = post_process_char_changes(raw.clone());
        assert_eq!(kept, raw);
    }

    #[test]
    fn string_diff_basic() {
        let changes = string_diff("hello world", "hello word", false);
        assert_eq!(changes, vec![DiffChange::new(9, 1, 9, 0)]);
    }

    #[test]
    fn trailing_blanks_spans() {
        assert_eq!(trailing_blanks("ab  "), "  ");
        assert_eq!(trailing_blanks("ab"), "");
        assert_eq!(trailing_blanks(" \t"), " \t");
    }

    #[test]
    fn budget_zero_is_unlimited() {
        let budget = TimeBudget::new(0);
        assert!(budget.can_continue());
        // Capping an unbounded budget must not introduce a limit.
        assert_eq!(budget.capped(MAX_CHAR_DIFF_RUNTIME_MS).limit, None);
    }

    #[test]
    fn budget_caps_take_the_minimum() {
        let budget = TimeBudget::new(100);
        assert_eq!(
            budget.capped(MAX_CHAR_DIFF_RUNTIME_MS).limit,
            Some(Duration::from_millis(100))
        );
        let budget = TimeBudget::new(60_000);
        assert_eq!(
            budget.capped(MAX_CHAR_DIFF_RUNTIME_MS).limit,
            Some(Duration::from_millis(MAX_CHAR_DIFF_RUNTIME_MS))
        );
    }
}
