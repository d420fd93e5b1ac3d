use proptest::prelude::*;
use textdiff_core::{compute_diff, string_diff, DiffChange, DiffOptions};

/// Reference edit distance via the O(M*N) LCS table: the minimal number
/// of inserted plus deleted items is `m + n - 2 * lcs`.
fn reference_edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            table[i + 1][j + 1] = if a[i] == b[j] {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }
    a.len() + b.len() - 2 * table[a.len()][b.len()]
}

fn apply_changes(original: &str, modified: &str, changes: &[DiffChange]) -> String {
    let original: Vec<char> = original.chars().collect();
    let modified: Vec<char> = modified.chars().collect();
    let mut result = String::new();
    let mut position = 0usize;
    for change in changes {
        result.extend(&original[position..change.original_start]);
        result.extend(&modified[change.modified_start..change.modified_end()]);
        position = change.original_end();
    }
    result.extend(&original[position..]);
    result
}

fn assert_well_formed(changes: &[DiffChange]) {
    for change in changes {
        assert!(
            change.original_length > 0 || change.modified_length > 0,
            "change with both lengths zero: {change:?}"
        );
    }
    for pair in changes.windows(2) {
        assert!(
            pair[0].original_end() <= pair[1].original_start,
            "changes overlap on the original side: {pair:?}"
        );
        assert!(
            pair[0].modified_end() <= pair[1].modified_start,
            "changes overlap on the modified side: {pair:?}"
        );
    }
}

proptest! {
    #[test]
    fn string_diff_round_trips(a in "[abc]{0,24}", b in "[abc]{0,24}") {
        for pretty in [false, true] {
            let changes = string_diff(&a, &b, pretty);
            assert_well_formed(&changes);
            prop_assert_eq!(apply_changes(&a, &b, &changes), b.clone());
        }
    }

    #[test]
    fn string_diff_is_minimal(a in "[ab]{0,16}", b in "[ab]{0,16}") {
        // Low-entropy strings maximize ambiguous alignments. Prettifying
        // must not change the total either.
        let expected = reference_edit_distance(&a, &b);
        for pretty in [false, true] {
            let changes = string_diff(&a, &b, pretty);
            let total: usize = changes
                .iter()
                .map(|c| c.original_length + c.modified_length)
                .sum();
            prop_assert_eq!(total, expected);
        }
    }

    #[test]
    fn identity_diff_is_empty(a in "[abc ]{0,32}") {
        prop_assert!(string_diff(&a, &a, false).is_empty());
        prop_assert!(string_diff(&a, &a, true).is_empty());
    }

    #[test]
    fn line_diff_round_trips(
        original in prop::collection::vec("[ab]{0,3}", 1..12),
        modified in prop::collection::vec("[ab]{0,3}", 1..12),
    ) {
        let original: Vec<&str> = original.iter().map(String::as_str).collect();
        let modified: Vec<&str> = modified.iter().map(String::as_str).collect();
        let options = DiffOptions {
            should_compute_char_changes: false,
            ..DiffOptions::default()
        };
        let result = compute_diff(&original, &modified, &options).unwrap();
        prop_assert!(!result.quit_early);

        let mut reconstructed: Vec<&str> = Vec::new();
        let mut position = 0usize;
        for change in &result.changes {
            let (original_start, original_end) = if change.original_end_line_number == 0 {
                let at = change.original_start_line_number as usize;
                (at, at)
            } else {
                (
                    change.original_start_line_number as usize - 1,
                    change.original_end_line_number as usize,
                )
            };
            let (modified_start, modified_end) = if change.modified_end_line_number == 0 {
                let at = change.modified_start_line_number as usize;
                (at, at)
            } else {
                (
                    change.modified_start_line_number as usize - 1,
                    change.modified_end_line_number as usize,
                )
            };
            reconstructed.extend_from_slice(&original[position..original_start]);
            reconstructed.extend_from_slice(&modified[modified_start..modified_end]);
            position = original_end;
        }
        reconstructed.extend_from_slice(&original[position..]);
        prop_assert_eq!(reconstructed, modified);
    }

    #[test]
    fn line_diff_ignoring_whitespace_sees_through_indentation(
        lines in prop::collection::vec("[ab]{1,3}", 1..8),
        indent in prop::collection::vec(" {0,3}", 1..8),
    ) {
        // Reindenting every line produces only whitespace-only changes:
        // each reported change has equal line spans on both sides.
        let original: Vec<&str> = lines.iter().map(String::as_str).collect();
        let reindented: Vec<String> = lines
            .iter()
            .zip(indent.iter().cycle())
            .map(|(line, pad)| format!("{pad}{line}"))
            .collect();
        let reindented: Vec<&str> = reindented.iter().map(String::as_str).collect();
        let options = DiffOptions {
            should_ignore_trim_whitespace: true,
            ..DiffOptions::default()
        };
        let result = compute_diff(&original, &reindented, &options).unwrap();
        for change in &result.changes {
            prop_assert!(change.original_end_line_number != 0);
            prop_assert!(change.modified_end_line_number != 0);
            prop_assert_eq!(
                change.original_start_line_number,
                change.modified_start_line_number
            );
            prop_assert_eq!(
                change.original_end_line_number,
                change.modified_end_line_number
            );
        }
    }
}
