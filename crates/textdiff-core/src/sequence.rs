//! Sequence adapters feeding the LCS engine.
//!
//! The engine compares abstract items (64-bit values). A [`LineSequence`]
//! produces one item per line (a hash of the compared span), a
//! [`CharSequence`] one item per character (its code point). Line items
//! carry their true content so that hash collisions are never mistaken
//! for equality.

/// An ordered, immutable list of comparable items.
///
/// Two items are equal iff their element values match AND, when both
/// sides expose real content via [`element_str`](Self::element_str),
/// the content matches too.
pub trait DiffSequence {
    /// The comparable items, one per sequence position.
    fn elements(&self) -> &[u64];

    /// The content backing an item, when the items are hashes of strings.
    /// Sequences whose items are injective (character codes) return `None`.
    fn element_str(&self, _index: usize) -> Option<&str> {
        None
    }
}

/// Compute a hash for a line (used for fast comparison).
/// DJB2a (xor variant).
pub(crate) fn line_hash(line: &str) -> u64 {
    let mut hash: u64 = 5381;
    for b in line.bytes() {
        hash = hash.wrapping_mul(33) ^ (b as u64);
    }
    hash
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// 1-based column of the first non-blank character; 1 for an all-blank line.
/// Blank means space or tab.
pub(crate) fn first_non_blank_column(line: &str) -> u32 {
    // Leading blanks are ASCII, so the byte offset equals the char offset.
    match line.bytes().position(|b| !is_blank(b)) {
        Some(i) => i as u32 + 1,
        None => 1,
    }
}

/// 1-based column just past the last non-blank character; 1 for an
/// all-blank line.
pub(crate) fn last_non_blank_column(line: &str) -> u32 {
    let trimmed = line.trim_end_matches([' ', '\t']);
    if trimmed.is_empty() {
        1
    } else {
        trimmed.chars().count() as u32 + 1
    }
}

/// Byte range of the span between the first and last non-blank character.
/// Empty range for an all-blank line.
fn trimmed_byte_range(line: &str) -> (usize, usize) {
    match line.bytes().position(|b| !is_blank(b)) {
        Some(start) => {
            let end = line.trim_end_matches([' ', '\t']).len();
            (start, end)
        }
        None => (0, 0),
    }
}

/// A sequence with one item per line.
///
/// When constructed with `ignore_trim_whitespace`, the compared span of
/// each line excludes leading and trailing blanks, so lines differing
/// only in edge whitespace hash (and compare) equal.
pub struct LineSequence<'a> {
    lines: &'a [&'a str],
    trimmed_ranges: Vec<(usize, usize)>,
    hashes: Vec<u64>,
    ignore_trim_whitespace: bool,
}

impl<'a> LineSequence<'a> {
    pub fn new(lines: &'a [&'a str], ignore_trim_whitespace: bool) -> Self {
        let trimmed_ranges: Vec<(usize, usize)> =
            lines.iter().map(|line| trimmed_byte_range(line)).collect();
        let hashes = lines
            .iter()
            .zip(trimmed_ranges.iter())
            .map(|(line, &(start, end))| {
                if ignore_trim_whitespace {
                    line_hash(&line[start..end])
                } else {
                    line_hash(line)
                }
            })
            .collect();
        Self {
            lines,
            trimmed_ranges,
            hashes,
            ignore_trim_whitespace,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Derive a character sequence from the inclusive line index range
    /// `[start_line_index, end_line_index]`, annotated so that every
    /// character maps back to its (line, column) coordinate.
    pub fn create_char_sequence(
        &self,
        ignore_trim_whitespace: bool,
        start_line_index: usize,
        end_line_index: usize,
    ) -> CharSequence {
        let mut codes = Vec::new();
        let mut line_numbers = Vec::new();
        let mut columns = Vec::new();
        for index in start_line_index..=end_line_index {
            let line = self.lines[index];
            let (start_column, end_column) = if ignore_trim_whitespace {
                (first_non_blank_column(line), last_non_blank_column(line))
            } else {
                (1, line.chars().count() as u32 + 1)
            };
            for (i, ch) in line.chars().enumerate() {
                let column = i as u32 + 1;
                if column < start_column || column >= end_column {
                    continue;
                }
                codes.push(ch as u64);
                line_numbers.push(index as u32 + 1);
                columns.push(column);
            }
        }
        CharSequence {
            codes,
            line_numbers,
            columns,
        }
    }
}

impl DiffSequence for LineSequence<'_> {
    fn elements(&self) -> &[u64] {
        &self.hashes
    }

    fn element_str(&self, index: usize) -> Option<&str> {
        let line = self.lines[index];
        if self.ignore_trim_whitespace {
            let (start, end) = self.trimmed_ranges[index];
            Some(&line[start..end])
        } else {
            Some(line)
        }
    }
}

/// A sequence with one item per character, each annotated with the
/// (line, column) coordinate it came from.
pub struct CharSequence {
    codes: Vec<u64>,
    line_numbers: Vec<u32>,
    columns: Vec<u32>,
}

impl CharSequence {
    /// Wrap a single string; coordinates are line 1, columns 1-based.
    pub fn from_str(text: &str) -> Self {
        let mut codes = Vec::new();
        let mut line_numbers = Vec::new();
        let mut columns = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            codes.push(ch as u64);
            line_numbers.push(1);
            columns.push(i as u32 + 1);
        }
        Self {
            codes,
            line_numbers,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn start_line_number(&self, index: usize) -> u32 {
        self.line_numbers[index]
    }

    pub fn start_column(&self, index: usize) -> u32 {
        self.columns[index]
    }

    pub fn end_line_number(&self, index: usize) -> u32 {
        self.line_numbers[index]
    }

    pub fn end_column(&self, index: usize) -> u32 {
        self.columns[index] + 1
    }
}

impl DiffSequence for CharSequence {
    fn elements(&self) -> &[u64] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_columns() {
        assert_eq!(first_non_blank_column("  a  "), 3);
        assert_eq!(last_non_blank_column("  a  "), 4);
        assert_eq!(first_non_blank_column("a"), 1);
        assert_eq!(last_non_blank_column("a"), 2);
        assert_eq!(first_non_blank_column("   "), 1);
        assert_eq!(last_non_blank_column("   "), 1);
        assert_eq!(first_non_blank_column(""), 1);
        assert_eq!(last_non_blank_column(""), 1);
        assert_eq!(first_non_blank_column("\tx"), 2);
    }

    #[test]
    fn line_hash_deterministic() {
        assert_eq!(line_hash("hello"), line_hash("hello"));
        assert_ne!(line_hash("hello"), line_hash("world"));
    }

    #[test]
    fn trimmed_lines_hash_equal() {
        let a = ["  fn main()  "];
        let b = ["fn main()"];
        let sa = LineSequence::new(&a, true);
        let sb = LineSequence::new(&b, true);
        assert_eq!(sa.elements()[0], sb.elements()[0]);
        assert_eq!(sa.element_str(0), sb.element_str(0));
    }

    #[test]
    fn raw_lines_hash_differ() {
        let a = ["  fn main()  "];
        let b = ["fn main()"];
        let sa = LineSequence::new(&a, false);
        let sb = LineSequence::new(&b, false);
        assert_ne!(sa.elements()[0], sb.elements()[0]);
    }

    #[test]
    fn all_blank_lines_compare_equal_when_trimmed() {
        let a = ["   "];
        let b = ["\t"];
        let sa = LineSequence::new(&a, true);
        let sb = LineSequence::new(&b, true);
        assert_eq!(sa.elements()[0], sb.elements()[0]);
        assert_eq!(sa.element_str(0), Some(""));
    }

    #[test]
    fn char_sequence_coordinates() {
        let lines = ["ab", "cd"];
        let seq = LineSequence::new(&lines, false);
        let chars = seq.create_char_sequence(false, 0, 1);
        assert_eq!(chars.len(), 4);
        assert_eq!(chars.elements(), &['a' as u64, 'b' as u64, 'c' as u64, 'd' as u64]);
        assert_eq!(chars.start_line_number(0), 1);
        assert_eq!(chars.start_column(1), 2);
        assert_eq!(chars.end_column(1), 3);
        assert_eq!(chars.start_line_number(2), 2);
        assert_eq!(chars.start_column(2), 1);
    }

    #[test]
    fn char_sequence_trims_edge_whitespace() {
        let lines = ["  ab "];
        let seq = LineSequence::new(&lines, true);
        let chars = seq.create_char_sequence(true, 0, 0);
        assert_eq!(chars.elements(), &['a' as u64, 'b' as u64]);
        assert_eq!(chars.start_column(0), 3);
        assert_eq!(chars.start_column(1), 4);
    }

    #[test]
    fn char_sequence_from_str() {
        let chars = CharSequence::from_str("héllo");
        assert_eq!(chars.len(), 5);
        assert_eq!(chars.elements()[1], 'é' as u64);
        assert_eq!(chars.start_column(4), 5);
        assert_eq!(chars.start_line_number(4), 1);
    }
}
