use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};

use textdiff_core::{compute_diff, DiffOptions, LineChange, LineDiffResult};

#[derive(Parser)]
#[command(
    name = "textdiff",
    about = "Compare two files line by line",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// The original file
    original: PathBuf,

    /// The modified file
    modified: PathBuf,

    /// Annotate each change with the character spans that differ
    #[arg(long)]
    char_changes: bool,

    /// Compare lines ignoring leading and trailing whitespace;
    /// whitespace-only differences are still reported separately
    #[arg(short = 'w', long)]
    ignore_trim_whitespace: bool,

    /// Keep the raw change positions instead of aligning them to blank
    /// lines and block boundaries
    #[arg(long)]
    no_pretty: bool,

    /// Report every character change individually instead of merging
    /// near-adjacent ones
    #[arg(long)]
    no_post_process: bool,

    /// Give up after this many milliseconds and report an approximate
    /// result (0 means no limit)
    #[arg(long, value_name = "MS", default_value_t = 0)]
    max_time: u64,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(2),
            }
        }
    };

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("textdiff: {e:#}");
            process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let original_text = read_file(&cli.original)?;
    let modified_text = read_file(&cli.modified)?;
    let original_lines = split_lines(&original_text);
    let modified_lines = split_lines(&modified_text);

    let options = DiffOptions {
        should_compute_char_changes: cli.char_changes,
        should_post_process_char_changes: !cli.no_post_process,
        should_ignore_trim_whitespace: cli.ignore_trim_whitespace,
        should_make_pretty_diff: !cli.no_pretty,
        max_computation_time_ms: cli.max_time,
    };
    let result = compute_diff(&original_lines, &modified_lines, &options)
        .context("diff computation failed")?;

    if result.quit_early {
        eprintln!("textdiff: time limit exceeded, result is approximate");
    }

    print!("{}", render(&result, &original_lines, &modified_lines));
    Ok(if result.changes.is_empty() { 0 } else { 1 })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))
}

/// Split a document into lines without terminators. An empty document
/// still has one empty line.
fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Render changes in the classic normal diff format, optionally followed
/// by character span annotations.
fn render(result: &LineDiffResult, original: &[&str], modified: &[&str]) -> String {
    let mut out = String::new();
    for change in &result.changes {
        out.push_str(&render_change(change, original, modified));
    }
    out
}

fn render_change(change: &LineChange, original: &[&str], modified: &[&str]) -> String {
    let mut out = String::new();

    let deletion = change.modified_end_line_number == 0;
    let insertion = change.original_end_line_number == 0;
    let letter = if insertion {
        'a'
    } else if deletion {
        'd'
    } else {
        'c'
    };
    out.push_str(&format!(
        "{}{}{}\n",
        format_range(
            change.original_start_line_number,
            change.original_end_line_number
        ),
        letter,
        format_range(
            change.modified_start_line_number,
            change.modified_end_line_number
        ),
    ));

    if !insertion {
        for number in change.original_start_line_number..=change.original_end_line_number {
            out.push_str("< ");
            out.push_str(original[number as usize - 1]);
            out.push('\n');
        }
    }
    if !insertion && !deletion {
        out.push_str("---\n");
    }
    if !deletion {
        for number in change.modified_start_line_number..=change.modified_end_line_number {
            out.push_str("> ");
            out.push_str(modified[number as usize - 1]);
            out.push('\n');
        }
    }

    if let Some(char_changes) = &change.char_changes {
        for c in char_changes {
            out.push_str(&format!(
                "~ {}:{}-{}:{} -> {}:{}-{}:{}\n",
                c.original_start_line_number,
                c.original_start_column,
                c.original_end_line_number,
                c.original_end_column,
                c.modified_start_line_number,
                c.modified_start_column,
                c.modified_end_line_number,
                c.modified_end_column,
            ));
        }
    }

    out
}

/// `"7"` for a single line, `"7,9"` for a span, and the preceding line
/// number alone for an empty side.
fn format_range(start: u32, end: u32) -> String {
    if end == 0 || start == end {
        start.to_string()
    } else {
        format!("{start},{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn splits_lines_and_keeps_empty_document() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn renders_normal_diff_format() {
        let original = ["a", "b", "c"];
        let modified = ["a", "x", "c"];
        let result = compute_diff(&original, &modified, &DiffOptions::default()).unwrap();
        let rendered = render(&result, &original, &modified);
        assert!(rendered.starts_with("2c2\n< b\n---\n> x\n"));
    }

    #[test]
    fn renders_insertion_with_preceding_line() {
        let original = ["a", "c"];
        let modified = ["a", "b", "c"];
        let options = DiffOptions {
            should_compute_char_changes: false,
            ..DiffOptions::default()
        };
        let result = compute_diff(&original, &modified, &options).unwrap();
        assert_eq!(render(&result, &original, &modified), "1a2\n> b\n");
    }

    #[test]
    fn renders_deletion_range() {
        let original = ["a", "b", "c", "d"];
        let modified = ["a", "d"];
        let options = DiffOptions {
            should_compute_char_changes: false,
            ..DiffOptions::default()
        };
        let result = compute_diff(&original, &modified, &options).unwrap();
        assert_eq!(render(&result, &original, &modified), "2,3d1\n< b\n< c\n");
    }

    #[test]
    fn format_ranges() {
        assert_eq!(format_range(2, 2), "2");
        assert_eq!(format_range(2, 4), "2,4");
        assert_eq!(format_range(3, 0), "3");
    }

    #[test]
    fn reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("left.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "hello").unwrap();
        assert_eq!(read_file(&path).unwrap(), "hello\n");
        assert!(read_file(&dir.path().join("missing.txt")).is_err());
    }
}
