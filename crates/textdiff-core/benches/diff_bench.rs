use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use textdiff_core::{compute_diff, string_diff, DiffOptions};

fn synthetic_lines(count: usize, changed_every: usize, tag: &str) -> Vec<String> {
    (0..count)
        .map(|i| {
            if changed_every > 0 && i % changed_every == 0 {
                format!("    let value_{i} = compute_{tag}({i});")
            } else {
                format!("    let value_{i} = compute({i});")
            }
        })
        .collect()
}

fn line_diff(c: &mut Criterion) {
    let original = synthetic_lines(2000, 0, "");
    let modified = synthetic_lines(2000, 50, "b");
    let original: Vec<&str> = original.iter().map(String::as_str).collect();
    let modified: Vec<&str> = modified.iter().map(String::as_str).collect();

    let mut group = c.benchmark_group("line_diff");
    group.throughput(Throughput::Elements(original.len() as u64));

    let line_only = DiffOptions {
        should_compute_char_changes: false,
        ..DiffOptions::default()
    };
    group.bench_function("sparse_edits_2000_lines", |b| {
        b.iter(|| compute_diff(black_box(&original), black_box(&modified), &line_only))
    });

    let with_chars = DiffOptions::default();
    group.bench_function("sparse_edits_2000_lines_char_refined", |b| {
        b.iter(|| compute_diff(black_box(&original), black_box(&modified), &with_chars))
    });

    group.finish();
}

fn char_diff(c: &mut Criterion) {
    let original = "the quick brown fox jumps over the lazy dog".repeat(8);
    let modified = original.replace("quick", "speedy").replace("lazy", "sleepy");

    let mut group = c.benchmark_group("char_diff");
    group.throughput(Throughput::Elements(original.chars().count() as u64));

    group.bench_function("scattered_word_edits", |b| {
        b.iter(|| string_diff(black_box(&original), black_box(&modified), false))
    });

    group.bench_function("scattered_word_edits_pretty", |b| {
        b.iter(|| string_diff(black_box(&original), black_box(&modified), true))
    });

    group.finish();
}

fn worst_case(c: &mut Criterion) {
    // Fully disjoint inputs force the search to its maximum depth.
    let original: String = ('a'..='z').cycle().take(400).collect();
    let modified: String = ('A'..='Z').cycle().take(400).collect();

    let mut group = c.benchmark_group("worst_case");
    group.bench_function("disjoint_400_chars", |b| {
        b.iter(|| string_diff(black_box(&original), black_box(&modified), false))
    });
    group.finish();
}

criterion_group!(benches, line_diff, char_diff, worst_case);
criterion_main!(benches);
