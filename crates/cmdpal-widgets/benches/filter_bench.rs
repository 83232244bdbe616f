//! Benchmarks for scoring, filtering, and sorting.
//!
//! Run with: `cargo bench --package cmdpal-widgets --bench filter_bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cmdpal_core::command_score;
use cmdpal_widgets::command::{Command, CommandConfig, GroupProps, ItemProps};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "open", "file", "settings", "theme", "toggle", "sidebar", "search", "project", "recent",
    "terminal", "split", "editor", "close", "window", "reload", "format", "document", "git",
];

fn label(i: usize) -> String {
    let a = WORDS[i % WORDS.len()];
    let b = WORDS[(i / WORDS.len()) % WORDS.len()];
    format!("{a} {b} {i}")
}

fn bench_command_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_score");
    let keywords = vec!["preferences".to_owned(), "config".to_owned()];
    for search in ["o", "ofi", "toggle side", "zzz"] {
        group.bench_with_input(BenchmarkId::new("search", search), &search, |b, search| {
            b.iter(|| {
                black_box(command_score(
                    black_box("Toggle Sidebar Visibility"),
                    search,
                    &keywords,
                ))
            });
        });
    }
    group.finish();
}

fn bench_set_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_search");
    for size in [100usize, 1_000] {
        let cmd = Command::new(CommandConfig::new());
        let groups: Vec<_> = (0..10)
            .map(|g| cmd.group(GroupProps::new().heading(format!("Group {g}"))))
            .collect();
        let _items: Vec<_> = (0..size)
            .map(|i| groups[i % groups.len()].item(ItemProps::new().value(label(i))))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("items", size), &size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                cmd.store().set_search(if flip { "ofi" } else { "set" });
                black_box(cmd.store().snapshot().filtered.count)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_command_score, bench_set_search);
criterion_main!(benches);
