//! Locator Operations Benchmarks
//!
//! Descriptor resolution, DOM query generation and store lookups.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagewright::prelude::*;

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let descriptors = vec![
        ("id", LocatorDescriptor::new(LocatorType::Id, "colorButton")),
        (
            "css",
            LocatorDescriptor::new(LocatorType::CssSelector, "input[value='radio2']"),
        ),
        ("link_text", LocatorDescriptor::new(LocatorType::LinkText, "Selenium")),
        ("xpath", LocatorDescriptor::new(LocatorType::XPath, "//div[@id='x']")),
        ("untyped", LocatorDescriptor::untyped("textInput")),
        (
            "unrecognized",
            LocatorDescriptor::new(LocatorType::Unrecognized, "slider"),
        ),
    ];

    for (name, descriptor) in descriptors {
        group.bench_with_input(BenchmarkId::from_parameter(name), &descriptor, |bench, d| {
            bench.iter(|| black_box(resolve(black_box(d))));
        });
    }

    group.finish();
}

fn bench_query_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_generation");

    let selectors = vec![
        ("id", Selector::id("dynamicSubhead")),
        ("css", Selector::css(".hover-dropdown")),
        ("link_text", Selector::LinkText("Playwright".to_string())),
        ("tag", Selector::TagName("body".to_string())),
    ];

    for (name, selector) in selectors {
        group.bench_with_input(BenchmarkId::from_parameter(name), &selector, |bench, s| {
            bench.iter(|| {
                black_box(s.to_query("doc"));
                black_box(s.to_count_query("doc"));
            });
        });
    }

    group.finish();
}

fn bench_store_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_lookup");
    let memory = StaticStore::demo_page();
    let sqlite = SqliteStore::open_memory().unwrap();
    let _ = sqlite.import(&memory).unwrap();

    group.bench_function("static", |bench| {
        bench.iter(|| black_box(memory.locator(black_box("progress_label")).unwrap()));
    });
    group.bench_function("sqlite", |bench| {
        bench.iter(|| black_box(sqlite.locator(black_box("progress_label")).unwrap()));
    });
    group.bench_function("expectation", |bench| {
        bench.iter(|| black_box(memory.expectation(black_box("meter_bar")).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_query_generation, bench_store_lookup);
criterion_main!(benches);
