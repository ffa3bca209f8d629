//! Benchmarks for yunque engine operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yunque::core::builder::Builder;
use yunque::core::parser::parse_str;
use yunque::core::vars::VarStore;

fn bench_expand(c: &mut Criterion) {
    let mut vars = VarStore::new();
    for i in 0..32 {
        vars.set(&format!("VAR{i}"), "value").unwrap();
    }

    let mut group = c.benchmark_group("expand");
    for refs in [1, 8, 32] {
        let text: String = (0..refs)
            .map(|i| format!("$(VAR{i}) "))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(refs), &text, |b, text| {
            b.iter(|| {
                let out = vars.expand(black_box(text)).unwrap();
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for rules in [10, 100, 1000] {
        let mut text = String::from("CC = cc\nCFLAGS = -O2 -Wall\n");
        for i in 0..rules {
            text.push_str(&format!("obj{i}.o: src{i}.c\n\t$(CC) $(CFLAGS) -c $<\n"));
        }
        group.bench_with_input(BenchmarkId::from_parameter(rules), &text, |b, text| {
            b.iter(|| {
                let makefile = parse_str(black_box(text)).unwrap();
                black_box(makefile);
            });
        });
    }
    group.finish();
}

fn bench_classify_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_chain");
    for depth in [10, 100] {
        let mut text = String::new();
        for i in 0..depth {
            text.push_str(&format!("link{i}: link{}\n", i + 1));
        }
        text.push_str(&format!("link{depth}:\n"));
        let makefile = parse_str(&text).unwrap();
        let head = makefile.rules.find("link0").unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            let builder = Builder::new(&makefile);
            b.iter(|| {
                let disposition = builder.classify(black_box(head)).unwrap();
                black_box(disposition);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expand, bench_parse, bench_classify_chain);
criterion_main!(benches);
