mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use simplelang::{lexer, parser};

fn bench_frontend(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let tokens = lexer::tokenize(&source);

        c.bench_function(&format!("frontend_tokenize_{label}"), |b| {
            b.iter(|| {
                let out = lexer::tokenize(black_box(&source));
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_parse_only_{label}"), |b| {
            b.iter(|| {
                let out = parser::parse_tokens(black_box(tokens.clone()));
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_tokenize_parse_{label}"), |b| {
            b.iter(|| {
                let tokens = lexer::tokenize(black_box(&source));
                let out = parser::parse_tokens(tokens);
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
