#![allow(dead_code)]
use std::path::Path;

use simplelang::ast::Program;
use simplelang::{lexer, parser};
use test_support::bench_cases;

/// `(label, source)` for every fixture case flagged for benchmarking.
pub fn workloads() -> Vec<(String, String)> {
    let cases = bench_cases(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"));
    cases
        .into_iter()
        .map(|case| (case.spec.bench.tags.join("_"), case.source))
        .collect()
}

pub fn load_program(label: &str, source: &str) -> Program {
    let parsed = parser::parse_tokens(lexer::tokenize(source));
    if let Some(err) = parsed.error {
        panic!("parse {label}: {err}");
    }
    parsed.program
}
