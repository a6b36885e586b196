mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use simplelang::Compiler;
use simplelang::codegen;

fn bench_codegen(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let program = common::load_program(&label, &source);

        c.bench_function(&format!("codegen_generate_{label}"), |b| {
            b.iter(|| {
                let out = codegen::generate(black_box(&program)).expect("generate");
                black_box(out);
            })
        });

        c.bench_function(&format!("codegen_full_pipeline_{label}"), |b| {
            let compiler = Compiler::new();
            b.iter(|| {
                let out = compiler.compile(black_box(&source)).expect("compile");
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_codegen);
criterion_main!(benches);
