use criterion::{criterion_group, criterion_main, Criterion};
use parser::Parser;

pub fn criterion_benchmark(c: &mut Criterion) {
    let source = (0..500).map(|i| format!("(-{i} + 2.5) * !(\"s\" == nil) / {i}")).collect::<Vec<_>>().join(" >= ");

    c.bench_function("scan", |b| b.iter(|| scanner::scan(&source)));

    let tokens = scanner::scan(&source);
    c.bench_function("parse", |b| b.iter(|| Parser::new(&tokens).parse().unwrap()));

    let script = "1 + 2 * 3 - 4 / (5 + 6);\n".repeat(500);
    c.bench_function("scan and parse script", |b| {
        b.iter(|| {
            let tokens = scanner::scan(&script);
            Parser::new(&tokens).parse_all().unwrap().len()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
