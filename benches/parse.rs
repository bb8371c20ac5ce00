use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ignix_lite::*;

fn bench_parse_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.bench_function("parse_line_1k", |b| {
        let lines: Vec<String> = (0..1000)
            .map(|i| match i % 4 {
                0 => format!("SET key{} val{}", i, i),
                1 => format!("ZADD jobs {} job{}", i, i),
                2 => format!("GEORADIUS g 15 37 {} km", i),
                _ => format!("SINTER a{} b{} c{}", i, i, i),
            })
            .collect();
        b.iter(|| {
            let mut parsed = 0;
            for line in &lines {
                if parse_line(line).is_ok() {
                    parsed += 1;
                }
            }
            black_box(parsed);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parse_lines);
criterion_main!(benches);
