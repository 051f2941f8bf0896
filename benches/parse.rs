use std::fs::File;
use std::io::{Cursor, Read};

use criterion::{criterion_group, criterion_main, Criterion};
use pdf_graph::Document;

fn bench_parse_example(c: &mut Criterion) {
    let mut buffer = Vec::new();
    File::open("assets/example.pdf").unwrap().read_to_end(&mut buffer).unwrap();

    c.bench_function("parse_example", |b| {
        b.iter(|| {
            Document::load_from(Cursor::new(&buffer)).unwrap();
        })
    });
}

criterion_group!(benches, bench_parse_example);
criterion_main!(benches);
