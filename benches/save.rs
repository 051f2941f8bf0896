use std::fs::File;
use std::io::{Cursor, Read};

use criterion::{criterion_group, criterion_main, Criterion};
use pdf_graph::Document;

fn bench_save_full(c: &mut Criterion) {
    let mut buffer = Vec::new();
    File::open("assets/example.pdf").unwrap().read_to_end(&mut buffer).unwrap();

    c.bench_function("save_full", |b| {
        b.iter(|| {
            let mut doc = Document::load_from(Cursor::new(&buffer)).unwrap();
            let mut output = Vec::new();
            doc.save_to(&mut output).unwrap();
        })
    });
}

fn bench_save_incremental_no_changes(c: &mut Criterion) {
    let mut buffer = Vec::new();
    File::open("assets/example.pdf").unwrap().read_to_end(&mut buffer).unwrap();

    c.bench_function("save_incremental_no_changes", |b| {
        b.iter(|| {
            let mut doc = Document::load_from(Cursor::new(&buffer)).unwrap();
            let mut output = Vec::new();
            doc.save_incremental(&buffer, &mut output).unwrap();
        })
    });
}

criterion_group!(benches, bench_save_full, bench_save_incremental_no_changes);
criterion_main!(benches);
