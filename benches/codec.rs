use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sdi_codec::{
    CanonicalVersions, Column, Dictionary, Index, IndexElement, SdiCodec, SdiOptions, Table,
};

fn table_with_columns(count: u32) -> Table {
    let mut table = Table::new("bench", "ndbcluster");
    table.options = "avg_row_length=0;key_block_size=0;pack_record=1;"
        .parse()
        .unwrap_or_default();
    for i in 0..count {
        let mut column = Column::new(format!("c{}", i), 4, i + 1);
        column.column_type_utf8 = "int".to_string();
        table.columns.push(column);
    }
    let mut primary = Index::new("PRIMARY", 1, 1);
    primary.elements.push(IndexElement {
        ordinal_position: 1,
        length: 4,
        order: 2,
        hidden: false,
        column_opx: 0,
    });
    table.indexes.push(primary);
    table
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let checked = SdiCodec::new(SdiOptions::new().with_invariant_checks(true));
    let unchecked = SdiCodec::new(SdiOptions::new().with_invariant_checks(false));

    for size in [4, 32, 256].iter() {
        let table = table_with_columns(*size);
        group.bench_with_input(BenchmarkId::new("checked", size), size, |b, _| {
            b.iter(|| checked.serialize(black_box(&table), "test"))
        });
        group.bench_with_input(BenchmarkId::new("unchecked", size), size, |b, _| {
            b.iter(|| unchecked.serialize(black_box(&table), "test"))
        });
    }
    group.finish();
}

fn benchmark_deserialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize");
    let codec = SdiCodec::default();
    let old = Dictionary::with_versions(CanonicalVersions::new(80016, 80017));

    for size in [4, 32, 256].iter() {
        let table = table_with_columns(*size);
        let current = codec.serialize(&table, "test").unwrap_or_default();
        let skewed = old.serialize(&table, "test").unwrap_or_default();

        group.bench_with_input(BenchmarkId::new("matching", size), size, |b, _| {
            b.iter(|| codec.deserialize(black_box(current.as_bytes())))
        });
        group.bench_with_input(BenchmarkId::new("reconciled", size), size, |b, _| {
            b.iter(|| codec.deserialize(black_box(skewed.as_bytes())))
        });
    }
    group.finish();
}

fn benchmark_prettify(c: &mut Criterion) {
    let codec = SdiCodec::default();
    let sdi = codec
        .serialize(&table_with_columns(32), "test")
        .unwrap_or_default();

    c.bench_function("prettify_32_columns", |b| {
        b.iter(|| codec.prettify(black_box(sdi.as_bytes())))
    });
}

criterion_group!(
    benches,
    benchmark_serialize,
    benchmark_deserialize,
    benchmark_prettify
);
criterion_main!(benches);
