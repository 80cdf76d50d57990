//! Parse/serialize throughput on synthetic shards.
//!
//! Run with: `cargo bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dxi::index::parser::parse_shard_source;
use dxi::index::types::{Occurrence, SearchRecord, Target};
use dxi::index::writer::serialize_shard;
use dxi::query::{QueryExecutor, parse_query};

/// Build a shard of `count` records with a couple of overloads each
fn synthetic_records(count: usize) -> Vec<SearchRecord> {
    (0..count)
        .map(|i| {
            let name = format!("make_symbol_{}", i);
            let mut record = SearchRecord::new(format!("make_5fsymbol_5f{}", i), &name);
            for overload in 0..3 {
                record.occurrences.push(Occurrence::new(
                    Target::new(
                        format!("header__{}_8hpp.html", i),
                        format!("a{:08x}{:024x}", i, overload),
                    ),
                    format!("ns::{}(const char *str, std::error_code &ec) noexcept", name),
                ));
            }
            record
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let source = serialize_shard(&synthetic_records(1000));

    c.bench_function("parse_1k_records", |b| {
        b.iter(|| parse_shard_source(black_box(&source)).unwrap())
    });
}

fn bench_serialize(c: &mut Criterion) {
    let records = synthetic_records(1000);

    c.bench_function("serialize_1k_records", |b| {
        b.iter(|| serialize_shard(black_box(&records)))
    });
}

fn bench_query(c: &mut Criterion) {
    let mut index = dxi::index::types::SearchIndex::default();
    let mut shard = dxi::index::types::Shard::new(dxi::index::types::Section::Functions, "0");
    shard.records = synthetic_records(5000);
    index.shards.push(shard);

    let query = parse_query("make_symbol_42");

    c.bench_function("query_5k_records", |b| {
        b.iter(|| {
            let executor = QueryExecutor::new(&index);
            executor.execute(black_box(&query)).unwrap()
        })
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_query);
criterion_main!(benches);
