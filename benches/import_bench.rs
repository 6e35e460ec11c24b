use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;
use user_upload::gateway::{ExecuteError, Gateway, InsertError};
use user_upload::importer::Importer;
use user_upload::record::{normalize, ImportConfig, RawRow, UserRecord};
use user_upload::splitter::split;

/// Discards everything it is given
struct NullGateway;

impl Gateway for NullGateway {
    fn execute(&mut self, _sql: &str) -> Result<(), ExecuteError> {
        Ok(())
    }

    fn insert_user(&mut self, _record: &UserRecord) -> Result<(), InsertError> {
        Ok(())
    }
}

fn generate_rows(num_rows: usize) -> Vec<RawRow> {
    (0..num_rows)
        .map(|i| {
            let first = if i % 7 == 0 {
                format!("us#er{}", i)
            } else {
                "user".to_string()
            };
            let email = if i % 11 == 0 {
                format!("user{}@invalid", i)
            } else {
                format!("User{}@Example.com", i)
            };
            RawRow::new(i as u64 + 2, [first, format!("surname {}", i), email])
        })
        .collect()
}

fn generate_csv(num_rows: usize) -> String {
    let mut data = String::from("name,surname,email\n");
    for i in 0..num_rows {
        data.push_str(&format!("first{},last{},user{}@example.com\n", i, i, i));
    }
    data
}

fn generate_script(num_tables: usize) -> String {
    let mut script = String::from("-- generated schema\n/* header */;\n");
    for t in 0..num_tables {
        script.push_str(&format!(
            "DROP TABLE IF EXISTS table_{t};\nCREATE TABLE table_{t} (\n  id INT NOT NULL,\n  name VARCHAR(80),\n  UNIQUE (id)\n);\n"
        ));
    }
    script
}

fn bench_normalize(c: &mut Criterion) {
    let config = ImportConfig::new("bench.csv");
    let mut group = c.benchmark_group("normalize");

    for size in [1000, 10000] {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), &rows, |b, rows| {
            b.iter(|| {
                let accepted = rows
                    .iter()
                    .filter(|row| normalize(row, &config).is_accepted())
                    .count();
                black_box(accepted)
            })
        });
    }

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    for tables in [10, 1000] {
        let script = generate_script(tables);
        group.throughput(Throughput::Bytes(script.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("statements", format!("{}_tables", tables)),
            &script,
            |b, script| b.iter(|| black_box(split(script).count())),
        );
    }

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.csv");
    let data = generate_csv(10000);
    fs::write(&path, &data).unwrap();
    let config = ImportConfig::new(&path);

    let mut group = c.benchmark_group("import");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("null_gateway_10000_rows", |b| {
        b.iter(|| {
            let summary = Importer::new(&config)
                .run(&mut NullGateway, &mut std::io::sink())
                .unwrap();
            black_box(summary.inserted)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_split, bench_import);
criterion_main!(benches);
