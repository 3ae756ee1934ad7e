//! Benchmarks pour la traduction MapInfo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geo::{point, Geometry, MultiPoint};
use ogr_drivers::mitab::{map_field_type, AccessMode, FileKind, MapInfoFile, MemoryStore};
use ogr_drivers::{Feature, FieldDefn, FieldType, FieldValue};

fn bench_field_types(c: &mut Criterion) {
    let fields = [
        FieldDefn::new("id", FieldType::Integer),
        FieldDefn::new("surface", FieldType::Real),
        FieldDefn::new("montant", FieldType::Real).with_width(30).with_precision(20),
        FieldDefn::new("nom", FieldType::String).with_width(500),
        FieldDefn::new("maj", FieldType::DateTime),
    ];

    c.bench_function("map_field_type", |b| {
        b.iter(|| {
            for field in &fields {
                black_box(map_field_type(black_box(field)).unwrap());
            }
        })
    });
}

fn bench_multipoint_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("multipoint_decomposition");

    for size in [10usize, 100, 1000] {
        let points: Vec<_> = (0..size)
            .map(|i| point!(x: i as f64, y: (i * 2) as f64))
            .collect();
        let feature = Feature::new(vec![FieldValue::String("multi".to_string())])
            .with_geometry(Geometry::MultiPoint(MultiPoint::new(points)));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &feature, |b, feature| {
            b.iter(|| {
                let mut file = MapInfoFile::new(FileKind::Tab, AccessMode::Write, MemoryStore::new());
                file.create_field(&FieldDefn::new("nom", FieldType::String), false)
                    .unwrap();
                let mut feature = feature.clone();
                black_box(file.create_feature(&mut feature).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_types, bench_multipoint_decomposition);
criterion_main!(benches);
