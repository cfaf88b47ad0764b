//! Benchmarks for viewport and geofence math.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spaces_geo::{bounding_box, geo_circle, haversine_distance, Location};

fn bench_bounding_box(c: &mut Criterion) {
    let center = Location::new(52.5200, 13.4050);

    c.bench_function("bounding_box", |b| {
        b.iter(|| bounding_box(black_box(center), black_box(75.0), black_box(1.8)))
    });
}

fn bench_geo_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo_circle");
    let center = Location::new(52.5200, 13.4050);

    for steps in [16usize, 64, 256, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("steps", steps), steps, |b, &steps| {
            b.iter(|| geo_circle(black_box(center), black_box(100.0), steps))
        });
    }

    group.finish();
}

fn bench_haversine(c: &mut Criterion) {
    let berlin = Location::new(52.5200, 13.4050);
    let paris = Location::new(48.8566, 2.3522);

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&berlin), black_box(&paris)))
    });
}

criterion_group!(benches, bench_bounding_box, bench_geo_circle, bench_haversine);
criterion_main!(benches);
