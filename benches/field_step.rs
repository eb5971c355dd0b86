//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use motefield::{DrawList, MoteField, PixelSurface, Vec2};

const DENSITIES: [f32; 3] = [1.0, 5.0, 10.0];

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");

    for density in DENSITIES {
        group.bench_with_input(BenchmarkId::new("drift", density), &density, |b, &density| {
            let mut field = MoteField::seeded(1280, 720, density, 1);
            b.iter(|| field.step(black_box(None)))
        });

        group.bench_with_input(BenchmarkId::new("pointer", density), &density, |b, &density| {
            let mut field = MoteField::seeded(1280, 720, density, 1);
            let pointer = Some(Vec2::new(640.0, 360.0));
            b.iter(|| field.step(black_box(pointer)))
        });
    }

    group.finish();
}

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");

    for density in DENSITIES {
        let field = MoteField::seeded(1280, 720, density, 1);
        group.bench_with_input(BenchmarkId::from_parameter(density), &field, |b, field| {
            b.iter(|| black_box(field.connections()))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for density in DENSITIES {
        let field = MoteField::seeded(1280, 720, density, 1);

        group.bench_with_input(BenchmarkId::new("draw_list", density), &field, |b, field| {
            let mut surface = DrawList::new(1280, 720);
            b.iter(|| field.render(black_box(&mut surface)))
        });

        group.bench_with_input(BenchmarkId::new("pixels", density), &field, |b, field| {
            let mut surface = PixelSurface::new(1280, 720);
            b.iter(|| field.render(black_box(&mut surface)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_connections, bench_render);
criterion_main!(benches);
