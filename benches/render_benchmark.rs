//! Benchmark for whole-frame composition.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_points::prelude::*;
use trueno_points::render::{draw_filled_circle, draw_line};

fn compose_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_frame");
    let composer = FrameComposer::default();
    let viewport = Viewport::new(800, 600);

    for step in [0.5, 0.2, 0.1] {
        let grid = SampleGrid::new(-5.0, 5.0, -5.0, 5.0, step).unwrap();
        let cloud = sample(&FunctionEvaluator::new("sin(x) * cos(y)"), &grid);

        let mut projection = Projection::default();
        projection.set_rotation(0.5, 0.7, 0.0);

        group.bench_with_input(BenchmarkId::from_parameter(cloud.len()), &cloud, |b, cloud| {
            b.iter(|| {
                composer
                    .compose(black_box(cloud), &projection, viewport, Some((400.0, 300.0)))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn primitive_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let mut fb = Framebuffer::new(800, 600).unwrap();
    let color = Rgba::rgb(30, 144, 255);

    group.bench_function("line_diagonal", |b| {
        b.iter(|| draw_line(&mut fb, black_box(0), black_box(0), 799, 599, color));
    });

    group.bench_function("line_clipped", |b| {
        b.iter(|| draw_line(&mut fb, black_box(-5000), black_box(-300), 5000, 900, color));
    });

    group.bench_function("filled_circle_r12", |b| {
        b.iter(|| draw_filled_circle(&mut fb, black_box(400), black_box(300), 12, color));
    });

    group.finish();
}

criterion_group!(benches, compose_benchmark, primitive_benchmark);
criterion_main!(benches);
