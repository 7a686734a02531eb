//! Benchmark for framebuffer operations and frame encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trueno_points::color::Rgba;
use trueno_points::framebuffer::Framebuffer;
use trueno_points::output::{PngEncoder, TerminalEncoder};

fn framebuffer_clear_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("framebuffer_clear");

    for (width, height) in [(800, 600), (1920, 1080)] {
        let mut fb = Framebuffer::new(width, height).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    fb.clear(black_box(Rgba::rgb(240, 240, 240)));
                });
            },
        );
    }

    group.finish();
}

fn framebuffer_blend_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("framebuffer_blend");

    let mut fb = Framebuffer::new(800, 600).unwrap();
    fb.clear(Rgba::WHITE);

    // Grid tint
    let tint = Rgba::new(180, 180, 220, 120);

    group.bench_function("plot_translucent_800x600", |b| {
        b.iter(|| {
            for y in 0..600 {
                for x in 0..800 {
                    fb.plot(black_box(x), black_box(y), tint);
                }
            }
        });
    });

    group.finish();
}

fn frame_encode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode");

    let mut fb = Framebuffer::new(800, 600).unwrap();
    fb.clear(Rgba::rgb(240, 240, 240));
    fb.fill_rect(200, 150, 400, 300, Rgba::rgb(30, 144, 255));

    group.bench_function("png_800x600", |b| {
        b.iter(|| PngEncoder::to_bytes(black_box(&fb)).unwrap());
    });

    let terminal = TerminalEncoder::new();
    group.bench_function("terminal_half_block_800x600", |b| {
        b.iter(|| terminal.render(black_box(&fb)));
    });

    group.finish();
}

criterion_group!(
    benches,
    framebuffer_clear_benchmark,
    framebuffer_blend_benchmark,
    frame_encode_benchmark
);
criterion_main!(benches);
