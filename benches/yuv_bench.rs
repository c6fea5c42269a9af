// YUV Benchmarks
// Performance benchmarks for the decode-to-present video path

use criterion::{criterion_group, criterion_main, Criterion};
use hypseus_video::display::{DisplayOptions, HeadlessWindowSystem};
use hypseus_video::video::TestFrame;
use hypseus_video::{DisplayContext, YuvFrameBuffer};
use std::hint::black_box;

/// Benchmark the decode-thread copy into the shared buffer
fn bench_yuv_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("yuv_update");
    let frame = TestFrame::color_bars(720, 480, 0);
    let (yp, up, vp) = frame.pitches();

    group.bench_function("720x480", |b| {
        let buffer = YuvFrameBuffer::new();
        buffer.setup(720, 480).unwrap();
        b.iter(|| {
            buffer
                .update(black_box(&frame.y), &frame.u, &frame.v, yp, up, vp)
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark a full presented frame: upload, convert and compose
fn bench_present_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("present_frame");
    group.sample_size(20); // Reduce sample size for composition benchmarks

    group.bench_function("720x480_to_640x480", |b| {
        let mut system = HeadlessWindowSystem::new();
        let mut context = DisplayContext::new(DisplayOptions::new(), 320, 240);
        context.open(&mut system).unwrap();
        context.setup_yuv(720, 480).unwrap();

        let frame = TestFrame::color_bars(720, 480, 0);
        let (yp, up, vp) = frame.pitches();

        b.iter(|| {
            context
                .update_yuv(&frame.y, &frame.u, &frame.v, yp, up, vp)
                .unwrap();
            black_box(context.present_frame().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_yuv_update, bench_present_frame);
criterion_main!(benches);
