// Preprocessing benchmark - resize + grayscale + contrast stretch to 28x28
//
// Run with: cargo bench --bench preprocessing_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use digit_recognition::{decode, preprocess, RawOutput};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

fn test_image(width: u32, height: u32) -> DynamicImage {
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            ((x + y) % 256) as u8,
            ((x * 2) % 256) as u8,
            ((y * 2) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

/// Preprocessing at typical capture resolutions
fn bench_preprocessing(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocessing");

    // 28x28 (no resize), camera thumbnail, VGA, 1080p
    let resolutions = vec![
        (28, 28, "28x28"),
        (160, 120, "160x120"),
        (640, 480, "640x480"),
        (1920, 1080, "1920x1080"),
    ];

    for (width, height, name) in resolutions {
        let image = test_image(width, height);
        group.bench_with_input(BenchmarkId::new("preprocess", name), &image, |b, img| {
            b.iter(|| {
                let tensor = preprocess(black_box(img), true);
                black_box(tensor);
            });
        });
    }

    group.finish();
}

/// Decoding both output layouts
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let quantized = RawOutput::Quantized(vec![3, 9, 250, 0, 1, 0, 7, 0, 2, 0]);
    let float = RawOutput::Float(vec![0.01, 0.02, 0.9, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01]);

    group.bench_function("quantized", |b| {
        b.iter(|| black_box(decode(black_box(&quantized))));
    });
    group.bench_function("float", |b| {
        b.iter(|| black_box(decode(black_box(&float))));
    });

    group.finish();
}

criterion_group!(benches, bench_preprocessing, bench_decode);
criterion_main!(benches);
