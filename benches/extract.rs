use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image_to_palette_wasm::{PaletteExtractor, PixelSample};
use palette::Srgb;

fn gradient(width: u32, height: u32) -> Vec<PixelSample> {
    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Srgb::new(
                    (x * 255 / width) as u8,
                    (y * 255 / height) as u8,
                    ((x + y) % 256) as u8,
                )
            })
        })
        .collect()
}

fn benchmark_extract(c: &mut Criterion) {
    let pixels = gradient(640, 480);
    let extractor = PaletteExtractor::default();

    c.bench_function("extract_640x480", |b| {
        b.iter(|| extractor.extract(black_box(&pixels).iter().copied()))
    });

    #[cfg(feature = "parallel")]
    c.bench_function("extract_par_640x480", |b| {
        b.iter(|| extractor.extract_par(black_box(&pixels)))
    });
}

criterion_group!(benches, benchmark_extract);
criterion_main!(benches);
