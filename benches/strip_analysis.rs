use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use strip_colorscan::{ColorSpace, ExtractionStrategy, PipelineConfig, StripAnalyzer};

/// White strip with six colored pads, roughly phone-photo sized
fn synthetic_strip() -> RgbImage {
    let pads = [
        [255, 255, 0],
        [255, 105, 180],
        [255, 192, 203],
        [144, 238, 144],
        [0, 255, 255],
        [255, 215, 0],
    ];
    let mut image = RgbImage::from_pixel(200, 1200, Rgb([255, 255, 255]));
    for (i, color) in pads.iter().enumerate() {
        let top = 40 + i as u32 * 190;
        for y in top..top + 150 {
            for x in 25..175 {
                image.put_pixel(x, y, Rgb(*color));
            }
        }
    }
    image
}

fn analyzer(strategy: ExtractionStrategy, space: ColorSpace) -> StripAnalyzer {
    let mut config = PipelineConfig::default();
    config.extraction.strategy = strategy;
    config.matching.color_space = space;
    StripAnalyzer::new(config).unwrap()
}

fn benchmark_strip_analysis(c: &mut Criterion) {
    let image = synthetic_strip();

    let contour = analyzer(ExtractionStrategy::Contour, ColorSpace::Lab);
    c.bench_function("analyze_contour_lab", |b| {
        b.iter(|| contour.analyze_image(black_box(&image), None).unwrap())
    });

    let partition = analyzer(ExtractionStrategy::FixedPartition, ColorSpace::Lab);
    c.bench_function("analyze_partition_lab", |b| {
        b.iter(|| partition.analyze_image(black_box(&image), None).unwrap())
    });

    let rgb = analyzer(ExtractionStrategy::FixedPartition, ColorSpace::Rgb);
    c.bench_function("analyze_partition_rgb", |b| {
        b.iter(|| rgb.analyze_image(black_box(&image), None).unwrap())
    });
}

criterion_group!(benches, benchmark_strip_analysis);
criterion_main!(benches);
