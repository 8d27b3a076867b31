use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_forge::encoder::reed_solomon::ReedSolomonEncoder;
use qr_forge::encoder::segment::segment_optimally;
use qr_forge::render::render_png;
use qr_forge::{ECLevel, Version, encode};

fn bench_encode_short_text(c: &mut Criterion) {
    c.bench_function("encode_hello_world_m", |b| {
        b.iter(|| encode(black_box(b"HELLO WORLD"), ECLevel::M))
    });
}

fn bench_encode_url(c: &mut Criterion) {
    let url = b"https://example.com/products/12345?ref=QR-CODE&utm_source=print";
    c.bench_function("encode_url_q", |b| b.iter(|| encode(black_box(url), ECLevel::Q)));
}

fn bench_encode_max_version(c: &mut Criterion) {
    let data = vec![b'a'; 2953];
    c.bench_function("encode_v40_l", |b| b.iter(|| encode(black_box(&data), ECLevel::L)));
}

fn bench_segmentation(c: &mut Criterion) {
    let data: Vec<u8> = b"ORDER 0042 / 31415926535 / item-xyz "
        .iter()
        .copied()
        .cycle()
        .take(1000)
        .collect();
    let version = Version::new(20).unwrap();
    c.bench_function("segment_optimally_1000", |b| {
        b.iter(|| segment_optimally(black_box(&data), version))
    });
}

fn bench_reed_solomon(c: &mut Criterion) {
    let rs = ReedSolomonEncoder::new(30);
    let block: Vec<u8> = (0..118u8).collect();
    c.bench_function("rs_encode_118_30", |b| b.iter(|| rs.encode(black_box(&block))));
}

fn bench_render_png(c: &mut Criterion) {
    let code = encode(b"HELLO WORLD", ECLevel::M).unwrap();
    c.bench_function("render_png_v1_scale10", |b| {
        b.iter(|| render_png(black_box(&code), 10, 4))
    });
}

criterion_group!(
    benches,
    bench_encode_short_text,
    bench_encode_url,
    bench_encode_max_version,
    bench_segmentation,
    bench_reed_solomon,
    bench_render_png
);
criterion_main!(benches);
