use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use segd_decoder::{DecoderConfig, HeaderDecoder, Preset};
use segd_tests::{ascending_header, segd_general_header, temp_file};

fn bench_decode_bytes(c: &mut Criterion) {
    let raw = HeaderDecoder::default();
    let bytes = ascending_header();

    c.bench_function("decode_bytes_raw", |b| {
        b.iter(|| raw.decode_bytes(black_box(&bytes)).unwrap());
    });

    let segd = HeaderDecoder::new(DecoderConfig::preset(Preset::SegdGeneralHeader)).unwrap();
    let gh1 = segd_general_header();

    c.bench_function("decode_bytes_segd", |b| {
        b.iter(|| segd.decode_bytes(black_box(&gh1)).unwrap());
    });
}

fn bench_field_access(c: &mut Criterion) {
    let decoder = HeaderDecoder::new(DecoderConfig::preset(Preset::SegdGeneralHeader)).unwrap();
    let header = decoder.decode_bytes(&segd_general_header()).unwrap();

    let mut group = c.benchmark_group("field_access");
    group.bench_function("by_name", |b| {
        b.iter(|| header.field(black_box("record_length")).unwrap());
    });
    group.bench_function("all_fields", |b| {
        b.iter(|| header.fields().filter(|(_, v)| v.is_ok()).count());
    });
    group.finish();
}

fn bench_decode_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_path");

    for header_size in [32usize, 256, 4096] {
        let bytes: Vec<u8> = (0..header_size).map(|i| (i % 251) as u8).collect();
        let file = temp_file(&bytes);
        let decoder =
            HeaderDecoder::new(DecoderConfig::default().with_header_size(header_size)).unwrap();

        group.throughput(Throughput::Bytes(header_size as u64));
        group.bench_with_input(
            BenchmarkId::new("file", format!("{header_size}b")),
            &file,
            |b, f| b.iter(|| decoder.decode_path(f.path()).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decode_bytes, bench_field_access, bench_decode_path);
criterion_main!(benches);
