use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sideload_stream::Utf8Decoder;

fn ascii_log(len: usize) -> Vec<u8> {
    b"Performing Streamed Install\nSuccess\n"
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn mixed_log(len: usize) -> Vec<u8> {
    "päckage → ok ✓\n"
        .as_bytes()
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("utf8_decode");

    for (name, data) in [
        ("ascii_1mib", ascii_log(1024 * 1024)),
        ("mixed_1mib", mixed_log(1024 * 1024)),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut decoder = Utf8Decoder::new();
                let mut total = 0usize;
                for chunk in data.chunks(8192) {
                    total += decoder.decode(black_box(chunk)).len();
                }
                total += decoder.finish().len();
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
