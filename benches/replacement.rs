use criterion::{Criterion, criterion_group, criterion_main};
use regex16::Regex;
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("replacement", |b| {
        let text: Vec<u16> = "Price: 123".encode_utf16().collect();
        let template: Vec<u16> = "[$0]".encode_utf16().collect();
        b.iter(|| {
            let re = Regex::with_flags(r"\d+", "");
            let _result = re.replace(black_box(&text), black_box(&template));
        })
    });

    c.bench_function("global replacement", |b| {
        let text: Vec<u16> = "a1b22c333d4444e55555".encode_utf16().collect();
        let template: Vec<u16> = "$&.".encode_utf16().collect();
        b.iter(|| {
            let re = Regex::with_flags(r"\d+", "g");
            let _result = re.replace(black_box(&text), black_box(&template));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
