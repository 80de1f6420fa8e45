//! Criterion benchmarks for decompilation performance.
//!
//! These benchmarks measure decoding and full path exploration on synthetic
//! checker programs of increasing length.
//!
//! Run with: `cargo bench --bench decompilation`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use regvm_decompiler::{decompile, DecompilerConfig};
use regvm_instructions::decode;

/// Eleven-byte failure block: clear reg4, print, ret, then padding.
const FAIL_BLOCK: [u8; 11] = [48, 85, 87, 47, 47, 47, 47, 47, 47, 47, 47];

/// A checker comparing `chars` input characters, one branch per character.
///
/// A matching character jumps over the failure block that follows each
/// branch, so exploration visits `chars + 1` leaves.
fn checker(chars: usize) -> Vec<u8> {
    let mut bytes = vec![86];
    for i in 0..chars {
        if i > 0 {
            // pop_last_char reg0
            bytes.extend([83, 0]);
        }
        // reg6 = last char code + 1; clear reg7
        bytes.extend([61, 0, 6, 71, 82, 7, 81, 6, 7, 6, 51]);
        // reg5 = 11; if_eq
        bytes.extend([69, 82, 5, 82, 5, 41]);
        bytes.extend(FAIL_BLOCK);
    }
    bytes.extend([68, 85, 87]);
    bytes
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for chars in [8usize, 32, 128] {
        let bytes = checker(chars);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chars), &bytes, |b, bytes| {
            b.iter(|| decode(bytes).unwrap());
        });
    }
    group.finish();
}

fn bench_decompile(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompile");
    for chars in [8usize, 32, 128] {
        let bytes = checker(chars);
        let config = DecompilerConfig::builder()
            .input_length(chars)
            .step_budget(1_000_000)
            .build()
            .unwrap();
        group.throughput(Throughput::Elements(chars as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chars), &bytes, |b, bytes| {
            b.iter(|| decompile(bytes, &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_decompile);
criterion_main!(benches);
