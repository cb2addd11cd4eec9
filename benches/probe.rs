use std::hint::black_box;

use cacheline_probe::{
    locate, CacheLineProbe, CycleCounter, LockedIncrement, ProbeBuffer, StaticPlatform, Tsc,
};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("cacheline_probe");
    group.sample_size(20);

    group.bench_function("locate_reference_buffer", |b| {
        let buffer = ProbeBuffer::new(64, 10).expect("reference buffer");
        b.iter(|| black_box(locate(black_box(buffer.words()), 64)));
    });

    group.bench_function("counter_overhead_estimate", |b| {
        let mut tsc = Tsc::new(1_000);
        b.iter(|| black_box(tsc.overhead()));
    });

    group.bench_function("quick_sweep", |b| {
        // One burst of 32 increments per offset; no pauses.
        let probe = CacheLineProbe::quick();
        let mut tsc = Tsc::new(100);
        b.iter(|| {
            let report = probe
                .run_with(&StaticPlatform(64), &mut tsc, &LockedIncrement)
                .map(|r| r.results.len());
            black_box(report)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_probe);
criterion_main!(benches);
