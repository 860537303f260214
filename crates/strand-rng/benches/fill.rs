use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use strand_rng::SystemRng;

fn bench_fill_bytes(c: &mut Criterion) {
    let mut rng = SystemRng::system().expect("unable to create system rng");

    let mut group = c.benchmark_group("fill_bytes");
    for size in [32usize, 256, 4096] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(size.to_string(), |b| {
            let mut buf = vec![0u8; size];
            b.iter(|| rng.try_fill_bytes(&mut buf).expect("fill failed"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill_bytes);
criterion_main!(benches);
