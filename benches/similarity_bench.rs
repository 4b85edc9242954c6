use criterion::{criterion_group, criterion_main, Criterion};
use demofit::similarity::{compare_demographics, Method};
use std::hint::black_box;

fn bench_methods(c: &mut Criterion) {
    // Vector width matching a realistic demographic category count.
    let dims = 134;
    let mut rng = fastrand::Rng::with_seed(7);
    let expected: Vec<f64> = (0..dims).map(|_| rng.f64()).collect();
    let actual: Vec<f64> = (0..dims).map(|_| rng.f64()).collect();

    let mut group = c.benchmark_group("compare_demographics");
    for method in [Method::L1, Method::L2, Method::Cosine, Method::Js] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| compare_demographics(black_box(&expected), black_box(&actual), method))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_methods);
criterion_main!(benches);
