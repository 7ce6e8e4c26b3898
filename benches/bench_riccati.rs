use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use std::hint::black_box;

use dipc_control_rs::control::lqr::dlqr_delay;
use dipc_control_rs::control::riccati::DareOptions;
use dipc_control_rs::math::linalg::expm;
use dipc_control_rs::math::plant::PlantModel;
use dipc_control_rs::types::config::GeometryConfig;

fn bench_delay_lqr(c: &mut Criterion) {
    let model = PlantModel::from_geometry(&GeometryConfig::double(3.0, 1.0, 1.0, 1.0)).unwrap();
    let (a, b) = model.linearize().unwrap();
    let q = Array2::<f64>::eye(4);
    let r = ndarray::array![[1.0]];
    let ts = 1.0 / 60.0;

    let mut group = c.benchmark_group("dlqr_delay");
    group.sample_size(10);
    for &delay_ms in &[0_u64, 100, 230] {
        let delay_s = delay_ms as f64 / 1000.0;
        group.bench_with_input(BenchmarkId::from_parameter(delay_ms), &delay_s, |bench, &delay_s| {
            bench.iter(|| {
                dlqr_delay(
                    black_box(&a),
                    black_box(&b),
                    &q,
                    &r,
                    ts,
                    delay_s,
                    &DareOptions::default(),
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_expm(c: &mut Criterion) {
    let model = PlantModel::from_geometry(&GeometryConfig::double(3.0, 1.0, 1.0, 1.0)).unwrap();
    let (a, _) = model.linearize().unwrap();
    c.bench_function("expm_4x4", |b| {
        b.iter(|| expm(black_box(&(&a * (1.0 / 60.0)))).unwrap());
    });
}

criterion_group!(benches, bench_delay_lqr, bench_expm);
criterion_main!(benches);
