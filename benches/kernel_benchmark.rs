//! Benchmarks for kernel evaluation and weighted SMO training.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use healthsvm::{ClassWeights, Hyperparameters, Kernel, KernelKind, Label, Sample, SvmKernel, SVM};
use healthsvm::data::{Dataset, Schema};

fn survey_rows(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let present = i % 10 == 0;
            let base = if present { 36.0 } else { 22.0 };
            let bmi = base + (i % 6) as f64;
            let features = vec![
                bmi,
                140.0 + ((i * 7) % 60) as f64,
                60.0 + (i % 14) as f64,
                20.0 + ((i * 3) % 55) as f64,
                25.0 + (i % 30) as f64,
                ((i * 11) % 90) as f64,
            ];
            let label = if present { Label::Present } else { Label::Absent };
            Sample::new(features, label)
        })
        .collect()
}

fn bench_kernel_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_compute");
    let rows = survey_rows(2);
    let params = Hyperparameters::for_features(6);

    for kind in KernelKind::ALL {
        let kernel = SvmKernel::build(kind, &params).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, _| {
            b.iter(|| kernel.compute(black_box(&rows[0].features), black_box(&rows[1].features)));
        });
    }

    group.finish();
}

fn bench_weighted_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_linear_training");
    group.sample_size(10);

    for size in [50, 100, 200].iter() {
        let dataset = Dataset::new("diabetes", Schema::survey("diabetes"), survey_rows(*size)).unwrap();
        let weights = ClassWeights::for_minority(Label::Present, 10.0).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                SVM::new(KernelKind::Linear)
                    .with_class_weights(weights)
                    .train(black_box(&dataset))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernel_compute, bench_weighted_training);
criterion_main!(benches);
