//! Benchmarks for dataset generation and analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sensorsynth::{
    AnalysisConfig, AnalysisReport, ChartBuilder, ChartStyle, CorrelationMatrix, GeneratorConfig,
    SyntheticSensorGenerator,
};

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for n in [250usize, 10_000] {
        let generator =
            SyntheticSensorGenerator::new(GeneratorConfig::new().with_sample_count(n).with_seed(42))
                .unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("generate_{}", n), |b| {
            b.iter(|| black_box(generator.generate().unwrap()))
        });
    }

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    // Setup
    let dataset =
        SyntheticSensorGenerator::new(GeneratorConfig::new().with_sample_count(10_000).with_seed(7))
            .unwrap()
            .generate()
            .unwrap();
    let config = AnalysisConfig::default();

    group.throughput(Throughput::Elements(dataset.len() as u64));

    group.bench_function("correlation_matrix", |b| {
        b.iter(|| black_box(CorrelationMatrix::standard(&dataset)))
    });

    group.bench_function("report", |b| {
        b.iter(|| black_box(AnalysisReport::analyze(&dataset, &config).unwrap()))
    });

    let report = AnalysisReport::analyze(&dataset, &config).unwrap();
    let style = ChartStyle::default();
    let builder = ChartBuilder::new(&dataset, &report, &config, &style).unwrap();
    group.bench_function("charts", |b| b.iter(|| black_box(builder.build_all())));

    group.finish();
}

fn bench_csv(c: &mut Criterion) {
    let dataset = SyntheticSensorGenerator::new(GeneratorConfig::new().with_seed(1))
        .unwrap()
        .generate()
        .unwrap();

    c.bench_function("write_csv_250", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(32 * 1024);
            dataset.write_csv(&mut buf).unwrap();
            black_box(buf)
        })
    });
}

criterion_group!(benches, bench_generation, bench_analysis, bench_csv);
criterion_main!(benches);
