use criterion::{criterion_group, criterion_main, Criterion};

use shapelab_core::{Expression, Relation};
use shapelab_engine::{apply, Pipeline, Sampler, SamplerConfig};

fn bench_sample_unit_circle(c: &mut Criterion) {
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();
    let relation = Relation::parse("x**2 + y**2 == 1").unwrap();

    c.bench_function("sample_unit_circle_800", |b| {
        b.iter(|| sampler.sample(&relation));
    });
}

fn bench_sample_exhausted(c: &mut Criterion) {
    let config = SamplerConfig {
        resolution: 200,
        ..SamplerConfig::default()
    };
    let sampler = Sampler::new(config).unwrap();
    let relation = Relation::parse("x**2 + y**2 == -1").unwrap();

    c.bench_function("sample_no_points_200x10", |b| {
        b.iter(|| sampler.sample(&relation));
    });
}

fn bench_map(c: &mut Criterion) {
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();
    let relation = Relation::parse("x**2 + y**2 < 4").unwrap();
    let points = sampler.sample(&relation).unwrap().points;
    let expression = Expression::parse("np.exp(1j * z) / (z - 3)").unwrap();

    c.bench_function("map_disk_800", |b| {
        b.iter(|| apply(&expression, &points));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::new(SamplerConfig::default()).unwrap();

    c.bench_function("pipeline_default_inputs", |b| {
        b.iter(|| pipeline.run("x**2 + y**2 == 1", "(z - 1j)**2"));
    });
}

criterion_group!(
    benches,
    bench_sample_unit_circle,
    bench_sample_exhausted,
    bench_map,
    bench_pipeline
);
criterion_main!(benches);
