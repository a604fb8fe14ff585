#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use pixelbana_config::PixelbanaConfig;
use pixelbana_engine::DatapathBuilder;

/// Benchmark end-to-end throughput by driving the datapath to a long
/// virtual-time horizon.
fn benchmark_pipeline_throughput(c: &mut Criterion) {
    c.bench_function("pipeline_throughput", |b| {
        b.iter(|| {
            let mut config = PixelbanaConfig::default();
            config.sim.horizon_ns = 100_000;
            let mut runtime = DatapathBuilder::new(config).build().expect("wiring");
            black_box(runtime.run());
        })
    });
}

criterion_group!(benches, benchmark_pipeline_throughput);
criterion_main!(benches);
