//! Design pipeline benchmarks
//!
//! Run with: cargo bench -p firwin-core --bench design

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use firwin::config::{FilterConfig, FilterKind, WindowKind};
use firwin::filters::FirDesigner;
use firwin::spectrum::{frequency_response, DEFAULT_POINTS};
use firwin::sweep::ParameterSweep;

fn bandpass(window: WindowKind, attenuation_db: f64) -> FilterConfig {
    FilterConfig {
        filter_type: FilterKind::Bandpass,
        filter_window: window,
        passband_ripple_db: 0.1,
        stopband_attenuation_db: attenuation_db,
        passband_edge_hz: 1000.0,
        stopband_edge_hz: 2500.0,
        sampling_rate_hz: 8000.0,
        passband_edge2_hz: Some(2000.0),
        stopband_edge2_hz: Some(500.0),
    }
}

/// Full pipeline per window family
fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("design");
    let designer = FirDesigner::default();

    for window in [WindowKind::Hamming, WindowKind::Blackman, WindowKind::Kaiser] {
        let config = bandpass(window, 60.0);
        assert!(designer.design(&config).is_ok(), "{} config must validate", window);
        group.bench_with_input(BenchmarkId::new("bandpass", window), &config, |b, config| {
            b.iter(|| designer.design(black_box(config)))
        });
    }

    group.bench_function("reference_highpass", |b| {
        let config = FilterConfig::reference();
        b.iter(|| designer.design(black_box(&config)))
    });

    group.finish();
}

/// Sequential loop vs rayon batch
fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    let designer = FirDesigner::default();
    let sweep = ParameterSweep::new(designer);

    for runs in [8usize, 64, 256] {
        let configs: Vec<FilterConfig> = (0..runs)
            .map(|i| bandpass(WindowKind::Kaiser, 30.0 + (i % 60) as f64))
            .collect();
        assert!(sweep.design_batch(&configs).iter().all(Result::is_ok));

        group.throughput(Throughput::Elements(runs as u64));

        group.bench_with_input(BenchmarkId::new("sequential", runs), &configs, |b, configs| {
            b.iter(|| configs.iter().map(|c| designer.design(c)).collect::<Vec<_>>())
        });

        group.bench_with_input(BenchmarkId::new("parallel", runs), &configs, |b, configs| {
            b.iter(|| sweep.design_batch(black_box(configs)))
        });
    }

    group.finish();
}

fn bench_response(c: &mut Criterion) {
    let design = FirDesigner::default()
        .design(&bandpass(WindowKind::Kaiser, 80.0))
        .unwrap();

    c.bench_function("frequency_response", |b| {
        b.iter(|| {
            frequency_response(
                black_box(&design.coefficients),
                design.sampling_rate_hz,
                DEFAULT_POINTS,
            )
        })
    });
}

criterion_group!(benches, bench_design, bench_sweep, bench_response);
criterion_main!(benches);
