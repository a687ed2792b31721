//! Performance benchmarks for the DSP module
//!
//! Run with: cargo bench -p finch_dsp

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use finch_dsp::{ChainSettings, ChannelChain, Slope};

fn benchmark_chain_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_chain");

    // Common buffer sizes in audio applications
    let buffer_sizes = [64, 128, 256, 512, 1024, 2048];

    for size in buffer_sizes {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("process_block_{}_frames", size), |b| {
            let mut chain = ChannelChain::new(48000.0).unwrap();
            chain.apply_settings(&ChainSettings {
                low_cut_freq: 80.0,
                low_cut_slope: Slope::Db48,
                high_cut_freq: 12_000.0,
                high_cut_slope: Slope::Db48,
                peak_gain_db: 6.0,
                ..ChainSettings::default()
            });
            let mut buffer: Vec<f32> = (0..size).map(|i| (i as f32 * 0.001).sin()).collect();

            b.iter(|| {
                chain.process_block(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn benchmark_coefficient_update(c: &mut Criterion) {
    c.bench_function("chain_apply_settings", |b| {
        let mut chain = ChannelChain::new(48000.0).unwrap();
        let mut gain = 0.0_f32;
        let mut freq = 200.0_f32;

        b.iter(|| {
            // Simulate sweeping a knob
            chain.apply_settings(black_box(&ChainSettings {
                peak_freq: freq,
                peak_gain_db: gain,
                ..ChainSettings::default()
            }));
            gain = (gain + 1.0) % 24.0;
            freq = 200.0 + (freq + 50.0) % 10_000.0;
        });
    });
}

fn benchmark_response_curve(c: &mut Criterion) {
    c.bench_function("response_curve_800_px", |b| {
        let mut chain = ChannelChain::new(48000.0).unwrap();
        chain.apply_settings(&ChainSettings {
            low_cut_slope: Slope::Db48,
            high_cut_slope: Slope::Db48,
            peak_gain_db: -6.0,
            ..ChainSettings::default()
        });

        b.iter(|| {
            black_box(chain.response_curve(black_box(800)));
        });
    });
}

criterion_group!(
    benches,
    benchmark_chain_processing,
    benchmark_coefficient_update,
    benchmark_response_curve
);

criterion_main!(benches);
