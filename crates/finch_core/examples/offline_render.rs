//! Offline rendering demo
//!
//! Drives the full pipeline without a sound card: a generated sine stands in
//! for the host's audio callback, and the analysis events are printed as
//! they arrive.
//!
//! Run with: cargo run -p finch_core --example offline_render

use std::sync::Arc;
use std::time::Duration;

use finch_core::{
    AnalysisEngine, EngineConfig, EqProcessor, Event, ParameterStore, Slope, StoredState,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = EngineConfig::default();
    let params = Arc::new(ParameterStore::default());
    params.set_low_cut_freq(100.0);
    params.set_low_cut_slope(Slope::Db24);
    params.set_peak_freq(1_000.0);
    params.set_peak_gain_db(6.0);

    let mut processor = EqProcessor::new(Arc::clone(&params));
    let (left_rx, right_rx) = processor.prepare(&config.stream, config.analysis.fifo_blocks)?;

    let (event_tx, event_rx) = crossbeam_channel::bounded(64);
    let engine = AnalysisEngine::spawn(Arc::clone(&params), &config, left_rx, right_rx, event_tx)?;

    // One second of a 440 Hz sine in host-sized blocks
    let block_size = config.stream.block_size as usize;
    let sample_rate = config.stream.sample_rate as f32;
    let mut left = vec![0.0_f32; block_size];
    let mut right = vec![0.0_f32; block_size];

    let blocks = config.stream.sample_rate as usize / block_size;
    for n in 0..blocks {
        for i in 0..block_size {
            let t = (n * block_size + i) as f32 / sample_rate;
            let s = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            left[i] = s;
            right[i] = s;
        }
        processor.process_planar(&mut left, &mut right)?;
        // Pace roughly like a real stream so the analysis thread keeps up
        std::thread::sleep(Duration::from_millis(2));
    }

    let mut spectra = 0;
    let mut curves = 0;
    while let Ok(event) = event_rx.recv_timeout(Duration::from_millis(100)) {
        match event {
            Event::SpectrumUpdate { .. } => spectra += 1,
            Event::ResponseCurve { points } => {
                curves += 1;
                let max = points.iter().cloned().fold(f64::MIN, f64::max);
                info!(max_db = max, "response curve received");
            }
            Event::Error { message } => info!(%message, "engine error"),
        }
    }
    info!(spectra, curves, "analysis events received");

    // Round-trip the parameter state the way a host session save would
    let saved = StoredState::capture(&params).to_json()?;
    info!(bytes = saved.len(), "state captured");
    StoredState::from_json(&saved)?.restore(&params);

    engine.shutdown();
    Ok(())
}
