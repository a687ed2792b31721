//! Analysis Engine Thread
//!
//! Owns the display side of the pipeline: a mirror filter chain for the
//! response curve, the FFT spectrum analyzer, and the consumer ends of the
//! block FIFOs. Runs on its own named thread at the configured refresh rate;
//! the audio thread never waits on it.
//!
//! The mirror chain is refreshed only when the parameter store's dirty flag
//! fires, unlike the audio chains which re-derive every block. The mirror
//! never filters audio, it only exists so the response curve matches what
//! the audio thread is running.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::fifo::BlockConsumer;
use crate::message::{Command, Event};
use crate::params::ParameterStore;
use finch_dsp::{ChannelChain, SpectrumAnalyzer};

/// Handle to the running analysis thread
pub struct AnalysisEngine {
    command_tx: Sender<Command>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisEngine {
    /// Spawn the analysis thread
    ///
    /// `left` and `right` are the consumer ends returned by
    /// `EqProcessor::prepare`. Events are delivered best-effort through
    /// `event_tx`; a full channel drops the update rather than stalling.
    pub fn spawn(
        params: Arc<ParameterStore>,
        config: &EngineConfig,
        left: BlockConsumer,
        right: BlockConsumer,
        event_tx: Sender<Event>,
    ) -> EngineResult<Self> {
        let sample_rate = config.stream.sample_rate as f32;
        // Built here so a bad configuration fails the caller, not the thread
        let mirror = ChannelChain::new(sample_rate)?;
        let analyzer = SpectrumAnalyzer::new(sample_rate, config.analysis.refresh_hz);

        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let tick = Duration::from_millis(1_000 / config.analysis.refresh_hz.max(1) as u64);
        let curve_width = config.analysis.curve_width;

        let handle = thread::Builder::new()
            .name("finch-analysis".to_string())
            .spawn(move || {
                run_loop(Worker {
                    params,
                    mirror,
                    analyzer,
                    left,
                    right,
                    event_tx,
                    command_rx,
                    tick,
                    curve_width,
                });
            })
            .map_err(|e| EngineError::ThreadSpawnError(e.to_string()))?;

        Ok(Self {
            command_tx,
            handle: Some(handle),
        })
    }

    /// Ask the thread to re-send the current response curve
    pub fn request_curve(&self) -> EngineResult<()> {
        self.command_tx
            .send(Command::RequestCurve)
            .map_err(|_| EngineError::ChannelSendError)
    }

    /// Clear the spectrum history
    pub fn reset_spectrum(&self) -> EngineResult<()> {
        self.command_tx
            .send(Command::ResetSpectrum)
            .map_err(|_| EngineError::ChannelSendError)
    }

    /// Stop the thread and wait for it to exit
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let _ = self.command_tx.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("analysis thread panicked");
            }
        }
    }
}

impl Drop for AnalysisEngine {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

struct Worker {
    params: Arc<ParameterStore>,
    mirror: ChannelChain,
    analyzer: SpectrumAnalyzer,
    left: BlockConsumer,
    right: BlockConsumer,
    event_tx: Sender<Event>,
    command_rx: Receiver<Command>,
    tick: Duration,
    curve_width: usize,
}

fn run_loop(mut worker: Worker) {
    info!("analysis thread started");
    let block_len = worker.left.block_len();
    let mut left_block = vec![0.0_f32; block_len];
    let mut right_block = vec![0.0_f32; block_len];

    loop {
        match worker.command_rx.recv_timeout(worker.tick) {
            Ok(Command::Shutdown) => break,
            Ok(Command::RequestCurve) => worker.send_curve(),
            Ok(Command::ResetSpectrum) => worker.analyzer.reset(),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }

        worker.refresh_mirror();
        worker.drain_fifos(&mut left_block, &mut right_block);
    }
    info!("analysis thread stopped");
}

impl Worker {
    /// Rebuild the mirror chain if parameters changed since the last tick
    fn refresh_mirror(&mut self) {
        if self.params.take_dirty() {
            self.mirror.apply_settings(&self.params.snapshot());
            self.send_curve();
        }
    }

    fn send_curve(&self) {
        let _ = self.event_tx.try_send(Event::ResponseCurve {
            points: self.mirror.response_curve(self.curve_width),
        });
    }

    /// Pull every queued block and feed the spectrum analyzer
    ///
    /// Channels are mixed to mono for the display. When one FIFO runs ahead
    /// of the other the lone channel is analyzed as-is rather than waiting.
    fn drain_fifos(&mut self, left_block: &mut [f32], right_block: &mut [f32]) {
        while self.left.pull(left_block) {
            if self.right.pull(right_block) {
                for (l, r) in left_block.iter_mut().zip(right_block.iter()) {
                    *l = (*l + *r) * 0.5;
                }
            }
            if self.analyzer.push_block(left_block) {
                let _ = self.event_tx.try_send(Event::spectrum(self.analyzer.bins()));
            }
        }
        // A dead left producer must not let the right FIFO fill up
        while self.right.pull(right_block) {
            if self.analyzer.push_block(right_block) {
                let _ = self.event_tx.try_send(Event::spectrum(self.analyzer.bins()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fifo::block_fifo;

    const BLOCK: usize = 512;

    fn engine_with_producers() -> (
        AnalysisEngine,
        crate::fifo::BlockProducer,
        crate::fifo::BlockProducer,
        Receiver<Event>,
    ) {
        let params = Arc::new(ParameterStore::default());
        let config = EngineConfig::default();
        let (left_tx, left_rx) = block_fifo(30, BLOCK);
        let (right_tx, right_rx) = block_fifo(30, BLOCK);
        let (event_tx, event_rx) = crossbeam_channel::bounded(64);

        let engine = AnalysisEngine::spawn(params, &config, left_rx, right_rx, event_tx).unwrap();
        (engine, left_tx, right_tx, event_rx)
    }

    fn wait_for<F: Fn(&Event) -> bool>(rx: &Receiver<Event>, pred: F) -> Event {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if let Ok(event) = rx.recv_timeout(Duration::from_millis(100)) {
                if pred(&event) {
                    return event;
                }
            }
        }
        panic!("expected event never arrived");
    }

    #[test]
    fn test_initial_curve_is_published() {
        // A fresh parameter store is dirty, so the first tick sends a curve
        let (_engine, _left, _right, events) = engine_with_producers();
        let event = wait_for(&events, |e| matches!(e, Event::ResponseCurve { .. }));
        if let Event::ResponseCurve { points } = event {
            assert_eq!(points.len(), 800);
        }
    }

    #[test]
    fn test_spectrum_flows_from_fifo() {
        let (_engine, mut left, mut right, events) = engine_with_producers();

        // Feed a couple seconds of sine so the analyzer crosses its cadence
        let mut block = vec![0.0_f32; BLOCK];
        for n in 0..32 {
            for (i, sample) in block.iter_mut().enumerate() {
                let t = (n * BLOCK + i) as f32 / 48_000.0;
                *sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            }
            while !left.push(&block) {
                std::thread::sleep(Duration::from_millis(1));
            }
            while !right.push(&block) {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        let event = wait_for(&events, |e| matches!(e, Event::SpectrumUpdate { .. }));
        if let Event::SpectrumUpdate { bins } = event {
            assert_eq!(bins.len(), finch_dsp::NUM_BINS);
        }
    }

    #[test]
    fn test_parameter_change_triggers_new_curve() {
        let params = Arc::new(ParameterStore::default());
        let config = EngineConfig::default();
        let (_lt, left_rx) = block_fifo(30, BLOCK);
        let (_rt, right_rx) = block_fifo(30, BLOCK);
        let (event_tx, events) = crossbeam_channel::bounded(64);
        let _engine = AnalysisEngine::spawn(
            Arc::clone(&params),
            &config,
            left_rx,
            right_rx,
            event_tx,
        )
        .unwrap();

        // Swallow the initial curve, then change a parameter
        wait_for(&events, |e| matches!(e, Event::ResponseCurve { .. }));
        params.set_peak_gain_db(12.0);

        let event = wait_for(&events, |e| {
            if let Event::ResponseCurve { points } = e {
                points.iter().cloned().fold(f64::MIN, f64::max) > 10.0
            } else {
                false
            }
        });
        assert!(matches!(event, Event::ResponseCurve { .. }));
    }

    #[test]
    fn test_shutdown_joins_cleanly() {
        let (engine, _left, _right, _events) = engine_with_producers();
        engine.shutdown();
    }

    #[test]
    fn test_request_curve_resends() {
        let (engine, _left, _right, events) = engine_with_producers();
        wait_for(&events, |e| matches!(e, Event::ResponseCurve { .. }));

        engine.request_curve().unwrap();
        wait_for(&events, |e| matches!(e, Event::ResponseCurve { .. }));
    }
}
