//! FFT Spectrum Analyzer
//!
//! Consumes fixed-size sample blocks (delivered by the block FIFO) on the
//! analysis thread and produces a log-spaced magnitude spectrum for display.
//! Unlike the filter chain this is not real-time code: it runs on the
//! consumer side, so it owns its buffers outright and needs no atomics.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT size (must be power of 2)
/// 2048 samples at 48kHz = ~42ms window, ~23Hz resolution
pub const FFT_SIZE: usize = 2048;

/// Number of frequency bins to output (reduced for efficient UI rendering)
/// These are logarithmically spaced to match human hearing
pub const NUM_BINS: usize = 32;

/// Smoothing factor for spectrum decay (0.0 = instant, 1.0 = no decay)
const SPECTRUM_DECAY: f32 = 0.7;

/// Attack factor for spectrum rise (higher = faster response to new peaks)
const SPECTRUM_ATTACK: f32 = 0.5;

fn hann_window(n: usize, size: usize) -> f32 {
    0.5 * (1.0 - (2.0 * std::f32::consts::PI * n as f32 / (size - 1) as f32).cos())
}

/// Spectrum analyzer fed by completed audio blocks
pub struct SpectrumAnalyzer {
    /// Ring of the most recent FFT_SIZE samples
    samples: Vec<f32>,
    write_pos: usize,
    /// Samples accumulated since the last FFT
    samples_since_fft: usize,
    /// Samples required between FFTs (sets the refresh rate)
    samples_per_fft: usize,
    /// Pre-computed Hann window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    bins: [f32; NUM_BINS],
    smoothed: [f32; NUM_BINS],
}

impl SpectrumAnalyzer {
    /// Create an analyzer targeting `fps` spectrum updates per second
    pub fn new(sample_rate: f32, fps: u32) -> Self {
        let fps = fps.max(1);
        let samples_per_fft = (sample_rate / fps as f32) as usize;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        Self {
            samples: vec![0.0; FFT_SIZE],
            write_pos: 0,
            samples_since_fft: 0,
            samples_per_fft: samples_per_fft.max(1),
            window: (0..FFT_SIZE).map(|i| hann_window(i, FFT_SIZE)).collect(),
            fft,
            scratch: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            bins: [0.0; NUM_BINS],
            smoothed: [0.0; NUM_BINS],
        }
    }

    /// Feed one completed block; returns true when a new spectrum was computed
    pub fn push_block(&mut self, block: &[f32]) -> bool {
        for &sample in block {
            self.samples[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % FFT_SIZE;
        }
        self.samples_since_fft += block.len();

        if self.samples_since_fft < self.samples_per_fft {
            return false;
        }
        self.samples_since_fft = 0;
        self.compute();
        true
    }

    fn compute(&mut self) {
        // Window the ring contents oldest-first into the FFT buffer
        for i in 0..FFT_SIZE {
            let idx = (self.write_pos + i) % FFT_SIZE;
            self.scratch[i] = Complex::new(self.samples[idx] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        compute_log_spectrum(&self.scratch, &mut self.bins);

        // Asymmetric attack/decay: snappy rise, smooth falloff
        for i in 0..NUM_BINS {
            let raw = self.bins[i];
            let current = self.smoothed[i];
            self.smoothed[i] = if raw > current {
                current + (raw - current) * SPECTRUM_ATTACK
            } else {
                current * SPECTRUM_DECAY + raw * (1.0 - SPECTRUM_DECAY)
            };
        }
    }

    /// Current spectrum, smoothed for display (0.0 to 1.0 per bin)
    pub fn bins(&self) -> [f32; NUM_BINS] {
        self.smoothed
    }

    /// Instantaneous spectrum without smoothing
    pub fn raw_bins(&self) -> [f32; NUM_BINS] {
        self.bins
    }

    pub fn reset(&mut self) {
        self.samples.fill(0.0);
        self.write_pos = 0;
        self.samples_since_fft = 0;
        self.bins = [0.0; NUM_BINS];
        self.smoothed = [0.0; NUM_BINS];
    }
}

/// Convert FFT output to logarithmically-spaced magnitude bins
///
/// Maps the linear FFT bins onto log frequency bands, normalizes against a
/// reference magnitude, and rescales -60..0 dB to 0..1 for metering.
fn compute_log_spectrum(fft_output: &[Complex<f32>], spectrum: &mut [f32; NUM_BINS]) {
    let nyquist = FFT_SIZE / 2;

    // Skip DC; log-space the remaining positive-frequency bins
    let min_bin = 1;
    let log_min = (min_bin as f32).ln();
    let log_max = (nyquist as f32).ln();
    let log_step = (log_max - log_min) / NUM_BINS as f32;

    // A full-scale windowed sine lands around FFT_SIZE * 0.5 due to Hann
    // gain; FFT_SIZE / 4 as the reference puts typical audio in a useful
    // meter range.
    let reference_magnitude = (FFT_SIZE as f32) / 4.0;

    for (i, spectrum_bin) in spectrum.iter_mut().enumerate() {
        let log_start = log_min + i as f32 * log_step;
        let log_end = log_min + (i + 1) as f32 * log_step;
        let bin_start = log_start.exp() as usize;
        let bin_end = (log_end.exp() as usize).min(nyquist);

        let end_idx = (bin_end + 1).min(nyquist);
        let (sum, count): (f32, usize) = fft_output[bin_start..end_idx]
            .iter()
            .map(|c| c.norm())
            .fold((0.0, 0), |(s, c), mag| (s + mag, c + 1));

        let avg_mag = if count > 0 { sum / count as f32 } else { 0.0 };

        let normalized_mag = avg_mag / reference_magnitude;
        let db = 20.0 * (normalized_mag.max(1e-10)).log10();

        // -60 dB (silence) .. 0 dB (full scale) -> 0.0 .. 1.0
        *spectrum_bin = ((db + 60.0) / 60.0).clamp(0.0, 1.0);
    }
}
