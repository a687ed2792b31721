//! Filter Coefficient Designer
//!
//! Pure functions mapping a `ChainSettings` snapshot and a sample rate to
//! BiQuad coefficient sets, based on the RBJ (Robert Bristow-Johnson) Audio
//! EQ Cookbook. The cut filters are high-order Butterworth designs realized
//! as cascades of second-order sections with per-section Q values.
//!
//! Everything here is stateless and deterministic. Invalid inputs are clamped
//! at this boundary rather than reported: the callers run on a live audio
//! thread and cannot unwind.

use biquad::Coefficients;

use crate::settings::{ChainSettings, Slope, MIN_FREQ_HZ};

/// Number of coefficient slots in a cut cascade
///
/// Fixed regardless of the selected slope so the array shape never changes
/// and no reallocation happens when the user sweeps through slopes.
pub const CUT_STAGES: usize = 4;

/// Per-stage coefficient array for one cut cascade
pub type CutCoefficients = [Coefficients<f32>; CUT_STAGES];

/// Frequencies are kept strictly below Nyquist; designing at or above it
/// produces unstable or NaN coefficients.
const MAX_FREQ_RATIO: f32 = 0.49;

/// Floor for the peak Q; the parameter range bottoms out at 0.1, but the
/// designer defends itself anyway.
const MIN_DESIGN_Q: f32 = 0.025;

/// Unity pass-through coefficients (y = x)
pub fn identity() -> Coefficients<f32> {
    Coefficients {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    }
}

#[inline]
fn clamp_frequency(freq: f32, sample_rate: f32) -> f32 {
    freq.clamp(MIN_FREQ_HZ, sample_rate * MAX_FREQ_RATIO)
}

/// Q of the k-th (1-based) second-order section of a 2m-order Butterworth
///
/// Derived from the pole angles: Q_k = 1 / (2 sin(pi (2k - 1) / 2N)).
fn butterworth_q(section: usize, order: usize) -> f32 {
    let n = order as f32;
    let k = section as f32;
    let angle = std::f32::consts::PI * (2.0 * k - 1.0) / (2.0 * n);
    1.0 / (2.0 * angle.sin())
}

/// RBJ peaking EQ section
///
/// Gain at the center frequency is exactly `gain_db`; A = 10^(dB/40).
fn rbj_peak(sample_rate: f32, freq: f32, q: f32, gain_db: f32) -> Coefficients<f32> {
    let a = 10.0_f32.powf(gain_db / 40.0);
    let w0 = 2.0 * std::f32::consts::PI * freq / sample_rate;
    let (sin_w0, cos_w0) = w0.sin_cos();
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha / a;
    Coefficients {
        b0: (1.0 + alpha * a) / a0,
        b1: (-2.0 * cos_w0) / a0,
        b2: (1.0 - alpha * a) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha / a) / a0,
    }
}

/// RBJ second-order high-pass section with explicit Q
fn rbj_high_pass(sample_rate: f32, freq: f32, q: f32) -> Coefficients<f32> {
    let w0 = 2.0 * std::f32::consts::PI * freq / sample_rate;
    let (sin_w0, cos_w0) = w0.sin_cos();
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha;
    Coefficients {
        b0: ((1.0 + cos_w0) / 2.0) / a0,
        b1: (-(1.0 + cos_w0)) / a0,
        b2: ((1.0 + cos_w0) / 2.0) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// RBJ second-order low-pass section with explicit Q
fn rbj_low_pass(sample_rate: f32, freq: f32, q: f32) -> Coefficients<f32> {
    let w0 = 2.0 * std::f32::consts::PI * freq / sample_rate;
    let (sin_w0, cos_w0) = w0.sin_cos();
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha;
    Coefficients {
        b0: ((1.0 - cos_w0) / 2.0) / a0,
        b1: (1.0 - cos_w0) / a0,
        b2: ((1.0 - cos_w0) / 2.0) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Design the parametric peak section
pub fn design_peak(settings: &ChainSettings, sample_rate: f32) -> Coefficients<f32> {
    let freq = clamp_frequency(settings.peak_freq, sample_rate);
    let q = settings.peak_quality.max(MIN_DESIGN_Q);
    rbj_peak(sample_rate, freq, q, settings.peak_gain_db)
}

/// Design a Butterworth cut cascade as a fixed four-slot coefficient array
///
/// The selected slope determines the filter order (2 sections per 12 dB/Oct)
/// and therefore the per-section Q values; slots beyond the active count are
/// filled with unity coefficients. The returned shape is always `[_; 4]` so
/// a later slope change only flips bypass flags, never reshapes state.
fn design_cut_cascade(
    cutoff: f32,
    sample_rate: f32,
    slope: Slope,
    section: fn(f32, f32, f32) -> Coefficients<f32>,
) -> CutCoefficients {
    let freq = clamp_frequency(cutoff, sample_rate);
    let stages = slope.stage_count();
    let order = stages * 2;

    core::array::from_fn(|i| {
        if i < stages {
            section(sample_rate, freq, butterworth_q(i + 1, order))
        } else {
            identity()
        }
    })
}

/// Design the low-cut (high-pass) cascade
pub fn design_low_cut(settings: &ChainSettings, sample_rate: f32) -> CutCoefficients {
    design_cut_cascade(
        settings.low_cut_freq,
        sample_rate,
        settings.low_cut_slope,
        rbj_high_pass,
    )
}

/// Design the high-cut (low-pass) cascade
pub fn design_high_cut(settings: &ChainSettings, sample_rate: f32) -> CutCoefficients {
    design_cut_cascade(
        settings.high_cut_freq,
        sample_rate,
        settings.high_cut_slope,
        rbj_low_pass,
    )
}
