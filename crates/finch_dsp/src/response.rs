//! Frequency Response Sampler
//!
//! Evaluates the combined magnitude response of a channel chain at N
//! frequency points, log-spaced over the audible range, for the display
//! layer. Pure and deterministic: identical coefficients and sample rate
//! produce bit-identical output.

use biquad::Coefficients;
use rustfft::num_complex::Complex;

use crate::chain::ChannelChain;

/// Response curve frequency range (Hz)
pub const CURVE_MIN_HZ: f64 = 20.0;
pub const CURVE_MAX_HZ: f64 = 20_000.0;

/// Floor applied to the linear magnitude before the dB conversion, so a
/// deep notch clamps to -180 dB instead of -infinity.
pub const MAGNITUDE_FLOOR: f64 = 1e-9;

/// Map t in [0, 1] log-uniformly onto [min, max]
#[inline]
pub fn map_to_log10(t: f64, min: f64, max: f64) -> f64 {
    min * (max / min).powf(t)
}

/// Magnitude of one BiQuad section at a frequency
///
/// Evaluates |H(z)| on the unit circle at z = e^{j 2 pi f / fs}; the
/// `Coefficients` are normalized with a0 = 1.
pub fn stage_magnitude(coeffs: &Coefficients<f32>, freq: f64, sample_rate: f64) -> f64 {
    let w = 2.0 * std::f64::consts::PI * freq / sample_rate;
    let z1 = Complex::from_polar(1.0, -w);
    let z2 = z1 * z1;

    let num = Complex::new(coeffs.b0 as f64, 0.0)
        + Complex::new(coeffs.b1 as f64, 0.0) * z1
        + Complex::new(coeffs.b2 as f64, 0.0) * z2;
    let den = Complex::new(1.0, 0.0)
        + Complex::new(coeffs.a1 as f64, 0.0) * z1
        + Complex::new(coeffs.a2 as f64, 0.0) * z2;

    (num / den).norm()
}

impl ChannelChain {
    /// Combined chain gain in dB at a single frequency
    ///
    /// Multiplies in every non-bypassed stage across both cut cascades and
    /// the peak section, then converts to decibels with a floor.
    pub fn response_db_at(&self, freq: f64) -> f64 {
        let sample_rate = self.sample_rate() as f64;
        let mut magnitude = 1.0_f64;

        if !self.peak().is_bypassed() {
            magnitude *= stage_magnitude(self.peak().coefficients(), freq, sample_rate);
        }
        for stage in self.low_cut().stages() {
            if !stage.is_bypassed() {
                magnitude *= stage_magnitude(stage.coefficients(), freq, sample_rate);
            }
        }
        for stage in self.high_cut().stages() {
            if !stage.is_bypassed() {
                magnitude *= stage_magnitude(stage.coefficients(), freq, sample_rate);
            }
        }

        20.0 * magnitude.max(MAGNITUDE_FLOOR).log10()
    }

    /// Sample the chain's magnitude response at `width` log-spaced points
    ///
    /// One value per horizontal display pixel, in dB, covering 20 Hz to
    /// 20 kHz. Allocates; call from the display side, not the audio thread.
    pub fn response_curve(&self, width: usize) -> Vec<f64> {
        (0..width)
            .map(|i| {
                let freq = map_to_log10(i as f64 / width as f64, CURVE_MIN_HZ, CURVE_MAX_HZ);
                self.response_db_at(freq)
            })
            .collect()
    }
}
