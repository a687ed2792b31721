//! Finch DSP - Three-Band Equalizer Core
//!
//! This crate provides the filter pipeline for Finch, including:
//! - Low-cut / parametric peak / high-cut chain per audio channel
//! - Butterworth cut cascades up to 48 dB/Oct, built from BiQuad sections
//! - RBJ cookbook coefficient design, pure and deterministic
//! - Frequency response sampling for the curve display
//! - FFT spectrum analyzer for the input visualization
//!
//! # Architecture
//!
//! The processing path follows a strict "no allocation in audio callback"
//! rule. Coefficients are designed off the hot loop from a settings snapshot
//! and hot-swapped between blocks; delay-line state survives every swap.

mod chain;
mod design;
mod error;
mod response;
mod settings;
mod spectrum;
mod stage;

pub use chain::ChannelChain;
pub use design::{
    design_high_cut, design_low_cut, design_peak, identity, CutCoefficients, CUT_STAGES,
};
pub use error::DspError;
pub use response::{map_to_log10, stage_magnitude, CURVE_MAX_HZ, CURVE_MIN_HZ, MAGNITUDE_FLOOR};
pub use settings::{
    ChainSettings, Slope, MAX_FREQ_HZ, MAX_GAIN_DB, MAX_QUALITY, MIN_FREQ_HZ, MIN_GAIN_DB,
    MIN_QUALITY,
};
pub use spectrum::{SpectrumAnalyzer, FFT_SIZE, NUM_BINS};
pub use stage::{CutCascade, FilterStage};
