//! Per-Channel Signal Chain
//!
//! Fixed topology: low-cut cascade -> peak section -> high-cut cascade.
//! One `ChannelChain` per audio channel; stereo uses two instances with
//! identical coefficients but independent delay-line state, because the two
//! channels' sample histories differ.

use crate::design::{design_high_cut, design_low_cut, design_peak};
use crate::error::DspError;
use crate::settings::ChainSettings;
use crate::stage::{CutCascade, FilterStage};

/// One channel's complete filter chain
pub struct ChannelChain {
    low_cut: CutCascade,
    peak: FilterStage,
    high_cut: CutCascade,
    sample_rate: f32,
}

impl ChannelChain {
    /// Create a chain at the given sample rate with flat default settings
    pub fn new(sample_rate: f32) -> Result<Self, DspError> {
        if !(sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }

        let settings = ChainSettings::default();
        Ok(Self {
            low_cut: CutCascade::new(
                &design_low_cut(&settings, sample_rate),
                settings.low_cut_slope,
            ),
            peak: FilterStage::new(design_peak(&settings, sample_rate)),
            high_cut: CutCascade::new(
                &design_high_cut(&settings, sample_rate),
                settings.high_cut_slope,
            ),
            sample_rate,
        })
    }

    /// Re-derive every coefficient set from a settings snapshot and hot-swap
    /// it into the stages
    ///
    /// Safe to call between blocks on the thread that owns this chain; the
    /// swap replaces immutable coefficient values and leaves delay lines
    /// intact, so there is no audible discontinuity.
    pub fn apply_settings(&mut self, settings: &ChainSettings) {
        self.low_cut
            .apply(&design_low_cut(settings, self.sample_rate), settings.low_cut_slope);
        self.peak
            .set_coefficients(design_peak(settings, self.sample_rate));
        self.high_cut.apply(
            &design_high_cut(settings, self.sample_rate),
            settings.high_cut_slope,
        );
    }

    /// Filter one channel's block in place
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls; O(n) in the block length.
    #[inline]
    pub fn process_block(&mut self, block: &mut [f32]) {
        self.low_cut.process_block(block);
        self.peak.process_block(block);
        self.high_cut.process_block(block);
    }

    /// Clear all delay lines without touching coefficients
    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn low_cut(&self) -> &CutCascade {
        &self.low_cut
    }

    pub fn low_cut_mut(&mut self) -> &mut CutCascade {
        &mut self.low_cut
    }

    pub fn peak(&self) -> &FilterStage {
        &self.peak
    }

    pub fn peak_mut(&mut self) -> &mut FilterStage {
        &mut self.peak
    }

    pub fn high_cut(&self) -> &CutCascade {
        &self.high_cut
    }

    pub fn high_cut_mut(&mut self) -> &mut CutCascade {
        &mut self.high_cut
    }
}
