//! Filter Stages and Cut Cascades
//!
//! A `FilterStage` is one IIR section: a BiQuad runtime plus the coefficient
//! set it was last given and a bypass flag. A `CutCascade` is a fixed array
//! of four stages realizing a Butterworth high-order cut; stages beyond the
//! selected slope stay allocated but bypassed, so changing the slope never
//! touches filter state layout.
//!
//! # Real-time Safety
//! `process_block` performs no allocations and no syscalls. Coefficient
//! replacement swaps an immutable `Coefficients` value; the delay lines are
//! left intact so a mid-stream update does not click.

use biquad::{Biquad, Coefficients, DirectForm2Transposed};

use crate::design::{CutCoefficients, CUT_STAGES};
use crate::settings::Slope;

/// One IIR filter section with its own state and bypass flag
pub struct FilterStage {
    // DirectForm2Transposed: better numerical stability than DF1
    filter: DirectForm2Transposed<f32>,
    coefficients: Coefficients<f32>,
    bypassed: bool,
}

impl FilterStage {
    pub fn new(coefficients: Coefficients<f32>) -> Self {
        Self {
            filter: DirectForm2Transposed::<f32>::new(coefficients),
            coefficients,
            bypassed: false,
        }
    }

    /// Replace the active coefficient set, keeping the delay lines
    pub fn set_coefficients(&mut self, coefficients: Coefficients<f32>) {
        self.coefficients = coefficients;
        self.filter.update_coefficients(coefficients);
    }

    /// Coefficients currently driving this stage (for response sampling)
    pub fn coefficients(&self) -> &Coefficients<f32> {
        &self.coefficients
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Filter a block in place; a bypassed stage is a strict identity
    #[inline]
    pub fn process_block(&mut self, block: &mut [f32]) {
        if self.bypassed {
            return;
        }
        for sample in block.iter_mut() {
            *sample = self.filter.run(*sample);
        }
    }

    /// Clear the delay lines (call when the input stream restarts)
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }
}

/// Four cascaded stages forming one high-order cut filter
pub struct CutCascade {
    stages: [FilterStage; CUT_STAGES],
}

impl CutCascade {
    pub fn new(coefficients: &CutCoefficients, slope: Slope) -> Self {
        let mut cascade = Self {
            stages: core::array::from_fn(|i| FilterStage::new(coefficients[i])),
        };
        cascade.apply(coefficients, slope);
        cascade
    }

    /// Install a fresh coefficient array and bypass pattern
    ///
    /// All four stages get their coefficient references first, then the
    /// bypass flags are set: stages `[0, slope.stage_count())` are active,
    /// the rest pass through. `active = slope index + 1` is the whole
    /// slope-to-stage mapping.
    pub fn apply(&mut self, coefficients: &CutCoefficients, slope: Slope) {
        for (stage, coeffs) in self.stages.iter_mut().zip(coefficients.iter()) {
            stage.set_coefficients(*coeffs);
        }
        let active = slope.stage_count();
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.set_bypassed(i >= active);
        }
    }

    /// Bypass the whole cascade (host bypass control)
    ///
    /// The next `apply` restores the slope's bypass pattern.
    pub fn bypass_all(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.set_bypassed(true);
        }
    }

    /// Run every active stage over the block, in order
    #[inline]
    pub fn process_block(&mut self, block: &mut [f32]) {
        for stage in self.stages.iter_mut() {
            stage.process_block(block);
        }
    }

    pub fn stages(&self) -> &[FilterStage; CUT_STAGES] {
        &self.stages
    }

    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }
}
