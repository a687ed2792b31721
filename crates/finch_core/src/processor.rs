//! EQ Processor
//!
//! The audio-thread side of the engine: two channel chains (left/right), the
//! sample collectors feeding the analysis FIFOs, and the per-block parameter
//! pickup. The host calls `prepare` once with its stream configuration, then
//! `process_planar` or `process_interleaved` from its audio callback.
//!
//! Coefficients are re-derived from a parameter snapshot at the top of every
//! block. The design math is cheap relative to filtering the block itself,
//! and it guarantees a parameter write can never be missed between blocks.

use std::sync::Arc;

use tracing::info;

use crate::collector::SampleCollector;
use crate::config::StreamConfig;
use crate::error::{EngineError, EngineResult};
use crate::fifo::BlockConsumer;
use crate::params::ParameterStore;
use finch_dsp::ChannelChain;

/// Stereo EQ processor driven by the host audio callback
pub struct EqProcessor {
    params: Arc<ParameterStore>,
    chains: Option<(ChannelChain, ChannelChain)>,
    left_collector: SampleCollector,
    right_collector: SampleCollector,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
    block_size: usize,
}

impl EqProcessor {
    pub fn new(params: Arc<ParameterStore>) -> Self {
        Self {
            params,
            chains: None,
            left_collector: SampleCollector::new(),
            right_collector: SampleCollector::new(),
            scratch_left: Vec::new(),
            scratch_right: Vec::new(),
            block_size: 0,
        }
    }

    /// Build the chains for a stream configuration and hand back the two
    /// analysis FIFO consumers (left, right)
    ///
    /// Allocates; call from setup before the stream starts. Calling again
    /// reconfigures from scratch and orphans the previous consumers.
    pub fn prepare(
        &mut self,
        config: &StreamConfig,
        fifo_blocks: usize,
    ) -> EngineResult<(BlockConsumer, BlockConsumer)> {
        config.validate().map_err(EngineError::ConfigError)?;

        let sample_rate = config.sample_rate as f32;
        let block_size = config.block_size as usize;

        let mut left = ChannelChain::new(sample_rate)?;
        let mut right = ChannelChain::new(sample_rate)?;
        let settings = self.params.snapshot();
        left.apply_settings(&settings);
        right.apply_settings(&settings);
        self.chains = Some((left, right));

        let left_consumer = self.left_collector.prepare(block_size, fifo_blocks);
        let right_consumer = self.right_collector.prepare(block_size, fifo_blocks);
        self.scratch_left = vec![0.0; block_size];
        self.scratch_right = vec![0.0; block_size];
        self.block_size = block_size;

        info!(
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            "processor prepared"
        );
        Ok((left_consumer, right_consumer))
    }

    pub fn is_prepared(&self) -> bool {
        self.chains.is_some()
    }

    /// Pull the latest parameters into both chains
    ///
    /// Runs automatically at the top of every processed block; exposed so a
    /// host can also force a refresh outside the stream (state restore with
    /// the transport stopped).
    pub fn update_filters(&mut self) {
        if let Some((left, right)) = self.chains.as_mut() {
            let settings = self.params.snapshot();
            left.apply_settings(&settings);
            right.apply_settings(&settings);
        }
    }

    /// Process one stereo block with separate channel buffers, in place
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls.
    pub fn process_planar(&mut self, left: &mut [f32], right: &mut [f32]) -> EngineResult<()> {
        self.update_filters();
        let Some((left_chain, right_chain)) = self.chains.as_mut() else {
            return Err(EngineError::NotPrepared);
        };

        left_chain.process_block(left);
        right_chain.process_block(right);

        self.left_collector.update(left);
        self.right_collector.update(right);
        Ok(())
    }

    /// Process one interleaved stereo block (LRLR...), in place
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) -> EngineResult<()> {
        if !self.is_prepared() {
            return Err(EngineError::NotPrepared);
        }
        let frames = buffer.len() / 2;
        if frames > self.block_size {
            return Err(EngineError::BlockSizeMismatch {
                expected: self.block_size,
                got: frames,
            });
        }

        for (i, frame) in buffer.chunks_exact(2).enumerate() {
            self.scratch_left[i] = frame[0];
            self.scratch_right[i] = frame[1];
        }

        // Split borrows so process_planar stays the single code path
        let (scratch_left, scratch_right) = {
            let left = std::mem::take(&mut self.scratch_left);
            let right = std::mem::take(&mut self.scratch_right);
            (left, right)
        };
        let mut left = scratch_left;
        let mut right = scratch_right;
        let result = self.process_planar(&mut left[..frames], &mut right[..frames]);
        self.scratch_left = left;
        self.scratch_right = right;
        result?;

        for (i, frame) in buffer.chunks_exact_mut(2).enumerate() {
            frame[0] = self.scratch_left[i];
            frame[1] = self.scratch_right[i];
        }
        Ok(())
    }

    /// Magnitude response of the current chain, one dB value per pixel
    pub fn response_curve(&self, width: usize) -> EngineResult<Vec<f64>> {
        let Some((left, _)) = self.chains.as_ref() else {
            return Err(EngineError::NotPrepared);
        };
        Ok(left.response_curve(width))
    }

    /// Clear all delay lines (transport restart)
    pub fn reset(&mut self) {
        if let Some((left, right)) = self.chains.as_mut() {
            left.reset();
            right.reset();
        }
    }

    pub fn params(&self) -> &Arc<ParameterStore> {
        &self.params
    }
}
