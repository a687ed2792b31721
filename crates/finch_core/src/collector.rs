//! Sample Collector
//!
//! Accumulates the audio callback's samples (whatever length the host hands
//! over) into fixed-size blocks and ships each completed block through the
//! block FIFO to the analysis thread. One collector per channel.

use crate::fifo::{block_fifo, BlockConsumer, BlockProducer};

/// Gathers samples into fixed blocks for the analysis side
pub struct SampleCollector {
    buffer: Vec<f32>,
    cursor: usize,
    producer: Option<BlockProducer>,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            producer: None,
        }
    }

    /// Size the collector for a block length and hand back the consumer end
    ///
    /// Allocates; call from setup, never from the audio callback. Any
    /// previously returned consumer is orphaned and will simply run dry.
    pub fn prepare(&mut self, block_len: usize, capacity_blocks: usize) -> BlockConsumer {
        let (producer, consumer) = block_fifo(capacity_blocks.max(1), block_len);
        self.buffer = vec![0.0; block_len];
        self.cursor = 0;
        self.producer = Some(producer);
        consumer
    }

    pub fn is_prepared(&self) -> bool {
        self.producer.is_some()
    }

    pub fn block_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a run of samples; each time the internal block fills it is pushed
    /// to the FIFO and the fill restarts
    ///
    /// A full FIFO drops the completed block and keeps collecting; analysis
    /// data is best-effort and must never stall the audio thread.
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls.
    pub fn update(&mut self, samples: &[f32]) {
        let Some(producer) = self.producer.as_mut() else {
            debug_assert!(false, "update() before prepare()");
            return;
        };

        for &sample in samples {
            self.buffer[self.cursor] = sample;
            self.cursor += 1;
            if self.cursor == self.buffer.len() {
                producer.push(&self.buffer);
                self.cursor = 0;
            }
        }
    }
}

impl Default for SampleCollector {
    fn default() -> Self {
        Self::new()
    }
}
