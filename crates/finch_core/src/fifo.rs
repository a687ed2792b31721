//! Lock-Free Block FIFO
//!
//! Single-producer single-consumer transport carrying whole fixed-size
//! sample blocks from the audio thread to the analysis thread. Built on an
//! rtrb ring buffer sized in whole blocks; a block is transferred entirely
//! or not at all, so the consumer always pulls frame-aligned data.
//!
//! Ownership enforces the SPSC discipline: `BlockProducer` lives on the
//! audio side, `BlockConsumer` on the analysis side, and neither is `Clone`.

use rtrb::{Consumer, Producer, RingBuffer};

/// Writer end, owned by the audio thread
pub struct BlockProducer {
    producer: Producer<f32>,
    block_len: usize,
}

/// Reader end, owned by the analysis thread
pub struct BlockConsumer {
    consumer: Consumer<f32>,
    block_len: usize,
}

/// Create a FIFO holding up to `capacity_blocks` blocks of `block_len` samples
pub fn block_fifo(capacity_blocks: usize, block_len: usize) -> (BlockProducer, BlockConsumer) {
    let (producer, consumer) = RingBuffer::new(capacity_blocks * block_len);
    (
        BlockProducer {
            producer,
            block_len,
        },
        BlockConsumer {
            consumer,
            block_len,
        },
    )
}

impl BlockProducer {
    /// Push one complete block; returns false (dropping the block) when the
    /// ring lacks room for the whole thing
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls. A full ring costs one `slots()` check.
    pub fn push(&mut self, block: &[f32]) -> bool {
        debug_assert_eq!(block.len(), self.block_len);
        if self.producer.slots() < block.len() {
            return false;
        }

        match self.producer.write_chunk_uninit(block.len()) {
            Ok(mut chunk) => {
                let (first, second) = chunk.as_mut_slices();
                for (slot, sample) in first.iter_mut().zip(block.iter()) {
                    slot.write(*sample);
                }
                for (slot, sample) in second.iter_mut().zip(block[first.len()..].iter()) {
                    slot.write(*sample);
                }
                // Safety: every slot in the chunk was written above
                unsafe { chunk.commit_all() };
                true
            }
            Err(_) => false,
        }
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }
}

impl BlockConsumer {
    /// Pop one complete block into `out`; returns false when no full block
    /// is available, leaving `out` untouched
    pub fn pull(&mut self, out: &mut [f32]) -> bool {
        debug_assert_eq!(out.len(), self.block_len);
        if self.consumer.slots() < out.len() {
            return false;
        }

        match self.consumer.read_chunk(out.len()) {
            Ok(chunk) => {
                let (first, second) = chunk.as_slices();
                out[..first.len()].copy_from_slice(first);
                if !second.is_empty() {
                    out[first.len()..first.len() + second.len()].copy_from_slice(second);
                }
                chunk.commit_all();
                true
            }
            Err(_) => false,
        }
    }

    /// Whole blocks currently queued
    pub fn blocks_available(&self) -> usize {
        self.consumer.slots() / self.block_len
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 64;

    fn ramp(offset: f32) -> Vec<f32> {
        (0..BLOCK).map(|i| offset + i as f32).collect()
    }

    #[test]
    fn test_starts_empty() {
        let (_producer, mut consumer) = block_fifo(4, BLOCK);
        assert_eq!(consumer.blocks_available(), 0);

        let mut out = vec![0.0; BLOCK];
        assert!(!consumer.pull(&mut out));
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_blocks_cross_in_order() {
        let (mut producer, mut consumer) = block_fifo(4, BLOCK);
        assert!(producer.push(&ramp(100.0)));
        assert!(producer.push(&ramp(200.0)));
        assert_eq!(consumer.blocks_available(), 2);

        let mut out = vec![0.0; BLOCK];
        assert!(consumer.pull(&mut out));
        assert_eq!(out, ramp(100.0));
        assert!(consumer.pull(&mut out));
        assert_eq!(out, ramp(200.0));
        assert!(!consumer.pull(&mut out));
    }

    #[test]
    fn test_full_fifo_drops_whole_block() {
        let (mut producer, mut consumer) = block_fifo(2, BLOCK);
        assert!(producer.push(&ramp(0.0)));
        assert!(producer.push(&ramp(1.0)));
        // Third block must be refused outright, not partially written
        assert!(!producer.push(&ramp(2.0)));

        let mut out = vec![0.0; BLOCK];
        assert!(consumer.pull(&mut out));
        assert_eq!(out, ramp(0.0));

        // Space freed: pushing works again
        assert!(producer.push(&ramp(3.0)));
        assert!(consumer.pull(&mut out));
        assert_eq!(out, ramp(1.0));
        assert!(consumer.pull(&mut out));
        assert_eq!(out, ramp(3.0));
    }

    #[test]
    fn test_wraparound_keeps_blocks_intact() {
        let (mut producer, mut consumer) = block_fifo(3, BLOCK);
        let mut out = vec![0.0; BLOCK];

        // Cycle enough blocks through to wrap the ring several times
        for n in 0..20 {
            assert!(producer.push(&ramp(n as f32 * 10.0)));
            assert!(consumer.pull(&mut out));
            assert_eq!(out, ramp(n as f32 * 10.0));
        }
    }

    #[test]
    fn test_cross_thread_transfer() {
        let (mut producer, mut consumer) = block_fifo(8, BLOCK);

        let writer = std::thread::spawn(move || {
            let mut sent = 0;
            while sent < 100 {
                if producer.push(&ramp(sent as f32)) {
                    sent += 1;
                } else {
                    std::thread::yield_now();
                }
            }
        });

        let mut out = vec![0.0; BLOCK];
        let mut received = 0;
        while received < 100 {
            if consumer.pull(&mut out) {
                assert_eq!(out, ramp(received as f32));
                received += 1;
            } else {
                std::thread::yield_now();
            }
        }
        writer.join().unwrap();
    }
}
