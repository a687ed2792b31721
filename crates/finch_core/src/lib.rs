//! Finch Core - EQ Engine
//!
//! This crate provides the engine around the Finch filter chain, including:
//! - Stereo processor driven by the host's audio callback
//! - Lock-free parameter store shared across threads
//! - Block FIFO transport from the audio thread to the analysis thread
//! - Analysis thread producing spectrum and response-curve events
//! - JSON persistence of the parameter state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        UI Thread                            │
//! │   setters──▶ ParameterStore ◀──events── AnalysisEngine      │
//! └─────────────────────────────────────────────────────────────┘
//!                     │ atomics                ▲ crossbeam-channel
//!                     ▼                        │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Audio Thread                           │
//! │   Host buffer ──▶ EqProcessor ──rtrb──▶ Analysis Thread     │
//! │              (Zero allocation in this path)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod analysis;
mod collector;
mod config;
mod error;
mod fifo;
mod message;
mod params;
mod processor;
mod state;

pub use analysis::AnalysisEngine;
pub use collector::SampleCollector;
pub use config::{AnalysisConfig, EngineConfig, StreamConfig};
pub use error::{EngineError, EngineResult};
pub use fifo::{block_fifo, BlockConsumer, BlockProducer};
pub use message::{Command, Event};
pub use params::ParameterStore;
pub use processor::EqProcessor;
pub use state::StoredState;

// Re-export DSP types for convenience
pub use finch_dsp::{ChainSettings, ChannelChain, Slope, NUM_BINS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Verify public API is accessible
        let _config = EngineConfig::default();
        let _params = ParameterStore::default();
    }
}
