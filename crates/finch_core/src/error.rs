//! Engine Error Types

use thiserror::Error;

/// Errors that can occur in the EQ engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Processor not prepared - call prepare() before processing")]
    NotPrepared,

    #[error("Stream configuration error: {0}")]
    ConfigError(String),

    #[error("Block size mismatch: expected {expected} frames, got {got}")]
    BlockSizeMismatch { expected: usize, got: usize },

    #[error("Failed to spawn analysis thread: {0}")]
    ThreadSpawnError(String),

    #[error("State parse error: {0}")]
    StateParseError(#[from] serde_json::Error),

    #[error("DSP error: {0}")]
    DspError(#[from] finch_dsp::DspError),

    #[error("Channel send error - receiver dropped")]
    ChannelSendError,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::NotPrepared;
        assert!(err.to_string().contains("prepare()"));

        let err = EngineError::BlockSizeMismatch {
            expected: 512,
            got: 256,
        };
        assert!(err.to_string().contains("512"));
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_error_from_dsp() {
        let dsp_err = finch_dsp::DspError::InvalidSampleRate(0.0);
        let engine_err: EngineError = dsp_err.into();
        assert!(matches!(engine_err, EngineError::DspError(_)));
    }
}
