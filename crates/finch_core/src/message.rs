//! Message Types for Thread Communication
//!
//! Commands flow from UI thread -> Analysis thread
//! Events flow from Analysis thread -> UI thread

use serde::{Deserialize, Serialize};

use finch_dsp::NUM_BINS;

/// Commands sent from the UI to the analysis engine
#[derive(Debug, Clone)]
pub enum Command {
    /// Re-send the latest response curve even if parameters are clean
    RequestCurve,

    /// Clear the spectrum history (e.g. after a transport stop)
    ResetSpectrum,

    /// Shut the analysis thread down
    Shutdown,
}

/// Events sent from the analysis engine to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    /// FFT spectrum data update for visualization
    /// Sent at the configured refresh rate while audio flows, containing
    /// logarithmically-spaced frequency bin magnitudes for display.
    SpectrumUpdate {
        /// Array of 32 frequency bin magnitudes (0.0 to 1.0)
        bins: Vec<f32>,
    },

    /// Re-sampled magnitude response after a parameter change
    ResponseCurve {
        /// One dB value per display pixel, 20 Hz to 20 kHz log-spaced
        points: Vec<f64>,
    },

    /// Error occurred
    Error { message: String },
}

impl Event {
    /// Create an error event from any error type
    pub fn error<E: std::fmt::Display>(err: E) -> Self {
        Event::Error {
            message: err.to_string(),
        }
    }

    /// Spectrum event from a bin array
    pub fn spectrum(bins: [f32; NUM_BINS]) -> Self {
        Event::SpectrumUpdate {
            bins: bins.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = Event::spectrum([0.25; NUM_BINS]);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("SpectrumUpdate"));

        let deserialized: Event = serde_json::from_str(&json).unwrap();
        if let Event::SpectrumUpdate { bins } = deserialized {
            assert_eq!(bins.len(), NUM_BINS);
            assert_eq!(bins[0], 0.25);
        } else {
            panic!("Deserialization produced wrong variant");
        }
    }

    #[test]
    fn test_error_event() {
        let event = Event::error("Test error message");
        if let Event::Error { message } = event {
            assert_eq!(message, "Test error message");
        } else {
            panic!("Should be Error variant");
        }
    }

    #[test]
    fn test_curve_event_roundtrip() {
        let event = Event::ResponseCurve {
            points: vec![0.0, -3.0, 6.0],
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        if let Event::ResponseCurve { points } = deserialized {
            assert_eq!(points, vec![0.0, -3.0, 6.0]);
        } else {
            panic!("Wrong variant");
        }
    }
}
