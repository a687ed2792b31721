//! Persistent Parameter State
//!
//! Serializes the EQ parameters to JSON so a host can save a session and
//! restore it later. Slopes are stored as their index (0 = 12 dB/Oct) so the
//! on-disk format stays a flat bag of numbers; out-of-range values clamp on
//! load instead of failing the whole restore.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineResult;
use crate::params::ParameterStore;
use finch_dsp::{ChainSettings, Slope};

/// On-disk snapshot of every EQ parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_quality: f32,
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    /// Slope index: 0 = 12, 1 = 24, 2 = 36, 3 = 48 dB/Oct
    pub low_cut_slope: usize,
    pub high_cut_slope: usize,
}

impl Default for StoredState {
    fn default() -> Self {
        ChainSettings::default().into()
    }
}

impl From<ChainSettings> for StoredState {
    fn from(settings: ChainSettings) -> Self {
        Self {
            peak_freq: settings.peak_freq,
            peak_gain_db: settings.peak_gain_db,
            peak_quality: settings.peak_quality,
            low_cut_freq: settings.low_cut_freq,
            high_cut_freq: settings.high_cut_freq,
            low_cut_slope: settings.low_cut_slope as usize,
            high_cut_slope: settings.high_cut_slope as usize,
        }
    }
}

impl From<StoredState> for ChainSettings {
    fn from(state: StoredState) -> Self {
        Self {
            peak_freq: state.peak_freq,
            peak_gain_db: state.peak_gain_db,
            peak_quality: state.peak_quality,
            low_cut_freq: state.low_cut_freq,
            high_cut_freq: state.high_cut_freq,
            low_cut_slope: Slope::from_index(state.low_cut_slope),
            high_cut_slope: Slope::from_index(state.high_cut_slope),
        }
    }
}

impl StoredState {
    /// Capture the current parameters
    pub fn capture(params: &ParameterStore) -> Self {
        params.snapshot().into()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously saved JSON string
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Push this state into the live parameter store
    ///
    /// Setters clamp every value, so a state written by a newer build with
    /// wider ranges still restores to something usable. The store comes out
    /// dirty, which triggers the analysis mirror refresh; the audio thread
    /// picks the values up on its next block anyway.
    pub fn restore(&self, params: &ParameterStore) {
        params.apply(&ChainSettings::from(self.clone()));
        info!("Parameter state restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let state = StoredState {
            peak_freq: 2_000.0,
            peak_gain_db: -6.5,
            peak_quality: 3.0,
            low_cut_freq: 90.0,
            high_cut_freq: 14_000.0,
            low_cut_slope: 2,
            high_cut_slope: 1,
        };

        let json = state.to_json().unwrap();
        let parsed = StoredState::from_json(&json).unwrap();
        assert_eq!(state, parsed);
    }

    #[test]
    fn test_restore_marks_dirty_and_applies() {
        let params = ParameterStore::default();
        params.take_dirty();

        let state = StoredState {
            peak_gain_db: 12.0,
            low_cut_slope: 3,
            ..StoredState::default()
        };
        state.restore(&params);

        assert!(params.take_dirty());
        let snapshot = params.snapshot();
        assert_eq!(snapshot.peak_gain_db, 12.0);
        assert_eq!(snapshot.low_cut_slope, Slope::Db48);
    }

    #[test]
    fn test_restore_clamps_wild_values() {
        let params = ParameterStore::default();
        let state = StoredState {
            peak_freq: 1_000_000.0,
            peak_gain_db: -999.0,
            low_cut_slope: 42,
            ..StoredState::default()
        };
        state.restore(&params);

        let snapshot = params.snapshot();
        assert_eq!(snapshot.peak_freq, finch_dsp::MAX_FREQ_HZ);
        assert_eq!(snapshot.peak_gain_db, finch_dsp::MIN_GAIN_DB);
        assert_eq!(snapshot.low_cut_slope, Slope::Db48);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(StoredState::from_json("not json").is_err());
        assert!(StoredState::from_json("{\"peak_freq\": true}").is_err());
    }

    #[test]
    fn test_default_state_matches_default_settings() {
        let state = StoredState::default();
        let settings: ChainSettings = state.into();
        assert_eq!(settings, ChainSettings::default());
    }
}
