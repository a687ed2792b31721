//! Filter Chain Settings
//!
//! A `ChainSettings` value is an immutable snapshot of every user-facing
//! parameter, taken once per update cycle. The audio thread and the display
//! mirror chain both derive their coefficients from such snapshots; nothing
//! downstream ever reads a live parameter directly.

/// Lowest audible frequency handled by the EQ (Hz)
pub const MIN_FREQ_HZ: f32 = 20.0;

/// Highest audible frequency handled by the EQ (Hz)
pub const MAX_FREQ_HZ: f32 = 20_000.0;

/// Peak gain range (dB)
pub const MIN_GAIN_DB: f32 = -24.0;
pub const MAX_GAIN_DB: f32 = 24.0;

/// Peak quality (Q) range
pub const MIN_QUALITY: f32 = 0.1;
pub const MAX_QUALITY: f32 = 10.0;

/// Cut filter steepness in dB per octave
///
/// Encoded as stage-count-minus-one: a cascade at slope `s` runs
/// `s as usize + 1` second-order sections (12 dB/Oct each).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Slope {
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    /// Number of active second-order sections for this slope (1..=4)
    #[inline]
    pub fn stage_count(self) -> usize {
        self as usize + 1
    }

    /// Rolloff in dB per octave (12, 24, 36 or 48)
    pub fn db_per_octave(self) -> u32 {
        (self as u32 + 1) * 12
    }

    /// Build from a zero-based index, clamping out-of-range values to 48 dB/Oct
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }
}

impl Default for Slope {
    fn default() -> Self {
        Slope::Db12
    }
}

/// Snapshot of all filter parameters
///
/// Passed by value between threads; there is no shared mutable state here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_quality: f32,
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
}

impl Default for ChainSettings {
    fn default() -> Self {
        // Defaults give a flat response: cuts parked at the range edges,
        // peak at 750 Hz with 0 dB gain.
        Self {
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_freq: MIN_FREQ_HZ,
            high_cut_freq: MAX_FREQ_HZ,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}
