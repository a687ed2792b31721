//! Lock-Free Parameter Store
//!
//! Shared between the control surface (writer), the audio thread and the
//! analysis thread (readers). Float parameters live in `AtomicU32` cells
//! holding the f32 bit pattern, slopes in `AtomicUsize`, so readers never
//! block and writers never allocate.
//!
//! A dirty flag tells the analysis thread that its mirror chain is stale.
//! The audio thread does not consume the flag: it re-derives coefficients
//! from a fresh snapshot every block regardless, so a parameter change can
//! never be missed there.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use finch_dsp::{
    ChainSettings, Slope, MAX_FREQ_HZ, MAX_GAIN_DB, MAX_QUALITY, MIN_FREQ_HZ, MIN_GAIN_DB,
    MIN_QUALITY,
};

/// Atomic f32 cell (bit pattern stored in an AtomicU32)
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// All user-facing EQ parameters, readable from any thread
pub struct ParameterStore {
    peak_freq: AtomicF32,
    peak_gain_db: AtomicF32,
    peak_quality: AtomicF32,
    low_cut_freq: AtomicF32,
    high_cut_freq: AtomicF32,
    low_cut_slope: AtomicUsize,
    high_cut_slope: AtomicUsize,
    dirty: AtomicBool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ChainSettings::default())
    }
}

impl ParameterStore {
    pub fn new(settings: ChainSettings) -> Self {
        Self {
            peak_freq: AtomicF32::new(settings.peak_freq),
            peak_gain_db: AtomicF32::new(settings.peak_gain_db),
            peak_quality: AtomicF32::new(settings.peak_quality),
            low_cut_freq: AtomicF32::new(settings.low_cut_freq),
            high_cut_freq: AtomicF32::new(settings.high_cut_freq),
            low_cut_slope: AtomicUsize::new(settings.low_cut_slope as usize),
            high_cut_slope: AtomicUsize::new(settings.high_cut_slope as usize),
            dirty: AtomicBool::new(true),
        }
    }

    /// Read a coherent-enough snapshot of all parameters
    ///
    /// Individual fields are read independently; a writer racing with the
    /// snapshot can only yield a mix of old and new values, each of which is
    /// itself a valid, clamped parameter. The next block's snapshot settles.
    pub fn snapshot(&self) -> ChainSettings {
        ChainSettings {
            peak_freq: self.peak_freq.load(),
            peak_gain_db: self.peak_gain_db.load(),
            peak_quality: self.peak_quality.load(),
            low_cut_freq: self.low_cut_freq.load(),
            high_cut_freq: self.high_cut_freq.load(),
            low_cut_slope: Slope::from_index(self.low_cut_slope.load(Ordering::Relaxed)),
            high_cut_slope: Slope::from_index(self.high_cut_slope.load(Ordering::Relaxed)),
        }
    }

    /// Replace every parameter at once (state restore)
    pub fn apply(&self, settings: &ChainSettings) {
        self.set_peak_freq(settings.peak_freq);
        self.set_peak_gain_db(settings.peak_gain_db);
        self.set_peak_quality(settings.peak_quality);
        self.set_low_cut_freq(settings.low_cut_freq);
        self.set_high_cut_freq(settings.high_cut_freq);
        self.set_low_cut_slope(settings.low_cut_slope);
        self.set_high_cut_slope(settings.high_cut_slope);
    }

    pub fn set_peak_freq(&self, freq: f32) {
        self.peak_freq.store(freq.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ));
        self.mark_dirty();
    }

    pub fn set_peak_gain_db(&self, gain_db: f32) {
        self.peak_gain_db
            .store(gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB));
        self.mark_dirty();
    }

    pub fn set_peak_quality(&self, quality: f32) {
        self.peak_quality
            .store(quality.clamp(MIN_QUALITY, MAX_QUALITY));
        self.mark_dirty();
    }

    pub fn set_low_cut_freq(&self, freq: f32) {
        self.low_cut_freq
            .store(freq.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ));
        self.mark_dirty();
    }

    pub fn set_high_cut_freq(&self, freq: f32) {
        self.high_cut_freq
            .store(freq.clamp(MIN_FREQ_HZ, MAX_FREQ_HZ));
        self.mark_dirty();
    }

    pub fn set_low_cut_slope(&self, slope: Slope) {
        self.low_cut_slope.store(slope as usize, Ordering::Relaxed);
        self.mark_dirty();
    }

    pub fn set_high_cut_slope(&self, slope: Slope) {
        self.high_cut_slope.store(slope as usize, Ordering::Relaxed);
        self.mark_dirty();
    }

    /// Flag the analysis mirror as stale
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Consume the dirty flag; true means parameters changed since the last
    /// call. Single consumer: only the analysis thread should call this.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults_match_chain_settings() {
        let store = ParameterStore::default();
        assert_eq!(store.snapshot(), ChainSettings::default());
    }

    #[test]
    fn test_setters_clamp_to_range() {
        let store = ParameterStore::default();

        store.set_peak_freq(5.0);
        assert_eq!(store.snapshot().peak_freq, MIN_FREQ_HZ);

        store.set_peak_freq(90_000.0);
        assert_eq!(store.snapshot().peak_freq, MAX_FREQ_HZ);

        store.set_peak_gain_db(100.0);
        assert_eq!(store.snapshot().peak_gain_db, MAX_GAIN_DB);

        store.set_peak_quality(0.0);
        assert_eq!(store.snapshot().peak_quality, MIN_QUALITY);
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let store = ParameterStore::default();
        // A fresh store is dirty so the mirror does its initial design pass
        assert!(store.take_dirty());
        assert!(!store.take_dirty());

        store.set_low_cut_freq(120.0);
        assert!(store.take_dirty());
        assert!(!store.take_dirty());
    }

    #[test]
    fn test_apply_restores_everything() {
        let store = ParameterStore::default();
        let settings = ChainSettings {
            peak_freq: 2_500.0,
            peak_gain_db: -12.0,
            peak_quality: 4.0,
            low_cut_freq: 80.0,
            high_cut_freq: 15_000.0,
            low_cut_slope: Slope::Db36,
            high_cut_slope: Slope::Db24,
        };
        store.apply(&settings);
        assert_eq!(store.snapshot(), settings);
    }

    #[test]
    fn test_cross_thread_visibility() {
        let store = Arc::new(ParameterStore::default());
        store.take_dirty();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store.set_peak_gain_db(6.0);
            })
        };
        writer.join().unwrap();

        assert!(store.take_dirty());
        assert_eq!(store.snapshot().peak_gain_db, 6.0);
    }
}
