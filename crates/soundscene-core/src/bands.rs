//! Named frequency bands and per-band energy extraction.

use serde::{Deserialize, Serialize};

use crate::spectrum::FrequencySnapshot;

/// Number of named bands
pub const NUM_BANDS: usize = 5;

/// Assumed top of the spectrum, in Hz.
///
/// Band index ranges are a linear proportion of this ceiling regardless
/// of the actual device sample rate. The approximation is part of the
/// detector's contract; the tests pin it.
pub const SPECTRUM_CEILING_HZ: f32 = 20_000.0;

/// Band boundaries (Hz): bass, low mid, mid, high mid, treble
const BAND_EDGES_HZ: [(f32, f32); NUM_BANDS] = [
    (20.0, 250.0),
    (250.0, 500.0),
    (500.0, 2000.0),
    (2000.0, 6000.0),
    (6000.0, 20_000.0),
];

/// One of the five named frequency sub-ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    Bass,
    LowMid,
    Mid,
    HighMid,
    Treble,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; NUM_BANDS] = [
        FrequencyBand::Bass,
        FrequencyBand::LowMid,
        FrequencyBand::Mid,
        FrequencyBand::HighMid,
        FrequencyBand::Treble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FrequencyBand::Bass => "bass",
            FrequencyBand::LowMid => "low mid",
            FrequencyBand::Mid => "mid",
            FrequencyBand::HighMid => "high mid",
            FrequencyBand::Treble => "treble",
        }
    }

    pub fn range_hz(self) -> (f32, f32) {
        BAND_EDGES_HZ[self as usize]
    }

    /// The snapshot index range covering this band, proportional to the
    /// fixed 20 kHz ceiling.
    pub fn index_range(self, bin_count: usize) -> (usize, usize) {
        let (low_hz, high_hz) = self.range_hz();
        let low = (low_hz / SPECTRUM_CEILING_HZ * bin_count as f32).floor() as usize;
        let high = (high_hz / SPECTRUM_CEILING_HZ * bin_count as f32).floor() as usize;
        (low.min(bin_count), high.min(bin_count))
    }
}

/// Per-band average energies for one frame, each normalized to 0-1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandLevels {
    pub bass: f32,
    pub low_mid: f32,
    pub mid: f32,
    pub high_mid: f32,
    pub treble: f32,
}

impl BandLevels {
    /// Extract all five band energies from a frequency snapshot.
    pub fn from_snapshot(snapshot: &FrequencySnapshot) -> Self {
        let mut levels = Self::default();
        for band in FrequencyBand::ALL {
            *levels.get_mut(band) = band_energy(snapshot, band);
        }
        levels
    }

    pub fn get(&self, band: FrequencyBand) -> f32 {
        match band {
            FrequencyBand::Bass => self.bass,
            FrequencyBand::LowMid => self.low_mid,
            FrequencyBand::Mid => self.mid,
            FrequencyBand::HighMid => self.high_mid,
            FrequencyBand::Treble => self.treble,
        }
    }

    fn get_mut(&mut self, band: FrequencyBand) -> &mut f32 {
        match band {
            FrequencyBand::Bass => &mut self.bass,
            FrequencyBand::LowMid => &mut self.low_mid,
            FrequencyBand::Mid => &mut self.mid,
            FrequencyBand::HighMid => &mut self.high_mid,
            FrequencyBand::Treble => &mut self.treble,
        }
    }

    /// Mean of the five bands - the "overall" level the beat detector
    /// thresholds against.
    pub fn average(&self) -> f32 {
        (self.bass + self.low_mid + self.mid + self.high_mid + self.treble) / NUM_BANDS as f32
    }
}

/// Average byte magnitude within one band's index range, normalized to
/// 0-1. An empty range yields 0.
pub fn band_energy(snapshot: &FrequencySnapshot, band: FrequencyBand) -> f32 {
    let (low, high) = band.index_range(snapshot.len());
    if high <= low {
        return 0.0;
    }

    let sum: u32 = snapshot.as_bytes()[low..high].iter().map(|&b| b as u32).sum();
    sum as f32 / (high - low) as f32 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::SPECTRUM_BINS;

    fn snapshot_with(range: std::ops::Range<usize>, value: u8) -> FrequencySnapshot {
        let mut bins = vec![0u8; SPECTRUM_BINS];
        for b in &mut bins[range] {
            *b = value;
        }
        FrequencySnapshot::from_bytes(bins)
    }

    #[test]
    fn index_ranges_use_fixed_ceiling() {
        // bass covers 20-250 Hz of an assumed 20 kHz span
        let (low, high) = FrequencyBand::Bass.index_range(2048);
        assert_eq!(low, (20.0 / 20_000.0 * 2048.0) as usize);
        assert_eq!(high, (250.0 / 20_000.0 * 2048.0) as usize);

        // treble runs to the end of the snapshot
        let (_, top) = FrequencyBand::Treble.index_range(2048);
        assert_eq!(top, 2048);
    }

    #[test]
    fn silence_has_zero_levels() {
        let snapshot = FrequencySnapshot::silent();
        let levels = BandLevels::from_snapshot(&snapshot);

        for band in FrequencyBand::ALL {
            assert_eq!(levels.get(band), 0.0);
        }
        assert_eq!(levels.average(), 0.0);
    }

    #[test]
    fn bass_heavy_snapshot_reads_as_bass() {
        // Energy concentrated in the bass index range only
        let (low, high) = FrequencyBand::Bass.index_range(SPECTRUM_BINS);
        let snapshot = snapshot_with(low..high, 255);
        let levels = BandLevels::from_snapshot(&snapshot);

        assert!(levels.bass > 0.9, "bass = {}", levels.bass);
        assert!(levels.treble < 0.01, "treble = {}", levels.treble);
    }

    #[test]
    fn treble_heavy_snapshot_reads_as_treble() {
        let (low, high) = FrequencyBand::Treble.index_range(SPECTRUM_BINS);
        let snapshot = snapshot_with(low..high, 200);
        let levels = BandLevels::from_snapshot(&snapshot);

        assert!(levels.treble > 0.7);
        assert!(levels.bass < 0.01);
    }

    #[test]
    fn average_is_mean_of_bands() {
        let levels = BandLevels {
            bass: 1.0,
            low_mid: 0.5,
            mid: 0.0,
            high_mid: 0.5,
            treble: 0.0,
        };
        assert!((levels.average() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn empty_index_range_yields_zero() {
        // A tiny snapshot where the bass range collapses to nothing
        let snapshot = FrequencySnapshot::from_bytes(vec![255; 4]);
        assert_eq!(band_energy(&snapshot, FrequencyBand::Bass), 0.0);
    }
}
