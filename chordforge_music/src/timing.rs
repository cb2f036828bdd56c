// Chord-change timing: how long each chord of a progression is held.
//
// Instead of "one chord per bar", a curated library of chord-change patterns
// shapes the phrase. Patterns are keyed by (chord count, bar count); each key
// has several hand-authored alternatives whose beat durations sum to exactly
// `bars * 4`. `plan` draws one alternative uniformly. A key with no entry
// falls back to an even split, which may leave chords on fractional beats
// (see `rhythm::ChordMap` for how those land on the onset grid).
//
// The built-in library is plain data below. A replacement can be loaded from
// JSON; it is validated on load so every pattern it hands out is well formed.

use crate::error::ConfigError;
use chordforge_prng::RandomSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Beats per 4/4 bar.
pub const BEATS_PER_BAR: f64 = 4.0;

const SUM_TOLERANCE: f64 = 1e-9;

type PatternTable = &'static [(usize, u32, &'static [&'static [f64]])];

/// (chord count, bar count, alternatives).
const BUILTIN_PATTERNS: PatternTable = &[
    // 4 bars = 16 beats
    (3, 4, &[&[8.0, 4.0, 4.0], &[4.0, 4.0, 8.0], &[6.0, 6.0, 4.0], &[4.0, 8.0, 4.0]]),
    (4, 4, &[&[4.0, 4.0, 4.0, 4.0], &[6.0, 2.0, 4.0, 4.0], &[4.0, 4.0, 6.0, 2.0], &[8.0, 2.0, 2.0, 4.0]]),
    (5, 4, &[&[4.0, 4.0, 4.0, 2.0, 2.0], &[4.0, 2.0, 2.0, 4.0, 4.0], &[2.0, 2.0, 4.0, 4.0, 4.0], &[3.0, 3.0, 2.0, 4.0, 4.0]]),
    (6, 4, &[&[4.0, 2.0, 2.0, 4.0, 2.0, 2.0], &[2.0, 2.0, 4.0, 2.0, 2.0, 4.0], &[4.0, 4.0, 2.0, 2.0, 2.0, 2.0]]),
    (7, 4, &[&[4.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0], &[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 4.0], &[2.0, 2.0, 4.0, 2.0, 2.0, 2.0, 2.0]]),
    (8, 4, &[&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0], &[3.0, 1.0, 2.0, 2.0, 3.0, 1.0, 2.0, 2.0], &[4.0, 2.0, 2.0, 2.0, 2.0, 1.0, 1.0, 2.0]]),
    // 8 bars = 32 beats
    (3, 8, &[&[16.0, 8.0, 8.0], &[8.0, 8.0, 16.0], &[12.0, 12.0, 8.0], &[8.0, 16.0, 8.0]]),
    (4, 8, &[&[8.0, 8.0, 8.0, 8.0], &[12.0, 4.0, 8.0, 8.0], &[8.0, 8.0, 12.0, 4.0], &[6.0, 10.0, 8.0, 8.0]]),
    (5, 8, &[&[8.0, 8.0, 4.0, 4.0, 8.0], &[8.0, 4.0, 4.0, 8.0, 8.0], &[4.0, 4.0, 8.0, 8.0, 8.0], &[6.0, 6.0, 4.0, 8.0, 8.0]]),
    (6, 8, &[&[8.0, 4.0, 4.0, 8.0, 4.0, 4.0], &[4.0, 4.0, 8.0, 4.0, 4.0, 8.0], &[8.0, 8.0, 4.0, 4.0, 4.0, 4.0]]),
    (7, 8, &[&[8.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0], &[4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 8.0], &[4.0, 4.0, 8.0, 4.0, 4.0, 4.0, 4.0]]),
    (8, 8, &[&[4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0], &[6.0, 2.0, 4.0, 4.0, 6.0, 2.0, 4.0, 4.0], &[8.0, 4.0, 4.0, 4.0, 4.0, 2.0, 2.0, 4.0]]),
    // 16 bars = 64 beats
    (3, 16, &[&[32.0, 16.0, 16.0], &[16.0, 16.0, 32.0], &[24.0, 24.0, 16.0], &[16.0, 32.0, 16.0]]),
    (4, 16, &[&[16.0, 16.0, 16.0, 16.0], &[24.0, 8.0, 16.0, 16.0], &[16.0, 16.0, 24.0, 8.0], &[20.0, 12.0, 16.0, 16.0]]),
    (5, 16, &[&[16.0, 16.0, 8.0, 8.0, 16.0], &[16.0, 8.0, 8.0, 16.0, 16.0], &[8.0, 8.0, 16.0, 16.0, 16.0], &[12.0, 12.0, 8.0, 16.0, 16.0]]),
    (6, 16, &[&[16.0, 8.0, 8.0, 16.0, 8.0, 8.0], &[8.0, 8.0, 16.0, 8.0, 8.0, 16.0], &[16.0, 16.0, 8.0, 8.0, 8.0, 8.0], &[12.0, 4.0, 8.0, 16.0, 12.0, 12.0]]),
    (7, 16, &[&[16.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0], &[8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 16.0], &[8.0, 8.0, 16.0, 8.0, 8.0, 8.0, 8.0], &[12.0, 4.0, 8.0, 8.0, 8.0, 8.0, 16.0]]),
    (8, 16, &[&[8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0], &[12.0, 4.0, 8.0, 8.0, 12.0, 4.0, 8.0, 8.0], &[16.0, 8.0, 8.0, 8.0, 8.0, 4.0, 4.0, 8.0]]),
    // 32 bars = 128 beats
    (3, 32, &[&[64.0, 32.0, 32.0], &[32.0, 32.0, 64.0], &[48.0, 48.0, 32.0], &[32.0, 64.0, 32.0]]),
    (4, 32, &[&[32.0, 32.0, 32.0, 32.0], &[48.0, 16.0, 32.0, 32.0], &[32.0, 32.0, 48.0, 16.0], &[40.0, 24.0, 32.0, 32.0]]),
    (5, 32, &[&[32.0, 32.0, 16.0, 16.0, 32.0], &[32.0, 16.0, 16.0, 32.0, 32.0], &[16.0, 16.0, 32.0, 32.0, 32.0], &[24.0, 24.0, 16.0, 32.0, 32.0]]),
    (6, 32, &[&[32.0, 16.0, 16.0, 32.0, 16.0, 16.0], &[16.0, 16.0, 32.0, 16.0, 16.0, 32.0], &[32.0, 32.0, 16.0, 16.0, 16.0, 16.0]]),
    (7, 32, &[&[32.0, 16.0, 16.0, 16.0, 16.0, 16.0, 16.0], &[16.0, 16.0, 16.0, 16.0, 16.0, 16.0, 32.0], &[16.0, 16.0, 32.0, 16.0, 16.0, 16.0, 16.0]]),
    (8, 32, &[&[16.0, 16.0, 16.0, 16.0, 16.0, 16.0, 16.0, 16.0], &[24.0, 8.0, 16.0, 16.0, 24.0, 8.0, 16.0, 16.0], &[32.0, 16.0, 16.0, 16.0, 16.0, 8.0, 8.0, 16.0]]),
];

/// All alternatives for one (chord count, bar count) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordChangeEntry {
    pub chords: usize,
    pub bars: u32,
    pub patterns: Vec<Vec<f64>>,
}

/// The curated chord-change pattern library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordChangeLibrary {
    pub entries: Vec<ChordChangeEntry>,
}

impl Default for ChordChangeLibrary {
    fn default() -> Self {
        Self::default_library()
    }
}

impl ChordChangeLibrary {
    /// The hand-authored built-in library.
    pub fn default_library() -> Self {
        let entries = BUILTIN_PATTERNS
            .iter()
            .map(|&(chords, bars, patterns)| ChordChangeEntry {
                chords,
                bars,
                patterns: patterns.iter().map(|p| p.to_vec()).collect(),
            })
            .collect();
        ChordChangeLibrary { entries }
    }

    /// Load and validate a library from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let library: ChordChangeLibrary = serde_json::from_str(json)?;
        library.validate()?;
        Ok(library)
    }

    /// Check that every pattern has one positive duration per chord and fills
    /// its bars exactly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.entries {
            let invalid = |reason: String| ConfigError::InvalidPattern {
                chords: entry.chords,
                bars: entry.bars,
                reason,
            };
            let expected = entry.bars as f64 * BEATS_PER_BAR;
            for pattern in &entry.patterns {
                if pattern.len() != entry.chords {
                    return Err(invalid(format!(
                        "{} durations for {} chords",
                        pattern.len(),
                        entry.chords
                    )));
                }
                if pattern.iter().any(|&d| d <= 0.0) {
                    return Err(invalid("non-positive duration".to_string()));
                }
                let total: f64 = pattern.iter().sum();
                if (total - expected).abs() > SUM_TOLERANCE {
                    return Err(invalid(format!("sums to {total}, expected {expected}")));
                }
            }
        }
        Ok(())
    }

    /// The alternatives registered for a key, if any.
    pub fn patterns(&self, chords: usize, bars: u32) -> Option<&[Vec<f64>]> {
        self.entries
            .iter()
            .find(|e| e.chords == chords && e.bars == bars && !e.patterns.is_empty())
            .map(|e| e.patterns.as_slice())
    }

    /// Per-chord durations in beats for `chords` chords over `bars` bars.
    pub fn plan(&self, chords: usize, bars: u32, rng: &mut impl RandomSource) -> Vec<f64> {
        let total = bars as f64 * BEATS_PER_BAR;
        match self.patterns(chords, bars) {
            Some(alternatives) => {
                let pattern = rng.pick(alternatives).clone();
                debug!(chords, bars, ?pattern, "chord-change pattern");
                pattern
            }
            None => {
                let each = total / chords as f64;
                debug!(chords, bars, each, "no chord-change pattern, splitting evenly");
                vec![each; chords]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordforge_prng::{ChordRng, ScriptedSource};

    #[test]
    fn builtin_library_is_valid() {
        ChordChangeLibrary::default_library().validate().unwrap();
    }

    #[test]
    fn every_builtin_pattern_fills_its_bars() {
        for entry in &ChordChangeLibrary::default_library().entries {
            for pattern in &entry.patterns {
                let total: f64 = pattern.iter().sum();
                assert_eq!(total, entry.bars as f64 * 4.0, "{pattern:?}");
                assert_eq!(pattern.len(), entry.chords);
            }
        }
    }

    #[test]
    fn builtin_covers_every_template_length_and_bar_count() {
        let library = ChordChangeLibrary::default_library();
        for chords in 3..=8 {
            for bars in [4, 8, 16, 32] {
                assert!(library.patterns(chords, bars).is_some(), "{chords} chords / {bars} bars");
            }
        }
    }

    #[test]
    fn plan_uses_a_library_alternative() {
        let library = ChordChangeLibrary::default_library();
        let mut rng = ChordRng::seeded(5);
        for _ in 0..20 {
            let plan = library.plan(5, 16, &mut rng);
            assert!(library.patterns(5, 16).unwrap().contains(&plan));
        }
        let mut src = ScriptedSource::new([1], []);
        assert_eq!(library.plan(3, 8, &mut src), vec![8.0, 8.0, 16.0]);
    }

    #[test]
    fn missing_key_splits_evenly() {
        let library = ChordChangeLibrary::default_library();
        let plan = library.plan(5, 3, &mut ScriptedSource::zeros());
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|&d| (d - 2.4).abs() < 1e-12));
    }

    #[test]
    fn loaded_library_is_validated() {
        let good = r#"{ "entries": [ { "chords": 2, "bars": 2, "patterns": [[6, 2], [4, 4]] } ] }"#;
        let library = ChordChangeLibrary::from_json(good).unwrap();
        assert_eq!(library.patterns(2, 2).unwrap().len(), 2);

        let bad_sum = r#"{ "entries": [ { "chords": 2, "bars": 2, "patterns": [[6, 1]] } ] }"#;
        assert!(matches!(
            ChordChangeLibrary::from_json(bad_sum),
            Err(ConfigError::InvalidPattern { chords: 2, bars: 2, .. })
        ));

        let bad_len = r#"{ "entries": [ { "chords": 3, "bars": 2, "patterns": [[4, 4]] } ] }"#;
        assert!(ChordChangeLibrary::from_json(bad_len).is_err());
    }
}
