// Data-driven generator configuration.
//
// Every tunable constant the pipeline reads lives in `GeneratorConfig`:
// velocity ranges, the random-rhythm whole-note bias, chord-map resolution,
// and the derived bass/pad parameters. The pipeline code never hard-codes
// these numbers. The defaults reproduce the reference behavior; a JSON file
// may override any subset of fields (missing fields keep their defaults).
// A loaded config is validated before it is handed back, so the pipeline can
// index, divide and draw with these values without further checks.
//
// See also: `timing.rs` for `ChordChangeLibrary`, the other piece of loadable
// data, and `generator.rs` which bundles both into a `Generator`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MIDI_MAX: u8 = 127;

/// SMF metrical timing is a 15-bit field.
const MAX_TICKS_PER_QUARTER: u16 = 0x7FFF;

/// Tunable parameters for one `Generator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Inclusive velocity range for chord tones.
    pub chord_velocity: (u8, u8),
    /// Inclusive velocity range for the optional bass doubling.
    pub bass_velocity: (u8, u8),
    /// Octaves below the chord root for the bass doubling when the request
    /// does not say.
    pub default_bass_octave: u8,
    /// After a whole-note onset in a random rhythm, probability that the next
    /// duration may not be another whole note.
    pub avoid_repeated_whole: f64,
    /// Resolution of the onset-to-chord lookup, in beats.
    pub chord_map_resolution: f64,
    /// Fixed velocity of the derived sustained bass line.
    pub derived_bass_velocity: u8,
    /// Fixed velocity of every derived pad note.
    pub pad_velocity: u8,
    /// Largest step, in semitones, an upper pad voice takes per boundary.
    pub pad_max_step: i32,
    /// Semitone offsets of the three floating upper pad voices above
    /// `pad_upper_register + root`.
    pub pad_upper_offsets: [i32; 3],
    /// Register shift applied to the boundary root for the upper pad voices.
    pub pad_upper_register: i32,
    /// MIDI ticks per quarter note for SMF export.
    pub ticks_per_quarter: u16,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            chord_velocity: (80, 99),
            bass_velocity: (85, 99),
            default_bass_octave: 2,
            avoid_repeated_whole: 0.6,
            chord_map_resolution: 0.25,
            derived_bass_velocity: 90,
            pad_velocity: 65,
            pad_max_step: 3,
            pad_upper_offsets: [2, 5, 9],
            pad_upper_register: 48,
            ticks_per_quarter: 480,
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field the pipeline relies on being in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::InvalidConfig { field, reason };

        for (field, (lo, hi)) in [
            ("chord_velocity", self.chord_velocity),
            ("bass_velocity", self.bass_velocity),
        ] {
            if lo > hi || hi > MIDI_MAX {
                return Err(invalid(field, format!("range {lo}..={hi} is not within 0..=127")));
            }
        }
        for (field, velocity) in [
            ("derived_bass_velocity", self.derived_bass_velocity),
            ("pad_velocity", self.pad_velocity),
        ] {
            if velocity > MIDI_MAX {
                return Err(invalid(field, format!("{velocity} exceeds 127")));
            }
        }
        if !(1..=3).contains(&self.default_bass_octave) {
            return Err(invalid(
                "default_bass_octave",
                format!("{} is outside 1..=3", self.default_bass_octave),
            ));
        }
        if !(0.0..=1.0).contains(&self.avoid_repeated_whole) {
            return Err(invalid(
                "avoid_repeated_whole",
                format!("{} is not a probability", self.avoid_repeated_whole),
            ));
        }
        if !self.chord_map_resolution.is_finite() || self.chord_map_resolution <= 0.0 {
            return Err(invalid(
                "chord_map_resolution",
                format!("{} must be a positive number of beats", self.chord_map_resolution),
            ));
        }
        if self.pad_max_step < 0 {
            return Err(invalid("pad_max_step", format!("{} is negative", self.pad_max_step)));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > MAX_TICKS_PER_QUARTER {
            return Err(invalid(
                "ticks_per_quarter",
                format!("{} is outside 1..=32767", self.ticks_per_quarter),
            ));
        }
        Ok(())
    }
}
