// Music theory lookup tables.
//
// Static data only: the pitch-class spelling table (17 accepted spellings,
// including enharmonics, mapped into the one-octave range C4..B4), the
// per-mode step-interval tables, canonical pitch-class names, the
// major/minor family classification used for relative keys, and the
// involutive mood-complement pairing.
//
// Everything downstream refers to modes and moods through the `Mode` and
// `Mood` enums; raw names are parsed once at the pipeline entry, which is
// where `UnknownMode`/`UnknownMood`/`InvalidKey` come from.

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};

/// Base pitch of the canonical pitch-class octave (middle C).
pub const OCTAVE_LOW: i32 = 60;
/// Highest pitch of the canonical pitch-class octave (B above middle C).
pub const OCTAVE_HIGH: i32 = 71;

/// Accepted key spellings and their pitch in the canonical octave.
pub const KEY_SPELLINGS: [(&str, i32); 17] = [
    ("C", 60),
    ("C#", 61),
    ("Db", 61),
    ("D", 62),
    ("D#", 63),
    ("Eb", 63),
    ("E", 64),
    ("F", 65),
    ("F#", 66),
    ("Gb", 66),
    ("G", 67),
    ("G#", 68),
    ("Ab", 68),
    ("A", 69),
    ("A#", 70),
    ("Bb", 70),
    ("B", 71),
];

/// Canonical (sharp) names indexed by pitch class.
pub const PITCH_CLASS_NAMES: [&str; 12] =
    ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Look up the canonical-octave pitch for a key spelling.
pub fn key_pitch(key: &str) -> Result<i32, GenerateError> {
    KEY_SPELLINGS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, pitch)| pitch)
        .ok_or_else(|| GenerateError::InvalidKey(key.to_string()))
}

/// Sharp-spelled name of a pitch's pitch class.
pub fn pitch_class_name(pitch: i32) -> &'static str {
    PITCH_CLASS_NAMES[pitch.rem_euclid(12) as usize]
}

/// Fold a pitch into the canonical octave `[OCTAVE_LOW, OCTAVE_HIGH]`.
pub fn normalize_to_octave(mut pitch: i32) -> i32 {
    while pitch < OCTAVE_LOW {
        pitch += 12;
    }
    while pitch > OCTAVE_HIGH {
        pitch -= 12;
    }
    pitch
}

/// The eight supported modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    /// Natural minor under its modal name; same intervals as `Minor`.
    Aeolian,
    Locrian,
}

/// Whether a mode reads as major or minor for relative-key purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFamily {
    Major,
    Minor,
}

impl Mode {
    pub const ALL: [Mode; 8] = [
        Mode::Major,
        Mode::Minor,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Parse a mode name. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Result<Mode, GenerateError> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GenerateError::UnknownMode(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }

    /// Semitone steps between consecutive scale tones. Always sums to 12.
    pub fn intervals(self) -> [i32; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
            Mode::Dorian => [2, 1, 2, 2, 2, 1, 2],
            Mode::Phrygian => [1, 2, 2, 2, 1, 2, 2],
            Mode::Lydian => [2, 2, 2, 1, 2, 2, 1],
            Mode::Mixolydian => [2, 2, 1, 2, 2, 1, 2],
            Mode::Aeolian => [2, 1, 2, 2, 1, 2, 2],
            Mode::Locrian => [1, 2, 2, 1, 2, 2, 2],
        }
    }

    pub fn family(self) -> ModeFamily {
        match self {
            Mode::Major | Mode::Lydian | Mode::Mixolydian => ModeFamily::Major,
            Mode::Minor | Mode::Aeolian | Mode::Dorian | Mode::Phrygian | Mode::Locrian => {
                ModeFamily::Minor
            }
        }
    }
}

/// The six moods a progression can be drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Dark,
    Jazzy,
    Tense,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Dark,
        Mood::Jazzy,
        Mood::Tense,
        Mood::Calm,
    ];

    /// Parse a mood name. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Result<Mood, GenerateError> {
        Mood::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GenerateError::UnknownMood(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Dark => "dark",
            Mood::Jazzy => "jazzy",
            Mood::Tense => "tense",
            Mood::Calm => "calm",
        }
    }

    /// Contrasting mood for the second clip of a dual generation.
    /// happy/sad, dark/calm and jazzy/tense swap with each other.
    pub fn complement(self) -> Mood {
        match self {
            Mood::Happy => Mood::Sad,
            Mood::Sad => Mood::Happy,
            Mood::Dark => Mood::Calm,
            Mood::Calm => Mood::Dark,
            Mood::Jazzy => Mood::Tense,
            Mood::Tense => Mood::Jazzy,
        }
    }
}

/// Complement a raw mood name. Unrecognized names map to themselves.
pub fn complementary_mood(name: &str) -> String {
    match Mood::from_name(name) {
        Ok(mood) => mood.complement().name().to_string(),
        Err(_) => name.to_string(),
    }
}

/// A key/mode pair produced by `relative_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeKey {
    pub key: String,
    pub mode: Mode,
}

/// Relative key of `key` in `mode`.
///
/// Major-family modes move down a minor third to `Minor`; minor-family modes
/// move up a minor third to `Major`. The result is folded back into the
/// canonical octave and re-spelled with its sharp name.
pub fn relative_key(key: &str, mode: Mode) -> Result<RelativeKey, GenerateError> {
    let root = key_pitch(key)?;
    let (shifted, new_mode) = match mode.family() {
        ModeFamily::Major => (root - 3, Mode::Minor),
        ModeFamily::Minor => (root + 3, Mode::Major),
    };
    let normalized = normalize_to_octave(shifted);
    Ok(RelativeKey {
        key: pitch_class_name(normalized).to_string(),
        mode: new_mode,
    })
}
