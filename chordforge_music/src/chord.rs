// Chord construction from a scale degree and an extension type.
//
// Two disjoint strategies:
// - Altered/chromatic types (diminished, augmented, maj7, min7, sus2, sus4)
//   are fixed semitone stacks on the degree's root and ignore the rest of
//   the scale.
// - Diatonic stacked types (triad through thirteenth) stack scale thirds:
//   positions degree, +2, +4 for the triad, then +6, +8, +10, +12 for the
//   seventh, ninth, eleventh and thirteenth. Reading positions through
//   `Scale::tone` adds an octave each time a position wraps past the scale,
//   so the result never descends.
//
// A `Chord` is an immutable value. Later stages (timing.rs, voicing.rs)
// produce replacement chords through `with_duration`/`with_pitches` rather
// than editing one in place.

use crate::scale::{Scale, degree_index};
use crate::theory::pitch_class_name;

/// Harmonic type of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Triad,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
    Diminished,
    Augmented,
    Maj7,
    Min7,
    Sus2,
    Sus4,
}

impl Extension {
    pub fn name(self) -> &'static str {
        match self {
            Extension::Triad => "triad",
            Extension::Seventh => "seventh",
            Extension::Ninth => "ninth",
            Extension::Eleventh => "eleventh",
            Extension::Thirteenth => "thirteenth",
            Extension::Diminished => "diminished",
            Extension::Augmented => "augmented",
            Extension::Maj7 => "maj7",
            Extension::Min7 => "min7",
            Extension::Sus2 => "sus2",
            Extension::Sus4 => "sus4",
        }
    }

    /// Semitone offsets from the root for the chromatic types, `None` for the
    /// diatonic stacked types.
    pub fn chromatic_offsets(self) -> Option<&'static [i32]> {
        match self {
            Extension::Diminished => Some(&[0, 3, 6, 9]),
            Extension::Augmented => Some(&[0, 4, 8]),
            Extension::Maj7 => Some(&[0, 4, 7, 11]),
            Extension::Min7 => Some(&[0, 3, 7, 10]),
            Extension::Sus2 => Some(&[0, 2, 7]),
            Extension::Sus4 => Some(&[0, 5, 7]),
            _ => None,
        }
    }

    /// Number of stacked thirds for the diatonic types.
    fn stacked_tones(self) -> usize {
        match self {
            Extension::Seventh => 4,
            Extension::Ninth => 5,
            Extension::Eleventh => 6,
            Extension::Thirteenth => 7,
            _ => 3,
        }
    }
}

/// One chord of a progression.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    /// Scale degree of the root, 1-7.
    pub degree: u8,
    pub extension: Extension,
    /// Sounding pitches, lowest chord tone first until voice leading
    /// re-octaves them.
    pub pitches: Vec<i32>,
    pub name: String,
    /// How long the chord is held; set by the timing planner.
    pub duration_beats: f64,
}

impl Chord {
    /// Build the chord on `degree` of `scale`. Duration starts at one bar.
    pub fn build(scale: &Scale, degree: u8, extension: Extension) -> Chord {
        Chord {
            degree,
            extension,
            pitches: build_pitches(scale, degree, extension),
            name: chord_name(scale, degree, extension),
            duration_beats: 4.0,
        }
    }

    pub fn with_duration(self, duration_beats: f64) -> Chord {
        Chord {
            duration_beats,
            ..self
        }
    }

    pub fn with_pitches(self, pitches: Vec<i32>) -> Chord {
        Chord { pitches, ..self }
    }

    /// The chord's root before any voicing, i.e. its first-built pitch.
    pub fn root(&self) -> Option<i32> {
        self.pitches.first().copied()
    }
}

/// Concrete pitches of `extension` on `degree` of `scale`.
pub fn build_pitches(scale: &Scale, degree: u8, extension: Extension) -> Vec<i32> {
    let root_pos = degree_index(degree);
    if let Some(offsets) = extension.chromatic_offsets() {
        let root = scale.tone(root_pos);
        return offsets.iter().map(|o| root + o).collect();
    }
    (0..extension.stacked_tones())
        .map(|k| scale.tone(root_pos + 2 * k))
        .collect()
}

/// Display name such as `Cmaj`, `Dm7`, `G9`, `Bm7b5`, `Fsus4`.
pub fn chord_name(scale: &Scale, degree: u8, extension: Extension) -> String {
    let root_pos = degree_index(degree);
    let root = scale.tone(root_pos);
    let root_name = pitch_class_name(root);

    let suffix = match extension {
        Extension::Diminished => "dim7".to_string(),
        Extension::Augmented => "aug".to_string(),
        Extension::Maj7 => "maj7".to_string(),
        Extension::Min7 => "m7".to_string(),
        Extension::Sus2 => "sus2".to_string(),
        Extension::Sus4 => "sus4".to_string(),
        Extension::Triad => triad_quality(scale, root_pos).to_string(),
        Extension::Seventh | Extension::Ninth | Extension::Eleventh | Extension::Thirteenth => {
            let number = 2 * extension.stacked_tones() - 1;
            let seventh = scale.tone(root_pos + 6) - root;
            match (triad_quality(scale, root_pos), seventh) {
                ("maj", 11) => format!("maj{number}"),
                ("maj", _) => format!("{number}"),
                ("m", 11) => format!("mMaj{number}"),
                ("m", _) => format!("m{number}"),
                ("dim", 9) => format!("dim{number}"),
                ("dim", _) => format!("m{number}b5"),
                (quality, _) => format!("{quality}{number}"),
            }
        }
    };
    format!("{root_name}{suffix}")
}

/// Quality of the diatonic triad on a scale position.
fn triad_quality(scale: &Scale, root_pos: usize) -> &'static str {
    let root = scale.tone(root_pos);
    let third = scale.tone(root_pos + 2) - root;
    let fifth = scale.tone(root_pos + 4) - root;
    match (third, fifth) {
        (4, 7) => "maj",
        (3, 7) => "m",
        (3, 6) => "dim",
        (4, 8) => "aug",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::Mode;

    fn c_major() -> Scale {
        Scale::build(60, Mode::Major)
    }

    #[test]
    fn tonic_stack_in_c_major() {
        let s = c_major();
        assert_eq!(build_pitches(&s, 1, Extension::Triad), vec![60, 64, 67]);
        assert_eq!(build_pitches(&s, 1, Extension::Seventh), vec![60, 64, 67, 71]);
        assert_eq!(build_pitches(&s, 1, Extension::Ninth), vec![60, 64, 67, 71, 74]);
        assert_eq!(
            build_pitches(&s, 1, Extension::Thirteenth),
            vec![60, 64, 67, 71, 74, 77, 81]
        );
    }

    #[test]
    fn dominant_seventh_wraps_into_next_octave() {
        assert_eq!(build_pitches(&c_major(), 5, Extension::Seventh), vec![67, 71, 74, 77]);
    }

    #[test]
    fn leading_tone_chord_stays_ascending() {
        let pitches = build_pitches(&c_major(), 7, Extension::Thirteenth);
        assert_eq!(pitches, vec![71, 74, 77, 81, 84, 88, 91]);
    }

    #[test]
    fn diatonic_stacks_never_descend() {
        for mode in Mode::ALL {
            let s = Scale::build(63, mode);
            for degree in 1..=7 {
                for ext in [
                    Extension::Triad,
                    Extension::Seventh,
                    Extension::Ninth,
                    Extension::Eleventh,
                    Extension::Thirteenth,
                ] {
                    let p = build_pitches(&s, degree, ext);
                    assert!(p.windows(2).all(|w| w[0] <= w[1]), "{mode:?} {degree} {ext:?}: {p:?}");
                }
            }
        }
    }

    #[test]
    fn chromatic_types_use_fixed_offsets_from_degree_root() {
        let s = c_major();
        assert_eq!(build_pitches(&s, 2, Extension::Diminished), vec![62, 65, 68, 71]);
        assert_eq!(build_pitches(&s, 3, Extension::Augmented), vec![64, 68, 72]);
        assert_eq!(build_pitches(&s, 2, Extension::Maj7), vec![62, 66, 69, 73]);
        assert_eq!(build_pitches(&s, 1, Extension::Min7), vec![60, 63, 67, 70]);
        assert_eq!(build_pitches(&s, 5, Extension::Sus4), vec![67, 72, 74]);
        assert_eq!(build_pitches(&s, 4, Extension::Sus2), vec![65, 67, 72]);
    }

    #[test]
    fn names_follow_quality() {
        let s = c_major();
        assert_eq!(chord_name(&s, 1, Extension::Triad), "Cmaj");
        assert_eq!(chord_name(&s, 2, Extension::Triad), "Dm");
        assert_eq!(chord_name(&s, 7, Extension::Triad), "Bdim");
        assert_eq!(chord_name(&s, 1, Extension::Seventh), "Cmaj7");
        assert_eq!(chord_name(&s, 5, Extension::Seventh), "G7");
        assert_eq!(chord_name(&s, 2, Extension::Ninth), "Dm9");
        assert_eq!(chord_name(&s, 7, Extension::Seventh), "Bm7b5");
        assert_eq!(chord_name(&s, 5, Extension::Sus4), "Gsus4");
        assert_eq!(chord_name(&s, 2, Extension::Diminished), "Ddim7");
    }

    #[test]
    fn record_updates_replace_one_field() {
        let chord = Chord::build(&c_major(), 4, Extension::Triad);
        let timed = chord.clone().with_duration(6.0);
        assert_eq!(timed.duration_beats, 6.0);
        assert_eq!(timed.pitches, chord.pitches);
        let voiced = timed.with_pitches(vec![53, 57, 60]);
        assert_eq!(voiced.name, "Fmaj");
        assert_eq!(voiced.duration_beats, 6.0);
        assert_eq!(chord.duration_beats, 4.0);
    }
}
