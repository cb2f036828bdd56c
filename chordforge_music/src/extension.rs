// Extension selection: which harmonic type each chord of a progression gets.
//
// A priority-ordered decision table over (degree, position, progression
// length, mood). The first matching rule supplies an option set and one
// option is drawn uniformly; the only weighted draw is the tense/dark
// mediant, which leans 30/30/40 toward augmented/seventh/triad.

use crate::chord::Extension;
use crate::theory::Mood;
use chordforge_prng::RandomSource;

use Extension::*;

const FINAL_CHORD: &[Extension] = &[Triad, Seventh, Maj7];
const DOMINANT: &[Extension] = &[Seventh, Ninth, Sus4];
const SUPERTONIC_JAZZY: &[Extension] = &[Seventh, Ninth, Eleventh, Min7];
const SUPERTONIC_DARK: &[Extension] = &[Diminished, Min7, Seventh];
const TONIC_JAZZY: &[Extension] = &[Maj7, Ninth, Seventh, Triad];
const TONIC_DEFAULT: &[Extension] = &[Triad, Seventh, Maj7, Sus2];

/// Weights for the tense/dark mediant: augmented, then seventh, the rest triad.
const MEDIANT_AUGMENTED: f64 = 0.3;
const MEDIANT_SEVENTH: f64 = 0.3;

/// Fallback option set when no positional rule applies.
pub fn mood_defaults(mood: Mood) -> &'static [Extension] {
    match mood {
        Mood::Jazzy => &[Seventh, Ninth, Eleventh, Thirteenth, Maj7, Min7],
        Mood::Dark | Mood::Tense => &[Seventh, Min7, Diminished, Sus4, Ninth],
        Mood::Happy | Mood::Calm => &[Triad, Maj7, Sus2, Sus4, Ninth],
        Mood::Sad => &[Triad, Min7, Seventh, Ninth, Eleventh],
    }
}

/// Pick the extension for the chord at `position` (0-based) of a
/// `total_chords`-long progression.
pub fn select_extension(
    degree: u8,
    position: usize,
    total_chords: usize,
    mood: Mood,
    rng: &mut impl RandomSource,
) -> Extension {
    let dark = matches!(mood, Mood::Dark | Mood::Tense);

    let options = if position + 1 == total_chords {
        FINAL_CHORD
    } else if degree == 5 {
        DOMINANT
    } else if degree == 2 && mood == Mood::Jazzy {
        SUPERTONIC_JAZZY
    } else if degree == 2 && dark {
        SUPERTONIC_DARK
    } else if degree == 1 && mood == Mood::Jazzy {
        TONIC_JAZZY
    } else if degree == 1 {
        TONIC_DEFAULT
    } else if degree == 3 && dark {
        let roll = rng.draw_float();
        return if roll < MEDIANT_AUGMENTED {
            Augmented
        } else if roll < MEDIANT_AUGMENTED + MEDIANT_SEVENTH {
            Seventh
        } else {
            Triad
        };
    } else {
        mood_defaults(mood)
    };

    *rng.pick(options)
}
