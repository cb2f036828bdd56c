// Rhythm expansion: timed chords in, note events out.
//
// Onsets come from one of two places:
// - a fixed named pattern (`whole`, `half`, `quarters`, `eighths`): one bar
//   of (start, duration) pairs tiled across every bar;
// - `random`: one pass over the whole clip, repeatedly choosing a duration
//   from {4, 2, 1, 0.5} beats that still fits, with a bias against two whole
//   notes in a row. The last onset is clipped to the beats that remain.
//
// Which chord sounds at an onset is answered by `ChordMap`, a lookup at
// `chord_map_resolution` (a quarter beat by default) built from the chord
// durations. Each chord owns the slots from its rounded start to its rounded
// end, so fractional even-split durations still cover every onset. An onset
// past the end of the map is skipped.

use crate::chord::Chord;
use crate::clip::NoteEvent;
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::timing::BEATS_PER_BAR;
use chordforge_prng::RandomSource;
use tracing::{trace, warn};

/// Durations available to the random pattern, longest first.
const RANDOM_DURATIONS: [f64; 4] = [4.0, 2.0, 1.0, 0.5];

const WHOLE: f64 = 4.0;

const EPSILON: f64 = 1e-9;

/// Named onset patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmPattern {
    Whole,
    Half,
    Quarters,
    Eighths,
    Random,
}

impl RhythmPattern {
    pub const ALL: [RhythmPattern; 5] = [
        RhythmPattern::Whole,
        RhythmPattern::Half,
        RhythmPattern::Quarters,
        RhythmPattern::Eighths,
        RhythmPattern::Random,
    ];

    pub fn from_name(name: &str) -> Result<RhythmPattern, GenerateError> {
        RhythmPattern::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| GenerateError::UnknownRhythmPattern(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            RhythmPattern::Whole => "whole",
            RhythmPattern::Half => "half",
            RhythmPattern::Quarters => "quarters",
            RhythmPattern::Eighths => "eighths",
            RhythmPattern::Random => "random",
        }
    }

    /// One bar of (start, duration) pairs, or `None` for `Random`.
    pub fn bar_template(self) -> Option<&'static [(f64, f64)]> {
        match self {
            RhythmPattern::Whole => Some(&[(0.0, 4.0)]),
            RhythmPattern::Half => Some(&[(0.0, 2.0), (2.0, 2.0)]),
            RhythmPattern::Quarters => Some(&[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]),
            RhythmPattern::Eighths => Some(&[
                (0.0, 0.5),
                (0.5, 0.5),
                (1.0, 0.5),
                (1.5, 0.5),
                (2.0, 0.5),
                (2.5, 0.5),
                (3.0, 0.5),
                (3.5, 0.5),
            ]),
            RhythmPattern::Random => None,
        }
    }
}

/// A rhythmic attack: when it starts and how long it rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onset {
    pub start: f64,
    pub duration: f64,
}

/// Onsets covering `bars` bars with `pattern`.
pub fn onsets(
    pattern: RhythmPattern,
    bars: u32,
    config: &GeneratorConfig,
    rng: &mut impl RandomSource,
) -> Vec<Onset> {
    match pattern.bar_template() {
        Some(template) => (0..bars)
            .flat_map(|bar| {
                let offset = bar as f64 * BEATS_PER_BAR;
                template.iter().map(move |&(start, duration)| Onset {
                    start: offset + start,
                    duration,
                })
            })
            .collect(),
        None => random_onsets(bars as f64 * BEATS_PER_BAR, config.avoid_repeated_whole, rng),
    }
}

/// Random onsets filling `total_beats`.
///
/// After a whole note, with probability `avoid_repeated_whole` the next
/// choice may not be another whole note.
pub fn random_onsets(total_beats: f64, avoid_repeated_whole: f64, rng: &mut impl RandomSource) -> Vec<Onset> {
    let mut result = Vec::new();
    let mut cursor = 0.0;
    let mut last_was_whole = false;

    while total_beats - cursor > EPSILON {
        let remaining = total_beats - cursor;
        let mut valid: Vec<f64> = RANDOM_DURATIONS
            .iter()
            .copied()
            .filter(|&d| d <= remaining + EPSILON)
            .collect();
        if last_was_whole && valid.len() > 1 && rng.chance(avoid_repeated_whole) {
            valid.retain(|&d| d != WHOLE);
        }

        let duration = if valid.is_empty() {
            remaining
        } else {
            let choice = *rng.pick(&valid);
            choice.min(remaining)
        };
        result.push(Onset { start: cursor, duration });
        last_was_whole = duration == WHOLE;
        cursor += duration;
    }
    result
}

/// Fine-grained lookup from beat position to the index of the sounding chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordMap {
    resolution: f64,
    slots: Vec<usize>,
}

impl ChordMap {
    /// Lay out `durations` back to back from beat 0.
    pub fn new(durations: &[f64], resolution: f64) -> ChordMap {
        let mut slots = Vec::new();
        let mut cursor = 0.0;
        for (index, &duration) in durations.iter().enumerate() {
            cursor += duration;
            let end_slot = (cursor / resolution).round() as usize;
            while slots.len() < end_slot {
                slots.push(index);
            }
        }
        ChordMap { resolution, slots }
    }

    /// Index of the chord sounding at `beat`, if the map covers it.
    pub fn chord_at(&self, beat: f64) -> Option<usize> {
        if beat < 0.0 {
            return None;
        }
        let slot = (beat / self.resolution + EPSILON).floor() as usize;
        self.slots.get(slot).copied()
    }

    /// Beats covered by the map.
    pub fn len_beats(&self) -> f64 {
        self.slots.len() as f64 * self.resolution
    }
}

/// Render timed chords over `onsets` into note events.
///
/// Every onset emits one note per pitch of the chord sounding there. With
/// `bass_octave` set, a further note doubles the chord's first pitch that
/// many octaves down.
pub fn apply_rhythm(
    chords: &[Chord],
    onsets: &[Onset],
    bass_octave: Option<u8>,
    config: &GeneratorConfig,
    rng: &mut impl RandomSource,
) -> Vec<NoteEvent> {
    let durations: Vec<f64> = chords.iter().map(|c| c.duration_beats).collect();
    let map = ChordMap::new(&durations, config.chord_map_resolution);
    let (chord_lo, chord_hi) = config.chord_velocity;
    let (bass_lo, bass_hi) = config.bass_velocity;

    let mut notes = Vec::new();
    for onset in onsets {
        let Some(index) = map.chord_at(onset.start) else {
            warn!(start = onset.start, covered = map.len_beats(), "onset outside chord map, skipped");
            continue;
        };
        let chord = &chords[index];
        trace!(start = onset.start, chord = %chord.name, "onset");

        for &pitch in &chord.pitches {
            notes.push(NoteEvent {
                pitch,
                start_beat: onset.start,
                duration_beats: onset.duration,
                velocity: rng.draw_inclusive(chord_lo, chord_hi),
            });
        }

        if let (Some(octave), Some(root)) = (bass_octave, chord.root()) {
            notes.push(NoteEvent {
                pitch: root - 12 * octave as i32,
                start_beat: onset.start,
                duration_beats: onset.duration,
                velocity: rng.draw_inclusive(bass_lo, bass_hi),
            });
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Extension;
    use crate::scale::Scale;
    use crate::theory::Mode;
    use chordforge_prng::{ChordRng, ScriptedSource};

    fn timed(degree: u8, duration: f64) -> Chord {
        Chord::build(&Scale::build(60, Mode::Major), degree, Extension::Triad).with_duration(duration)
    }

    #[test]
    fn pattern_names_parse() {
        assert_eq!(RhythmPattern::from_name("quarters").unwrap(), RhythmPattern::Quarters);
        assert_eq!(RhythmPattern::from_name("random").unwrap(), RhythmPattern::Random);
        assert_eq!(
            RhythmPattern::from_name("shuffle"),
            Err(GenerateError::UnknownRhythmPattern("shuffle".into()))
        );
    }

    #[test]
    fn fixed_patterns_tile_without_gaps_or_overlaps() {
        let config = GeneratorConfig::default();
        for pattern in [
            RhythmPattern::Whole,
            RhythmPattern::Half,
            RhythmPattern::Quarters,
            RhythmPattern::Eighths,
        ] {
            for bars in [4, 8, 16, 32] {
                let list = onsets(pattern, bars, &config, &mut ScriptedSource::zeros());
                assert_eq!(list[0].start, 0.0);
                for w in list.windows(2) {
                    assert_eq!(w[0].start + w[0].duration, w[1].start, "{pattern:?}");
                }
                let last = list.last().unwrap();
                assert_eq!(last.start + last.duration, bars as f64 * 4.0);
            }
        }
    }

    #[test]
    fn random_onsets_fill_the_clip_exactly() {
        let mut rng = ChordRng::seeded(21);
        for total in [16.0, 32.0, 128.0, 3.25] {
            let list = random_onsets(total, 0.6, &mut rng);
            let mut cursor = 0.0;
            for onset in &list {
                assert_eq!(onset.start, cursor);
                assert!(onset.duration > 0.0);
                cursor += onset.duration;
            }
            assert!((cursor - total).abs() < 1e-9);
        }
    }

    #[test]
    fn random_onsets_only_use_note_values() {
        let mut rng = ChordRng::seeded(4);
        let list = random_onsets(64.0, 0.6, &mut rng);
        assert!(list.iter().all(|o| RANDOM_DURATIONS.contains(&o.duration)));
    }

    #[test]
    fn repeated_whole_can_be_suppressed() {
        // First pick index 0 (whole); then the avoidance roll succeeds and the
        // next pick is taken from {2, 1, 0.5}.
        let mut src = ScriptedSource::new([0, 0], [0.1]);
        let list = random_onsets(8.0, 0.6, &mut src);
        assert_eq!(list[0].duration, 4.0);
        assert_eq!(list[1].duration, 2.0);

        // A failed roll leaves whole notes available.
        let mut src = ScriptedSource::new([0, 0], [0.9]);
        let list = random_onsets(8.0, 0.6, &mut src);
        assert_eq!(list.iter().map(|o| o.duration).collect::<Vec<_>>(), vec![4.0, 4.0]);
    }

    #[test]
    fn short_tail_is_clipped() {
        let list = random_onsets(0.25, 0.6, &mut ScriptedSource::zeros());
        assert_eq!(list, vec![Onset { start: 0.0, duration: 0.25 }]);
    }

    #[test]
    fn chord_map_resolves_onsets() {
        let map = ChordMap::new(&[6.0, 2.0, 8.0], 0.25);
        assert_eq!(map.chord_at(0.0), Some(0));
        assert_eq!(map.chord_at(5.75), Some(0));
        assert_eq!(map.chord_at(6.0), Some(1));
        assert_eq!(map.chord_at(8.0), Some(2));
        assert_eq!(map.chord_at(15.75), Some(2));
        assert_eq!(map.chord_at(16.0), None);
        assert_eq!(map.len_beats(), 16.0);
    }

    #[test]
    fn chord_map_covers_fractional_splits() {
        let map = ChordMap::new(&[32.0 / 3.0; 3], 0.25);
        assert_eq!(map.len_beats(), 32.0);
        for step in 0..64 {
            assert!(map.chord_at(step as f64 * 0.5).is_some());
        }
        assert_eq!(map.chord_at(10.5), Some(0));
        assert_eq!(map.chord_at(10.75), Some(1));
    }

    #[test]
    fn apply_rhythm_emits_one_note_per_pitch_per_onset() {
        let config = GeneratorConfig::default();
        let chords = vec![timed(1, 8.0), timed(5, 8.0)];
        let list = onsets(RhythmPattern::Quarters, 4, &config, &mut ScriptedSource::zeros());
        let mut rng = ChordRng::seeded(9);
        let notes = apply_rhythm(&chords, &list, None, &config, &mut rng);

        assert_eq!(notes.len(), 16 * 3);
        assert!(notes.iter().all(|n| (80..=99).contains(&n.velocity)));
        let at_8: Vec<i32> = notes.iter().filter(|n| n.start_beat == 8.0).map(|n| n.pitch).collect();
        assert_eq!(at_8, vec![67, 71, 74]);
    }

    #[test]
    fn bass_doubling_adds_a_low_root() {
        let config = GeneratorConfig::default();
        let chords = vec![timed(1, 4.0)];
        let list = onsets(RhythmPattern::Half, 1, &config, &mut ScriptedSource::zeros());
        let mut rng = ChordRng::seeded(2);
        let notes = apply_rhythm(&chords, &list, Some(2), &config, &mut rng);

        assert_eq!(notes.len(), 2 * 4);
        let bass: Vec<&NoteEvent> = notes.iter().filter(|n| n.pitch == 36).collect();
        assert_eq!(bass.len(), 2);
        assert!(bass.iter().all(|n| (85..=99).contains(&n.velocity)));
    }

    #[test]
    fn onsets_past_the_map_are_skipped() {
        let config = GeneratorConfig::default();
        let chords = vec![timed(1, 4.0)];
        let list = onsets(RhythmPattern::Whole, 2, &config, &mut ScriptedSource::zeros());
        let notes = apply_rhythm(&chords, &list, None, &config, &mut ScriptedSource::zeros());
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().all(|n| n.start_beat == 0.0));
    }
}
