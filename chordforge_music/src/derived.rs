// Bass and pad tracks read back from a finished clip.
//
// Both tracks work from chord boundaries rather than from the chord objects
// that produced the clip, so they always agree with the notes actually
// emitted. A boundary is a start time whose set of distinct pitches (its
// signature) differs from the previous boundary's signature; repeated
// onsets of the same chord under a busy rhythm collapse into one boundary.
// Each boundary lasts until the next one, the last until the end of the clip.
//
// - Bass: one sustained note per boundary at the signature's lowest pitch.
// - Pad: the lowest pitch is dropped; the rest become a spread voicing of
//   three fixed voices (low, mid-low, mid-high) and three floating upper
//   voices that start at root + 48 + {2, 5, 9} and afterwards drift toward
//   each new target by at most `pad_max_step` semitones per boundary.

use crate::clip::{GeneratedClip, NoteEvent};
use crate::config::GeneratorConfig;
use tracing::debug;

/// Highest valid MIDI note number.
const MIDI_MAX: i32 = 127;

/// A point where the sounding chord changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub start: f64,
    /// Distinct pitches sounding at `start`, ascending.
    pub signature: Vec<i32>,
}

/// Chord-change boundaries of a note stream.
pub fn detect_boundaries(notes: &[NoteEvent]) -> Vec<Boundary> {
    let mut sorted: Vec<&NoteEvent> = notes.iter().collect();
    sorted.sort_by(|a, b| a.start_beat.total_cmp(&b.start_beat));

    let mut boundaries: Vec<Boundary> = Vec::new();
    for group in sorted.chunk_by(|a, b| a.start_beat == b.start_beat) {
        let mut signature: Vec<i32> = group.iter().map(|n| n.pitch).collect();
        signature.sort_unstable();
        signature.dedup();
        if boundaries.last().is_some_and(|b| b.signature == signature) {
            continue;
        }
        boundaries.push(Boundary {
            start: group[0].start_beat,
            signature,
        });
    }
    boundaries
}

/// Each boundary paired with how long it lasts.
fn with_durations(boundaries: &[Boundary], total_beats: f64) -> Vec<(&Boundary, f64)> {
    boundaries
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let end = boundaries.get(i + 1).map_or(total_beats, |next| next.start);
            (b, end - b.start)
        })
        .collect()
}

/// Sustained bass line: the lowest pitch of every boundary.
pub fn derive_bass(clip: &GeneratedClip, config: &GeneratorConfig) -> Vec<NoteEvent> {
    let boundaries = detect_boundaries(&clip.notes);
    debug!(boundaries = boundaries.len(), "deriving bass");
    with_durations(&boundaries, clip.total_beats())
        .into_iter()
        .filter_map(|(b, duration)| {
            b.signature.first().map(|&pitch| NoteEvent {
                pitch,
                start_beat: b.start,
                duration_beats: duration,
                velocity: config.derived_bass_velocity,
            })
        })
        .collect()
}

/// Fold a pitch down by octaves until it is a valid MIDI note.
fn fold_down(mut pitch: i32) -> i32 {
    while pitch > MIDI_MAX {
        pitch -= 12;
    }
    pitch
}

/// Move `from` toward `to` by at most `max_step`.
fn step_toward(from: i32, to: i32, max_step: i32) -> i32 {
    let distance = to - from;
    if distance.abs() <= max_step {
        to
    } else {
        from + max_step * distance.signum()
    }
}

/// Slow-moving pad voicing over the clip's chord boundaries.
pub fn derive_pad(clip: &GeneratedClip, config: &GeneratorConfig) -> Vec<NoteEvent> {
    let boundaries = detect_boundaries(&clip.notes);
    let mut upper: Option<[i32; 3]> = None;
    let mut pad = Vec::new();

    for (boundary, duration) in with_durations(&boundaries, clip.total_beats()) {
        let Some((&root, remaining)) = boundary.signature.split_first() else {
            continue;
        };
        let Some(&first) = remaining.first() else {
            continue;
        };

        let low = first + 12;
        let mid_low = remaining.get(1).copied().unwrap_or(first) + 12;
        let mid_high = remaining.get(2).copied().unwrap_or(first) + 24;

        let targets = config
            .pad_upper_offsets
            .map(|offset| root + config.pad_upper_register + offset);
        let voices = match upper {
            None => targets,
            Some(previous) => {
                let mut moved = previous;
                for (voice, target) in moved.iter_mut().zip(targets) {
                    *voice = step_toward(*voice, target, config.pad_max_step);
                }
                moved
            }
        };
        upper = Some(voices);

        for pitch in [low, mid_low, mid_high].into_iter().chain(voices) {
            pad.push(NoteEvent {
                pitch: fold_down(pitch),
                start_beat: boundary.start,
                duration_beats: duration,
                velocity: config.pad_velocity,
            });
        }
    }
    debug!(notes = pad.len(), "derived pad");
    pad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipMetadata;
    use crate::theory::{Mode, Mood};

    fn note(pitch: i32, start: f64, duration: f64) -> NoteEvent {
        NoteEvent {
            pitch,
            start_beat: start,
            duration_beats: duration,
            velocity: 90,
        }
    }

    fn clip(notes: Vec<NoteEvent>, bars: u32) -> GeneratedClip {
        GeneratedClip {
            notes,
            metadata: ClipMetadata {
                key: "C".into(),
                mode: Mode::Major,
                mood: Mood::Happy,
                progression: vec![1, 5],
                chord_names: vec!["Cmaj".into(), "G7".into()],
                chord_extensions: vec!["triad".into(), "seventh".into()],
                chord_durations: vec![4.0, 4.0],
                bars,
                rhythm: "quarters".into(),
                voice_leading: false,
                bpm: None,
            },
        }
    }

    /// Four quarter-note onsets of C major, then four of G7.
    fn two_chord_clip() -> GeneratedClip {
        let mut notes = Vec::new();
        for beat in 0..4 {
            for p in [60, 64, 67] {
                notes.push(note(p, beat as f64, 1.0));
            }
        }
        for beat in 4..8 {
            for p in [67, 71, 74, 77] {
                notes.push(note(p, beat as f64, 1.0));
            }
        }
        clip(notes, 2)
    }

    #[test]
    fn repeated_onsets_collapse_into_one_boundary() {
        let boundaries = detect_boundaries(&two_chord_clip().notes);
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].start, 0.0);
        assert_eq!(boundaries[0].signature, vec![60, 64, 67]);
        assert_eq!(boundaries[1].start, 4.0);
        assert_eq!(boundaries[1].signature, vec![67, 71, 74, 77]);
    }

    #[test]
    fn boundaries_ignore_note_order_and_duplicates() {
        let notes = vec![note(67, 2.0, 2.0), note(60, 0.0, 2.0), note(64, 0.0, 2.0), note(60, 0.0, 2.0)];
        let boundaries = detect_boundaries(&notes);
        assert_eq!(boundaries[0].signature, vec![60, 64]);
        assert_eq!(boundaries[1].signature, vec![67]);
    }

    #[test]
    fn bass_holds_the_lowest_pitch_to_the_next_change() {
        let config = GeneratorConfig::default();
        let bass = derive_bass(&two_chord_clip(), &config);
        assert_eq!(bass, vec![note(60, 0.0, 4.0), note(67, 4.0, 4.0)]);
    }

    #[test]
    fn bass_and_pad_durations_fill_the_clip() {
        let config = GeneratorConfig::default();
        let c = two_chord_clip();
        let bass_total: f64 = derive_bass(&c, &config).iter().map(|n| n.duration_beats).sum();
        assert_eq!(bass_total, 8.0);

        let pad = derive_pad(&c, &config);
        let starts: Vec<f64> = {
            let mut s: Vec<f64> = pad.iter().map(|n| n.start_beat).collect();
            s.dedup();
            s
        };
        assert_eq!(starts, vec![0.0, 4.0]);
        let last = pad.last().unwrap();
        assert_eq!(last.end_beat(), 8.0);
    }

    #[test]
    fn pad_voicing_spreads_the_upper_tones() {
        let config = GeneratorConfig::default();
        let pad = derive_pad(&two_chord_clip(), &config);
        assert_eq!(pad.len(), 12);
        assert!(pad.iter().all(|n| n.velocity == 65));

        let first: Vec<i32> = pad[..6].iter().map(|n| n.pitch).collect();
        // Remaining tones 64, 67: low 76, mid-low 79, mid-high falls back to
        // the first remaining tone, 64 + 24; upper voices at 60 + 48 + {2,5,9}.
        assert_eq!(first, vec![76, 79, 88, 110, 113, 117]);

        let second: Vec<i32> = pad[6..].iter().map(|n| n.pitch).collect();
        // Targets 67 + 48 + {2,5,9} = 117, 120, 124 are seven semitones away,
        // so each upper voice only steps three.
        assert_eq!(second, vec![83, 86, 101, 113, 116, 120]);
    }

    #[test]
    fn upper_voices_snap_when_close() {
        assert_eq!(step_toward(60, 62, 3), 62);
        assert_eq!(step_toward(60, 63, 3), 63);
        assert_eq!(step_toward(60, 70, 3), 63);
        assert_eq!(step_toward(70, 60, 3), 67);
    }

    #[test]
    fn pad_pitches_stay_in_midi_range() {
        let config = GeneratorConfig::default();
        let notes = vec![note(80, 0.0, 4.0), note(84, 0.0, 4.0), note(87, 0.0, 4.0)];
        let pad = derive_pad(&clip(notes, 1), &config);
        assert!(pad.iter().all(|n| n.pitch <= 127));
        assert_eq!(fold_down(137), 125);
    }

    #[test]
    fn single_pitch_boundaries_have_no_pad() {
        let config = GeneratorConfig::default();
        let pad = derive_pad(&clip(vec![note(48, 0.0, 4.0)], 1), &config);
        assert!(pad.is_empty());
    }
}
