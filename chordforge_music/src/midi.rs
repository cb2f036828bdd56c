// MIDI output from generated clips.
//
// Converts note-event streams into a Standard MIDI File (SMF Format 1,
// multi-track): track 0 carries the tempo, then one track per stream. A
// single clip has one "Chords" track; a dual result has chords, bass and
// pad for each of its two clips. Beats map to ticks at `ticks_per_quarter`
// (a beat is a quarter note).
//
// Within a track, events are ordered by tick with note-offs before note-ons
// at the same tick, so a repeated pitch re-attacks instead of being cut off.
// Pitches are clamped to the MIDI range 0..=127.
//
// Uses the `midly` crate for MIDI writing. This is an export the caller asks
// for; generation itself writes nothing.

use crate::clip::{DualClipResult, GeneratedClip, NoteEvent};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Tempo used when a clip carries no bpm.
pub const DEFAULT_BPM: u16 = 120;

/// General MIDI program for every track (string ensemble).
const PROGRAM: u8 = 48;

/// A named note stream bound for one track.
struct Stream<'a> {
    name: &'static str,
    notes: &'a [NoteEvent],
}

/// Write an SMF to disk.
pub fn write_midi(smf: &Smf, path: &Path) -> std::io::Result<()> {
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)
}

/// One clip as a two-track SMF (tempo + chords).
pub fn clip_to_smf(clip: &GeneratedClip, ticks_per_quarter: u16) -> Smf<'static> {
    let bpm = clip.metadata.bpm.unwrap_or(DEFAULT_BPM);
    build_smf(
        &[Stream {
            name: "Chords",
            notes: &clip.notes,
        }],
        bpm,
        ticks_per_quarter,
    )
}

/// A dual result as a seven-track SMF (tempo + chords/bass/pad for each clip).
pub fn dual_to_smf(dual: &DualClipResult, ticks_per_quarter: u16) -> Smf<'static> {
    let bpm = dual.clip1.metadata.bpm.unwrap_or(DEFAULT_BPM);
    let streams = [
        Stream { name: "Chords 1", notes: &dual.clip1.notes },
        Stream { name: "Bass 1", notes: &dual.bass1 },
        Stream { name: "Pad 1", notes: &dual.pad1 },
        Stream { name: "Chords 2", notes: &dual.clip2.notes },
        Stream { name: "Bass 2", notes: &dual.bass2 },
        Stream { name: "Pad 2", notes: &dual.pad2 },
    ];
    build_smf(&streams, bpm, ticks_per_quarter)
}

fn build_smf(streams: &[Stream], bpm: u16, ticks_per_quarter: u16) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(ticks_per_quarter)),
    ));

    // Track 0: tempo track
    let mut tempo_track: Track<'static> = Vec::new();
    let tempo_microseconds = 60_000_000 / bpm.max(1) as u32;
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    for (i, stream) in streams.iter().enumerate() {
        let channel = u4::new(i as u8 % 16);
        smf.tracks.push(stream_track(stream, channel, ticks_per_quarter));
    }
    smf
}

/// A timed note-on or note-off, before delta encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimedEvent {
    tick: u32,
    /// Offs sort before ons at equal ticks.
    on: bool,
    key: u8,
    vel: u8,
}

fn beat_to_tick(beat: f64, ticks_per_quarter: u16) -> u32 {
    (beat.max(0.0) * ticks_per_quarter as f64).round() as u32
}

fn timed_events(notes: &[NoteEvent], ticks_per_quarter: u16) -> Vec<TimedEvent> {
    let mut events = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        let key = note.pitch.clamp(0, 127) as u8;
        let start = beat_to_tick(note.start_beat, ticks_per_quarter);
        let end = beat_to_tick(note.end_beat(), ticks_per_quarter).max(start + 1);
        events.push(TimedEvent {
            tick: start,
            on: true,
            key,
            vel: note.velocity.min(127),
        });
        events.push(TimedEvent {
            tick: end,
            on: false,
            key,
            vel: 0,
        });
    }
    events.sort();
    events
}

fn stream_track(stream: &Stream, channel: u4, ticks_per_quarter: u16) -> Track<'static> {
    let mut track: Track<'static> = Vec::new();

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(stream.name.as_bytes())),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(PROGRAM),
            },
        },
    });

    let mut last_tick = 0;
    for event in timed_events(stream.notes, ticks_per_quarter) {
        let message = if event.on {
            MidiMessage::NoteOn {
                key: u7::new(event.key),
                vel: u7::new(event.vel),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(event.key),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(event.tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = event.tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}
