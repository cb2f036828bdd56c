// Chordforge chord-progression generator
//
// A parametric generator of multi-voice chord progressions encoded as timed
// note events. A request names a key, mode, mood, length in bars and a
// rhythm pattern; the result is a clip of notes for a DAW, optionally with a
// contrasting second clip and derived bass and pad tracks.
//
// Architecture (leaves first; data flows downward):
// - theory.rs: Static tables: key spellings, mode intervals, pitch-class
//   names, mood complements, relative keys
// - scale.rs: 8-tone scale from a root and a mode
// - progression.rs: Mood → curated scale-degree progressions
// - timing.rs: Chord-change pattern library and per-chord durations
// - chord.rs: Chord pitches and names from scale + degree + extension
// - extension.rs: Per-chord extension choice by degree/position/mood
// - voicing.rs: Optional octave re-voicing to minimize movement
// - rhythm.rs: Onset patterns and expansion of timed chords into notes
// - derived.rs: Chord boundaries, sustained bass and slow pad from a clip
// - generator.rs: Request parameters and the generate/generate_dual pipeline
// - clip.rs: Output shapes (NoteEvent, GeneratedClip, DualClipResult)
// - config.rs: Tunable constants (GeneratorConfig)
// - midi.rs: Standard MIDI File export
// - error.rs: Error types
//
// Every random draw goes through a caller-supplied `RandomSource` from
// `chordforge_prng`, so output is deterministic given a seed.

pub mod chord;
pub mod clip;
pub mod config;
pub mod derived;
pub mod error;
pub mod extension;
pub mod generator;
pub mod midi;
pub mod progression;
pub mod rhythm;
pub mod scale;
pub mod theory;
pub mod timing;
pub mod voicing;

pub use clip::{ClipMetadata, DualClipResult, GeneratedClip, NoteEvent};
pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerateError};
pub use generator::{GenerateParams, Generator, generate, generate_dual};
pub use timing::ChordChangeLibrary;
