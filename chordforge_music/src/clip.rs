// Output data: note events, generated clips and the dual-clip result.
//
// `NoteEvent` is the only unit that leaves the engine. Its serialized field
// names (`pitch`, `start_time`, `duration`, `velocity`) are what the DAW
// bridge reads. A clip's notes are emitted in onset order but consumers
// should treat them as an unordered set and sort if they care.

use crate::theory::{Mode, Mood, RelativeKey};
use serde::{Deserialize, Serialize};

/// One sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: i32,
    #[serde(rename = "start_time")]
    pub start_beat: f64,
    #[serde(rename = "duration")]
    pub duration_beats: f64,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }
}

/// Everything a caller needs to describe a clip without re-deriving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipMetadata {
    pub key: String,
    pub mode: Mode,
    pub mood: Mood,
    pub progression: Vec<u8>,
    pub chord_names: Vec<String>,
    pub chord_extensions: Vec<String>,
    pub chord_durations: Vec<f64>,
    pub bars: u32,
    pub rhythm: String,
    pub voice_leading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
}

impl ClipMetadata {
    /// Length of the clip in beats.
    pub fn total_beats(&self) -> f64 {
        self.bars as f64 * crate::timing::BEATS_PER_BAR
    }

    /// Chord names joined for display, e.g. `Cmaj → G7 → Am → Fmaj`.
    pub fn chord_summary(&self) -> String {
        self.chord_names.join(" → ")
    }
}

/// A finished chord clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedClip {
    pub notes: Vec<NoteEvent>,
    pub metadata: ClipMetadata,
}

impl GeneratedClip {
    pub fn total_beats(&self) -> f64 {
        self.metadata.total_beats()
    }
}

/// Two contrasting clips plus bass and pad tracks derived from each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualClipResult {
    pub clip1: GeneratedClip,
    pub clip2: GeneratedClip,
    pub bass1: Vec<NoteEvent>,
    pub bass2: Vec<NoteEvent>,
    pub pad1: Vec<NoteEvent>,
    pub pad2: Vec<NoteEvent>,
    /// Key and mode the second clip was generated in.
    pub relative_key: RelativeKey,
    /// Mood the second clip was generated with.
    pub complementary_mood: Mood,
}
