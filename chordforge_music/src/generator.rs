// Generation pipeline: parameters in, finished clips out.
//
// `Generator::generate` runs the stages in order:
//   key + mode → scale → progression (mood) → extension per chord → chords
//   → chord-change timing → optional voice leading → rhythm onsets → notes.
// Every name in the request is resolved before the first random draw, so a
// bad request fails without consuming randomness and returns no partial clip.
//
// `Generator::generate_dual` runs the pipeline twice: once as requested, once
// in the relative key with the complementary mood. Bass and pad tracks for
// each clip are then read back from the finished notes (derived.rs).
//
// The random source is always passed in by the caller; nothing here keeps
// state between calls.

use crate::chord::Chord;
use crate::clip::{ClipMetadata, DualClipResult, GeneratedClip};
use crate::config::GeneratorConfig;
use crate::derived::{derive_bass, derive_pad};
use crate::error::GenerateError;
use crate::extension::select_extension;
use crate::progression::select_progression;
use crate::rhythm::{RhythmPattern, apply_rhythm, onsets};
use crate::scale::Scale;
use crate::theory::{Mode, Mood, key_pitch, relative_key};
use crate::timing::ChordChangeLibrary;
use crate::voicing::apply_voice_leading;
use chordforge_prng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A generation request as the request layer sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    /// Pitch-class name, any of the accepted spellings.
    pub key: String,
    #[serde(alias = "scale")]
    pub mode: String,
    pub mood: String,
    pub bars: u32,
    pub rhythm: String,
    #[serde(default)]
    pub voice_leading: bool,
    #[serde(default)]
    pub add_bass: bool,
    /// Octaves below the root for the bass doubling; `None` takes the
    /// generator config's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass_octave: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
}

impl GenerateParams {
    /// A request with the optional fields at their defaults.
    pub fn new(key: &str, mode: &str, mood: &str, bars: u32, rhythm: &str) -> Self {
        GenerateParams {
            key: key.to_string(),
            mode: mode.to_string(),
            mood: mood.to_string(),
            bars,
            rhythm: rhythm.to_string(),
            voice_leading: false,
            add_bass: false,
            bass_octave: None,
            bpm: None,
        }
    }
}

/// Request names resolved to their typed values.
struct Resolved {
    root: i32,
    mode: Mode,
    mood: Mood,
    rhythm: RhythmPattern,
    bass_octave: Option<u8>,
}

fn resolve(params: &GenerateParams, config: &GeneratorConfig) -> Result<Resolved, GenerateError> {
    let mode = Mode::from_name(&params.mode)?;
    let mood = Mood::from_name(&params.mood)?;
    let rhythm = RhythmPattern::from_name(&params.rhythm)?;
    let root = key_pitch(&params.key)?;
    if params.bars == 0 {
        return Err(GenerateError::InvalidBarCount(params.bars));
    }
    let bass_octave = params.bass_octave.unwrap_or(config.default_bass_octave);
    if !(1..=3).contains(&bass_octave) {
        return Err(GenerateError::InvalidBassOctave(bass_octave));
    }
    Ok(Resolved {
        root,
        mode,
        mood,
        rhythm,
        bass_octave: params.add_bass.then_some(bass_octave),
    })
}

/// Tunable constants plus the chord-change pattern library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generator {
    pub config: GeneratorConfig,
    pub library: ChordChangeLibrary,
}

impl Generator {
    pub fn new(config: GeneratorConfig, library: ChordChangeLibrary) -> Self {
        Generator { config, library }
    }

    /// Run the full pipeline once.
    pub fn generate(
        &self,
        params: &GenerateParams,
        rng: &mut impl RandomSource,
    ) -> Result<GeneratedClip, GenerateError> {
        let resolved = resolve(params, &self.config)?;
        let scale = Scale::build(resolved.root, resolved.mode);
        debug!(key = %params.key, mode = resolved.mode.name(), scale = ?scale.pitches(), "scale");

        let progression = select_progression(resolved.mood, rng);
        let total = progression.len();
        let chords: Vec<Chord> = progression
            .iter()
            .enumerate()
            .map(|(position, &degree)| {
                let extension = select_extension(degree, position, total, resolved.mood, rng);
                let chord = Chord::build(&scale, degree, extension);
                debug!(degree, extension = extension.name(), name = %chord.name, "chord");
                chord
            })
            .collect();

        let durations = self.library.plan(total, params.bars, rng);
        let chords: Vec<Chord> = chords
            .into_iter()
            .zip(&durations)
            .map(|(chord, &duration)| chord.with_duration(duration))
            .collect();
        let chords = if params.voice_leading {
            apply_voice_leading(chords)
        } else {
            chords
        };

        let onset_list = onsets(resolved.rhythm, params.bars, &self.config, rng);
        let notes = apply_rhythm(&chords, &onset_list, resolved.bass_octave, &self.config, rng);

        let metadata = ClipMetadata {
            key: params.key.clone(),
            mode: resolved.mode,
            mood: resolved.mood,
            progression: progression.to_vec(),
            chord_names: chords.iter().map(|c| c.name.clone()).collect(),
            chord_extensions: chords.iter().map(|c| c.extension.name().to_string()).collect(),
            chord_durations: durations,
            bars: params.bars,
            rhythm: resolved.rhythm.name().to_string(),
            voice_leading: params.voice_leading,
            bpm: params.bpm,
        };
        info!(
            chords = %metadata.chord_summary(),
            notes = notes.len(),
            bars = params.bars,
            "generated clip"
        );
        Ok(GeneratedClip { notes, metadata })
    }

    /// Generate a clip, a contrasting clip in the relative key with the
    /// complementary mood, and bass and pad tracks for both.
    pub fn generate_dual(
        &self,
        params: &GenerateParams,
        rng: &mut impl RandomSource,
    ) -> Result<DualClipResult, GenerateError> {
        let clip1 = self.generate(params, rng)?;

        let relative = relative_key(&params.key, clip1.metadata.mode)?;
        let complementary = clip1.metadata.mood.complement();
        debug!(
            key = %relative.key,
            mode = relative.mode.name(),
            mood = complementary.name(),
            "second clip"
        );
        let second = GenerateParams {
            key: relative.key.clone(),
            mode: relative.mode.name().to_string(),
            mood: complementary.name().to_string(),
            ..params.clone()
        };
        let clip2 = self.generate(&second, rng)?;

        Ok(DualClipResult {
            bass1: derive_bass(&clip1, &self.config),
            bass2: derive_bass(&clip2, &self.config),
            pad1: derive_pad(&clip1, &self.config),
            pad2: derive_pad(&clip2, &self.config),
            clip1,
            clip2,
            relative_key: relative,
            complementary_mood: complementary,
        })
    }
}

/// `Generator::default().generate(params, rng)`.
pub fn generate(params: &GenerateParams, rng: &mut impl RandomSource) -> Result<GeneratedClip, GenerateError> {
    Generator::default().generate(params, rng)
}

/// `Generator::default().generate_dual(params, rng)`.
pub fn generate_dual(
    params: &GenerateParams,
    rng: &mut impl RandomSource,
) -> Result<DualClipResult, GenerateError> {
    Generator::default().generate_dual(params, rng)
}
