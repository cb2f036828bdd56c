// Chordforge CLI entry point.
//
// Generates a chord clip (or, with --dual, a clip plus a contrasting clip in
// the relative key with derived bass and pad tracks) and prints it as JSON
// on stdout. Logging goes to stderr; set RUST_LOG to adjust (default info).
//
// Usage:
//   cargo run -p chordforge_music -- --key C --mode Major --mood happy \
//     [--bars 8] [--rhythm quarters] [--voice-leading] [--add-bass]
//     [--bass-octave 2] [--bpm 120] [--seed N] [--dual]
//     [--config config.json] [--patterns patterns.json] [--midi out.mid]
//
// Without --seed, a seed is taken from the system clock and logged so the
// run can be reproduced.

use anyhow::{Context, Result};
use chordforge_music::midi::{clip_to_smf, dual_to_smf, write_midi};
use chordforge_music::{ChordChangeLibrary, GenerateParams, Generator, GeneratorConfig};
use chordforge_prng::ChordRng;
use clap::Parser;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

#[derive(Parser)]
#[command(name = "generate")]
#[command(about = "Generate chord progressions as note events")]
#[command(version)]
struct Cli {
    /// Key (C, C#, Db, ... B)
    #[arg(long, default_value = "C")]
    key: String,

    /// Mode (Major, Minor, Dorian, Phrygian, Lydian, Mixolydian, Aeolian, Locrian)
    #[arg(long, default_value = "Major")]
    mode: String,

    /// Mood (happy, sad, dark, jazzy, tense, calm)
    #[arg(long, default_value = "happy")]
    mood: String,

    /// Length in bars
    #[arg(long, default_value_t = 8)]
    bars: u32,

    /// Rhythm pattern (whole, half, quarters, eighths, random)
    #[arg(long, default_value = "quarters")]
    rhythm: String,

    /// Re-voice chords to minimize movement
    #[arg(long)]
    voice_leading: bool,

    /// Double each chord root in the bass
    #[arg(long)]
    add_bass: bool,

    /// Octaves below the root for the bass doubling (1-3)
    #[arg(long)]
    bass_octave: Option<u8>,

    /// Tempo recorded in the metadata and MIDI file
    #[arg(long)]
    bpm: Option<u16>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Also generate the contrasting clip plus bass and pad tracks
    #[arg(long)]
    dual: bool,

    /// Generator config JSON (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chord-change pattern library JSON
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Also write a Standard MIDI File here
    #[arg(long)]
    midi: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path).context("loading generator config")?,
        None => GeneratorConfig::default(),
    };
    let library = match &cli.patterns {
        Some(path) => ChordChangeLibrary::load(path).context("loading chord-change patterns")?,
        None => ChordChangeLibrary::default(),
    };

    let params = GenerateParams {
        key: cli.key,
        mode: cli.mode,
        mood: cli.mood,
        bars: cli.bars,
        rhythm: cli.rhythm,
        voice_leading: cli.voice_leading,
        add_bass: cli.add_bass,
        bass_octave: cli.bass_octave,
        bpm: cli.bpm,
    };

    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(seed, "seeding generator");
    let mut rng = ChordRng::seeded(seed);

    let ticks_per_quarter = config.ticks_per_quarter;
    let generator = Generator::new(config, library);

    if cli.dual {
        let dual = generator.generate_dual(&params, &mut rng)?;
        println!("{}", serde_json::to_string_pretty(&dual)?);
        if let Some(path) = &cli.midi {
            write_midi(&dual_to_smf(&dual, ticks_per_quarter), path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote MIDI");
        }
    } else {
        let clip = generator.generate(&params, &mut rng)?;
        println!("{}", serde_json::to_string_pretty(&clip)?);
        if let Some(path) = &cli.midi {
            write_midi(&clip_to_smf(&clip, ticks_per_quarter), path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote MIDI");
        }
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
