// Error types for generation and for loading external data.
//
// Generation errors are validation-class only: the pipeline does no I/O, so
// every failure is an unrecognized name or an out-of-range parameter and
// surfaces synchronously with no partial result. Config and pattern-library
// loading touch the filesystem and get their own error type.

use thiserror::Error;

/// A generation request named something the pipeline does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown mood: {0}")]
    UnknownMood(String),

    #[error("unknown rhythm pattern: {0}")]
    UnknownRhythmPattern(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("bar count must be positive, got {0}")]
    InvalidBarCount(u32),

    #[error("bass octave must be between 1 and 3, got {0}")]
    InvalidBassOctave(u8),
}

/// Failure loading a `GeneratorConfig` or `ChordChangeLibrary` from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config field {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid chord-change pattern for {chords} chords over {bars} bars: {reason}")]
    InvalidPattern {
        chords: usize,
        bars: u32,
        reason: String,
    },
}
