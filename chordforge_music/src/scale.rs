// Scale construction.
//
// A `Scale` is eight strictly increasing pitches: the root, the six tones
// above it, and the octave. It is built once per generation call by summing
// the mode's step intervals onto the root and never changes afterwards.
// `ChordBuilder` (chord.rs) reads tones through `tone`, which treats the
// scale as repeating every octave so stacked thirds past the seventh degree
// land in the right register.

use crate::theory::Mode;

/// Root plus seven ascending tones (the last is the octave).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    pitches: [i32; 8],
}

impl Scale {
    /// Build the scale of `mode` starting at `root`.
    pub fn build(root: i32, mode: Mode) -> Scale {
        let mut pitches = [root; 8];
        let mut current = root;
        for (i, step) in mode.intervals().into_iter().enumerate() {
            current += step;
            pitches[i + 1] = current;
        }
        Scale { pitches }
    }

    pub fn pitches(&self) -> &[i32; 8] {
        &self.pitches
    }

    pub fn root(&self) -> i32 {
        self.pitches[0]
    }

    /// Pitch at a zero-based position in the scale extended upward through
    /// further octaves: position 7 is the octave, 9 the ninth, and so on.
    pub fn tone(&self, position: usize) -> i32 {
        self.pitches[position % 7] + 12 * (position / 7) as i32
    }

    /// Root pitch of a 1-based scale degree.
    pub fn degree_root(&self, degree: u8) -> i32 {
        self.tone(degree_index(degree))
    }
}

/// Zero-based scale index of a 1-based degree, wrapping degrees past 7.
pub fn degree_index(degree: u8) -> usize {
    (degree.max(1) as usize - 1) % 7
}
