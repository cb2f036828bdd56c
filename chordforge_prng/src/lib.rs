// Injectable, seedable random source for the chord generator.
//
// Every random decision in the generation pipeline (progression choice,
// extension choice, chord-change pattern choice, rhythm durations, note
// velocities) is a call against the `RandomSource` trait defined here. The
// pipeline never reaches for a global generator: callers construct a source
// and thread it through `generate`/`generate_dual`, so a fixed seed
// reproduces an exact output sequence.
//
// Two implementations:
// - `ChordRng`: xoshiro256++ (Blackman & Vigna, 2019) seeded through
//   SplitMix64. Hand-rolled with zero dependencies so the stream is identical
//   on every platform and compiler version.
// - `ScriptedSource`: replays caller-supplied values, used by tests to force
//   a particular branch of a weighted or uniform draw.
//
// **Critical constraint: determinism.** `ChordRng` must produce the same
// sequence given the same seed. Do not introduce floating-point arithmetic
// into the core state update.

use std::collections::VecDeque;

/// A source of uniform random draws.
///
/// `draw` and `draw_float` are the only required methods; the helpers are
/// expressed in terms of them so a replaying test source gets them for free.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Panics if `n == 0`.
    fn draw(&mut self, n: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn draw_float(&mut self) -> f64;

    /// Pick one element uniformly. Panics on an empty slice.
    fn pick<'a, T>(&mut self, options: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        &options[self.draw(options.len())]
    }

    /// Uniform integer in `[low, high]`, both ends inclusive.
    fn draw_inclusive(&mut self, low: u8, high: u8) -> u8
    where
        Self: Sized,
    {
        assert!(low <= high, "draw_inclusive: low must be <= high");
        low + self.draw((high - low) as usize + 1) as u8
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool
    where
        Self: Sized,
    {
        self.draw_float() < p
    }
}

/// Xoshiro256++ generator, the pipeline's production random source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordRng {
    state: [u64; 4],
}

impl ChordRng {
    /// Seed a generator from a single `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so nearby seeds
    /// still give unrelated streams.
    pub fn seeded(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            state: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[0].wrapping_add(s[3]).rotate_left(23).wrapping_add(s[0]);
        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;
        s[3] = s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[0, bound)` by rejection sampling, so small bounds
    /// carry no modulo bias.
    fn below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "draw: bound must be positive");
        if bound.is_power_of_two() {
            return self.next_u64() & (bound - 1);
        }
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return r % bound;
            }
        }
    }
}

impl RandomSource for ChordRng {
    fn draw(&mut self, n: usize) -> usize {
        self.below(n as u64) as usize
    }

    fn draw_float(&mut self) -> f64 {
        // Upper 53 bits fill the f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// SplitMix64 step, used only for seeding.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Replays a fixed script of draws.
///
/// Integer draws come from `draws` (reduced modulo the requested bound) and
/// float draws from `floats`. An exhausted queue yields `0` / `0.0`, which
/// always selects the first option of a uniform pick.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    draws: VecDeque<usize>,
    floats: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = usize>, floats: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            floats: floats.into_iter().collect(),
        }
    }

    /// A source that always answers the lowest possible value.
    pub fn zeros() -> Self {
        Self::default()
    }
}

impl RandomSource for ScriptedSource {
    fn draw(&mut self, n: usize) -> usize {
        assert!(n > 0, "draw: bound must be positive");
        self.draws.pop_front().unwrap_or(0) % n
    }

    fn draw_float(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.0).clamp(0.0, 1.0 - f64::EPSILON)
    }
}
