// Voice leading: re-octave each chord to move as little as possible from the
// one before it.
//
// The first chord keeps its voicing and becomes the reference. For every
// later chord, each pitch may independently move down an octave, stay, or
// move up an octave; all 3^k combinations are enumerated with an explicit
// odometer (no recursion) and the cheapest is kept. Cost is the sum, over the
// candidate's pitches, of the distance to the nearest pitch of the previous
// finalized chord.
//
// The search is greedy chord-to-chord, not a global path optimization. Ties
// keep the unshifted voicing, then the first candidate in enumeration order,
// so the result is deterministic.

use crate::chord::Chord;
use tracing::debug;

/// Octave shifts tried for each pitch, in enumeration order.
const SHIFTS: [i32; 3] = [-12, 0, 12];

/// Sum of each pitch's distance to its nearest neighbour in `previous`.
pub fn voicing_cost(previous: &[i32], candidate: &[i32]) -> i32 {
    candidate
        .iter()
        .map(|&p| previous.iter().map(|&q| (p - q).abs()).min().unwrap_or(0))
        .sum()
}

/// Cheapest octave placement of `current` relative to `previous`.
pub fn best_voicing(previous: &[i32], current: &[i32]) -> Vec<i32> {
    let mut best = current.to_vec();
    let mut best_cost = voicing_cost(previous, current);

    let k = current.len();
    let mut digits = vec![0usize; k];
    let mut candidate = vec![0i32; k];
    loop {
        for (i, &d) in digits.iter().enumerate() {
            candidate[i] = current[i] + SHIFTS[d];
        }
        let cost = voicing_cost(previous, &candidate);
        if cost < best_cost {
            best_cost = cost;
            best.copy_from_slice(&candidate);
        }

        // Advance the odometer; the last pitch turns fastest.
        let mut i = k;
        loop {
            if i == 0 {
                return best;
            }
            i -= 1;
            digits[i] += 1;
            if digits[i] < SHIFTS.len() {
                break;
            }
            digits[i] = 0;
        }
    }
}

/// Apply voice leading across a progression.
pub fn apply_voice_leading(chords: Vec<Chord>) -> Vec<Chord> {
    let mut result: Vec<Chord> = Vec::with_capacity(chords.len());
    for chord in chords {
        let voiced = match result.last() {
            None => chord,
            Some(previous) => {
                let pitches = best_voicing(&previous.pitches, &chord.pitches);
                debug!(
                    chord = %chord.name,
                    before = voicing_cost(&previous.pitches, &chord.pitches),
                    after = voicing_cost(&previous.pitches, &pitches),
                    "voice leading"
                );
                chord.with_pitches(pitches)
            }
        };
        result.push(voiced);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Extension;
    use crate::scale::Scale;
    use crate::theory::Mode;

    #[test]
    fn cost_is_nearest_neighbour_distance() {
        assert_eq!(voicing_cost(&[60, 64, 67], &[60, 64, 67]), 0);
        assert_eq!(voicing_cost(&[60, 64, 67], &[62, 65, 69]), 2 + 1 + 2);
        assert_eq!(voicing_cost(&[], &[60]), 0);
    }

    #[test]
    fn best_voicing_pulls_a_distant_chord_down() {
        // C major then the same triad an octave up: shifting everything down
        // costs nothing.
        assert_eq!(best_voicing(&[60, 64, 67], &[72, 76, 79]), vec![60, 64, 67]);
    }

    #[test]
    fn ties_keep_the_unshifted_voicing() {
        assert_eq!(best_voicing(&[60], &[66]), vec![66]);
    }

    #[test]
    fn best_voicing_is_exhaustive() {
        let previous = [55, 64, 72];
        let current = [69, 72, 76, 79];
        let best = best_voicing(&previous, &current);
        let best_cost = voicing_cost(&previous, &best);
        // Brute-force every combination independently of the odometer.
        for a in SHIFTS {
            for b in SHIFTS {
                for c in SHIFTS {
                    for d in SHIFTS {
                        let cand = [current[0] + a, current[1] + b, current[2] + c, current[3] + d];
                        assert!(best_cost <= voicing_cost(&previous, &cand));
                    }
                }
            }
        }
    }

    #[test]
    fn first_chord_unchanged_and_later_chords_never_worse() {
        let scale = Scale::build(60, Mode::Major);
        let chords: Vec<Chord> = [(1, Extension::Triad), (6, Extension::Seventh), (4, Extension::Ninth), (5, Extension::Sus4)]
            .into_iter()
            .map(|(d, e)| Chord::build(&scale, d, e))
            .collect();
        let voiced = apply_voice_leading(chords.clone());

        assert_eq!(voiced[0].pitches, chords[0].pitches);
        for i in 1..voiced.len() {
            let prev = &voiced[i - 1].pitches;
            assert!(voicing_cost(prev, &voiced[i].pitches) <= voicing_cost(prev, &chords[i].pitches));
            assert_eq!(voiced[i].pitches.len(), chords[i].pitches.len());
            assert_eq!(voiced[i].name, chords[i].name);
        }
    }

    #[test]
    fn empty_progression_is_fine() {
        assert!(apply_voice_leading(Vec::new()).is_empty());
    }
}
