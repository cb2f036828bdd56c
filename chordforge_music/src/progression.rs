// Mood-to-progression mapping.
//
// Each mood owns a curated set of progression templates: ordered scale
// degrees (1-7), three to eight chords long. `select_progression` draws one
// template uniformly. Its length is used directly as the chord count; filling
// the requested bar count is the chord-change timing planner's job
// (timing.rs), not a matter of repeating the progression.

use crate::theory::Mood;
use chordforge_prng::RandomSource;
use tracing::debug;

/// Progression templates for one mood.
pub fn templates(mood: Mood) -> &'static [&'static [u8]] {
    match mood {
        Mood::Happy => &[
            &[1, 5, 6, 4],          // I-V-vi-IV
            &[1, 4, 5, 1],          // I-IV-V-I
            &[1, 6, 4, 5],          // I-vi-IV-V
            &[1, 4, 5],             // I-IV-V
            &[1, 5, 6, 3, 4],       // I-V-vi-iii-IV
            &[1, 3, 4, 1, 5],       // I-iii-IV-I-V
            &[1, 6, 4, 1, 5, 1],    // I-vi-IV-I-V-I
            &[4, 1, 5, 6, 4, 5, 1], // IV-I-V-vi-IV-V-I
        ],
        Mood::Sad => &[
            &[6, 4, 1, 5],
            &[1, 6, 3, 4],
            &[1, 4, 6, 5],
            &[6, 4, 5],
            &[1, 6, 4, 1, 5],
            &[2, 5, 1, 6],
            &[1, 3, 6, 4, 1, 5],
            &[6, 3, 4, 1, 4, 5, 1],
        ],
        Mood::Dark => &[
            &[1, 3, 6, 7],
            &[1, 7, 6, 7],
            &[1, 2, 1, 2],
            &[1, 6, 7],
            &[1, 3, 7, 6, 5],
            &[7, 6, 5, 1],
            &[1, 2, 3, 7, 6, 1],
            &[1, 7, 3, 6, 2, 5, 1],
        ],
        Mood::Jazzy => &[
            &[2, 5, 1, 1],          // ii-V-I turnaround
            &[1, 6, 2, 5],          // I-vi-ii-V
            &[3, 6, 2, 5],          // iii-vi-ii-V
            &[2, 5, 1],
            &[1, 6, 2, 5, 1],
            &[3, 6, 2, 5, 1, 6],
            &[1, 4, 3, 6, 2, 5, 1],
        ],
        Mood::Tense => &[
            &[1, 2, 1, 2],
            &[1, 7, 1, 7],
            &[7, 1, 2, 1],
            &[1, 2, 3],
            &[7, 6, 5, 4, 3],
            &[1, 7, 6, 5, 1],
            &[2, 1, 2, 3, 2, 1],
            &[1, 7, 6, 2, 3, 7, 1],
        ],
        Mood::Calm => &[
            &[1, 4, 1, 5],
            &[1, 3, 4, 5],
            &[6, 4, 1, 5],
            &[1, 4, 5],
            &[1, 3, 6, 4, 5],
            &[4, 1, 5, 1],
            &[1, 6, 3, 4, 1, 5],
            &[1, 3, 4, 1, 6, 4, 5, 1],
        ],
    }
}

/// Draw one progression template for `mood`.
pub fn select_progression(mood: Mood, rng: &mut impl RandomSource) -> &'static [u8] {
    let progression = *rng.pick(templates(mood));
    debug!(mood = mood.name(), ?progression, "selected progression");
    progression
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordforge_prng::{ChordRng, ScriptedSource};

    #[test]
    fn templates_are_well_formed() {
        for mood in Mood::ALL {
            let set = templates(mood);
            assert!(!set.is_empty());
            for progression in set {
                assert!((3..=8).contains(&progression.len()), "{mood:?} {progression:?}");
                assert!(progression.iter().all(|d| (1..=7).contains(d)));
            }
        }
    }

    #[test]
    fn selection_comes_from_the_mood_set() {
        let mut rng = ChordRng::seeded(11);
        for mood in Mood::ALL {
            for _ in 0..50 {
                let p = select_progression(mood, &mut rng);
                assert!(templates(mood).contains(&p));
            }
        }
    }

    #[test]
    fn scripted_draw_picks_by_index() {
        let mut src = ScriptedSource::new([3], []);
        assert_eq!(select_progression(Mood::Jazzy, &mut src), &[2, 5, 1]);
    }
}
