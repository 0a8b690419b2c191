//! Weighted (roulette-wheel) sampling over scored candidates.
//!
//! Selection probability is proportional to score, not rank: low-scoring
//! items stay selectable, which keeps feeds from collapsing onto a handful
//! of winners.

use crate::models::ScoredItem;

use super::rolls::RollSource;

/// Floor applied to every candidate's score before it becomes a sampling
/// weight. Guarantees a non-zero chance for zero-scored candidates.
pub const MIN_SAMPLING_WEIGHT: f64 = 0.1;

/// Draw one candidate. Empty input yields `None`; a single candidate is
/// returned regardless of its score; otherwise a uniform draw in
/// [0, total_weight) walks the cumulative weights.
pub fn sample<'a>(
    rolls: &mut dyn RollSource,
    candidates: &[&'a ScoredItem],
) -> Option<&'a ScoredItem> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => {
            let total: f64 = candidates.iter().map(|c| sampling_weight(c)).sum();
            let draw = rolls.weight_draw(total);

            let mut accumulated = 0.0;
            for candidate in candidates.iter().copied() {
                accumulated += sampling_weight(candidate);
                if accumulated > draw {
                    return Some(candidate);
                }
            }

            // Float accumulation can leave the draw unclaimed by a hair
            candidates.last().copied()
        }
    }
}

fn sampling_weight(candidate: &ScoredItem) -> f64 {
    candidate.score.max(MIN_SAMPLING_WEIGHT)
}
