//! Pool-exhaustion fallback.
//!
//! When the rolled pool has no eligible candidates left, a fixed
//! priority-ordered chain of alternate pools is consulted before the slot is
//! given up as unfilled.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{PoolName, ScoredItem};

use super::rolls::RollSource;
use super::sampler;

/// The three pre-fetched candidate pools for one feed-generation call.
/// Owned exclusively by that call; nothing here is shared across requests.
#[derive(Debug, Default)]
pub struct CandidatePools {
    pub random: Vec<ScoredItem>,
    pub trending: Vec<ScoredItem>,
    pub personalized: Vec<ScoredItem>,
}

impl CandidatePools {
    pub fn get(&self, pool: PoolName) -> &[ScoredItem] {
        match pool {
            PoolName::Random => &self.random,
            PoolName::Trending => &self.trending,
            PoolName::Personalized => &self.personalized,
        }
    }
}

/// Priority order consulted when `entry` is exhausted. Fixed per entry pool;
/// logged-out entry pools never reach into the personalized pool.
pub fn chain_for(entry: PoolName) -> &'static [PoolName] {
    match entry {
        PoolName::Personalized => &[PoolName::Personalized, PoolName::Trending, PoolName::Random],
        PoolName::Trending => &[PoolName::Trending, PoolName::Random],
        PoolName::Random => &[PoolName::Random, PoolName::Trending],
    }
}

/// Pick one un-excluded candidate for a slot, starting from the rolled pool.
///
/// The first pool in the chain with any eligible candidate settles the slot
/// via the weighted sampler; later pools are not consulted. Returns `None`
/// only when every pool in the chain is exhausted. The returned item's
/// `pool` tag records which pool actually satisfied the slot.
pub fn select_from<'a>(
    entry: PoolName,
    exclude: &HashSet<Uuid>,
    pools: &'a CandidatePools,
    rolls: &mut dyn RollSource,
) -> Option<&'a ScoredItem> {
    for pool in chain_for(entry) {
        let eligible: Vec<&ScoredItem> = pools
            .get(*pool)
            .iter()
            .filter(|candidate| !exclude.contains(&candidate.item.id))
            .collect();

        if !eligible.is_empty() {
            return sampler::sample(rolls, &eligible);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedItem;
    use crate::services::rolls::SeededRolls;
    use chrono::Utc;

    fn scored(pool: PoolName, score: f64) -> ScoredItem {
        ScoredItem::new(
            FeedItem {
                id: Uuid::new_v4(),
                author_id: Uuid::new_v4(),
                created_at: Utc::now(),
                like_count: 0,
                comment_count: 0,
                share_count: 0,
                embedding: None,
                cell_id: None,
                tags: vec![],
            },
            pool,
            score,
        )
    }

    #[test]
    fn test_chain_orders() {
        assert_eq!(
            chain_for(PoolName::Personalized),
            &[PoolName::Personalized, PoolName::Trending, PoolName::Random]
        );
        assert_eq!(
            chain_for(PoolName::Trending),
            &[PoolName::Trending, PoolName::Random]
        );
        assert_eq!(
            chain_for(PoolName::Random),
            &[PoolName::Random, PoolName::Trending]
        );
    }

    #[test]
    fn test_primary_pool_wins_when_populated() {
        let pools = CandidatePools {
            random: vec![scored(PoolName::Random, 1.0)],
            trending: vec![scored(PoolName::Trending, 100.0)],
            personalized: vec![],
        };

        let mut rolls = SeededRolls::new(3);
        let picked = select_from(PoolName::Random, &HashSet::new(), &pools, &mut rolls).unwrap();

        // Trending's far higher score is irrelevant: random had a candidate
        assert_eq!(picked.pool, PoolName::Random);
    }

    #[test]
    fn test_personalized_falls_through_to_random() {
        let pools = CandidatePools {
            random: vec![scored(PoolName::Random, 1.0)],
            trending: vec![],
            personalized: vec![],
        };

        let mut rolls = SeededRolls::new(3);
        let picked =
            select_from(PoolName::Personalized, &HashSet::new(), &pools, &mut rolls).unwrap();

        assert_eq!(picked.pool, PoolName::Random);
    }

    #[test]
    fn test_all_pools_exhausted_yields_none() {
        let pools = CandidatePools::default();
        let mut rolls = SeededRolls::new(3);

        assert!(select_from(PoolName::Personalized, &HashSet::new(), &pools, &mut rolls).is_none());
        assert!(select_from(PoolName::Trending, &HashSet::new(), &pools, &mut rolls).is_none());
        assert!(select_from(PoolName::Random, &HashSet::new(), &pools, &mut rolls).is_none());
    }

    #[test]
    fn test_excluded_candidates_trigger_fallback() {
        let trending_item = scored(PoolName::Trending, 2.0);
        let random_item = scored(PoolName::Random, 1.0);

        let exclude: HashSet<Uuid> = [trending_item.item.id].into_iter().collect();
        let pools = CandidatePools {
            random: vec![random_item],
            trending: vec![trending_item],
            personalized: vec![],
        };

        let mut rolls = SeededRolls::new(3);
        let picked = select_from(PoolName::Trending, &exclude, &pools, &mut rolls).unwrap();

        // The only trending candidate is excluded, so the chain reaches random
        assert_eq!(picked.pool, PoolName::Random);
    }

    #[test]
    fn test_random_entry_never_reaches_personalized() {
        let pools = CandidatePools {
            random: vec![],
            trending: vec![],
            personalized: vec![scored(PoolName::Personalized, 5.0)],
        };

        let mut rolls = SeededRolls::new(3);

        assert!(select_from(PoolName::Random, &HashSet::new(), &pools, &mut rolls).is_none());
        assert!(select_from(PoolName::Trending, &HashSet::new(), &pools, &mut rolls).is_none());
    }
}
