//! Slot-by-slot feed composition.
//!
//! One feed-generation call fetches the three candidate pools in parallel,
//! then fills each slot with an independent roll: the roll picks a pool, the
//! fallback chain and weighted sampler pick an item, and the item becomes
//! ineligible for every later slot. Pool exhaustion leaves a slot unfilled;
//! a feed shorter than requested is a normal outcome, not a failure.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::{FeedGenerationConfig, PoolTuning};
use crate::models::{FeedPage, FeedStats, PoolRollCounts, SlotResult};
use crate::providers::{
    EngagementScorer, PersonalizationSource, PostSource, ReputationProvider,
};

use super::fallback::{self, CandidatePools};
use super::pools::{CandidatePool, PersonalizedPool, RandomPool, TrendingPool};
use super::rolls::{RollSource, ThreadRngRolls};
use super::selector;
use super::Result;

pub struct SlotFeedComposer {
    random: Arc<dyn CandidatePool>,
    trending: Arc<dyn CandidatePool>,
    personalized: Arc<dyn CandidatePool>,
    rolls: Mutex<Box<dyn RollSource>>,
}

impl SlotFeedComposer {
    pub fn new(
        random: Arc<dyn CandidatePool>,
        trending: Arc<dyn CandidatePool>,
        personalized: Arc<dyn CandidatePool>,
    ) -> Self {
        Self {
            random,
            trending,
            personalized,
            rolls: Mutex::new(Box::new(ThreadRngRolls)),
        }
    }

    /// Wire the three standard pools from their providers.
    pub fn from_providers(
        posts: Arc<dyn PostSource>,
        reputation: Arc<dyn ReputationProvider>,
        engagement: Arc<dyn EngagementScorer>,
        personalization: Arc<dyn PersonalizationSource>,
        tuning: PoolTuning,
    ) -> Self {
        Self::new(
            Arc::new(RandomPool::new(
                posts.clone(),
                reputation.clone(),
                tuning.clone(),
            )),
            Arc::new(TrendingPool::new(
                posts,
                reputation,
                engagement,
                tuning.clone(),
            )),
            Arc::new(PersonalizedPool::new(personalization, tuning)),
        )
    }

    /// Replace the randomness source (seeded or scripted rolls in tests).
    pub fn with_roll_source(mut self, rolls: Box<dyn RollSource>) -> Self {
        self.rolls = Mutex::new(rolls);
        self
    }

    /// Generate one feed page.
    ///
    /// The only fallible step is config validation; degraded pools and
    /// exhausted slots are absorbed, and the returned page may carry fewer
    /// posts than `config.slots`.
    pub async fn generate_feed(
        &self,
        user_id: Option<Uuid>,
        config: FeedGenerationConfig,
    ) -> Result<FeedPage> {
        let config = config.normalized()?;
        let logged_in = user_id.is_some();

        // The single await point: all three pools fetched up front, so one
        // call samples without replacement from one consistent universe.
        // PersonalizedPool returns empty for a logged-out viewer.
        let (random, trending, personalized) = tokio::join!(
            self.random.fetch(user_id),
            self.trending.fetch(user_id),
            self.personalized.fetch(user_id),
        );
        let pools = CandidatePools {
            random,
            trending,
            personalized,
        };

        let mut exclude: HashSet<Uuid> = config.exclude_ids.clone();
        let mut posts: Vec<SlotResult> = Vec::with_capacity(config.slots);
        let mut roll_trace: Vec<u8> = Vec::with_capacity(config.slots);
        let mut rolled = PoolRollCounts::default();

        let mut rolls = self.rolls.lock();
        for _ in 0..config.slots {
            let roll = rolls.slot_roll();
            roll_trace.push(roll);

            let pool = selector::select_pool(roll, logged_in, &config);
            rolled.record(pool);

            // Unfilled slot: no retry, move on
            if let Some(pick) = fallback::select_from(pool, &exclude, &pools, &mut **rolls) {
                exclude.insert(pick.item.id);
                posts.push(SlotResult {
                    item: pick.item.clone(),
                    pool: pick.pool,
                    roll,
                });
            }
        }
        drop(rolls);

        let stats = FeedStats {
            requested_slots: config.slots,
            filled_slots: posts.len(),
            rolls: roll_trace,
            rolled,
            logged_in,
            expected: config.expected_distribution(logged_in),
        };

        info!(
            logged_in,
            requested = stats.requested_slots,
            filled = stats.filled_slots,
            random_rolls = stats.rolled.random,
            trending_rolls = stats.rolled.trending,
            personalized_rolls = stats.rolled.personalized,
            "Feed generation complete"
        );

        Ok(FeedPage { posts, stats })
    }
}
