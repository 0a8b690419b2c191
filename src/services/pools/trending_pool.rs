use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::config::PoolTuning;
use crate::models::{PoolName, ScoredItem};
use crate::providers::{EngagementCounts, EngagementScorer, PostSource, ReputationProvider};
use crate::utils::daily_decay;

use super::{author_multiplier, CandidatePool};

/// Engagement pool: the same recent-post universe as the random pool, scored
/// by the injected engagement aggregate times time decay and author standing.
pub struct TrendingPool {
    posts: Arc<dyn PostSource>,
    reputation: Arc<dyn ReputationProvider>,
    engagement: Arc<dyn EngagementScorer>,
    tuning: PoolTuning,
}

impl TrendingPool {
    pub fn new(
        posts: Arc<dyn PostSource>,
        reputation: Arc<dyn ReputationProvider>,
        engagement: Arc<dyn EngagementScorer>,
        tuning: PoolTuning,
    ) -> Self {
        Self {
            posts,
            reputation,
            engagement,
            tuning,
        }
    }
}

#[async_trait]
impl CandidatePool for TrendingPool {
    async fn fetch(&self, _viewer: Option<Uuid>) -> Vec<ScoredItem> {
        let since = Utc::now() - Duration::days(self.tuning.lookback_days);
        let items = match self
            .posts
            .recent_public_posts(since, self.tuning.candidate_limit)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(pool = PoolName::Trending.as_str(), error = %e, "Candidate retrieval failed, pool degrades to empty");
                return Vec::new();
            }
        };

        let now = Utc::now();
        let mut scored = Vec::with_capacity(items.len());
        for item in items {
            let multiplier = author_multiplier(self.reputation.as_ref(), item.author_id).await;
            let engagement = self
                .engagement
                .score(&EngagementCounts::of(&item), item.created_at);
            let age_days = (now - item.created_at).num_days();
            let score = engagement * daily_decay(age_days, self.tuning.decay_per_day) * multiplier;
            scored.push(ScoredItem::new(item, PoolName::Trending, score));
        }
        scored
    }

    fn pool(&self) -> PoolName {
        PoolName::Trending
    }
}
