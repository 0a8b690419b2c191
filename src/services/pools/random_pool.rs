use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::config::PoolTuning;
use crate::models::{PoolName, ScoredItem};
use crate::providers::{PostSource, ReputationProvider};
use crate::utils::daily_decay;

use super::{author_multiplier, CandidatePool};

/// Serendipity pool: recent publicly-visible posts scored by freshness and
/// author standing alone.
///
/// Engagement deliberately does not enter this score, so low-traction posts
/// keep circulating instead of the feed collapsing onto whatever is already
/// hot.
pub struct RandomPool {
    posts: Arc<dyn PostSource>,
    reputation: Arc<dyn ReputationProvider>,
    tuning: PoolTuning,
}

impl RandomPool {
    pub fn new(
        posts: Arc<dyn PostSource>,
        reputation: Arc<dyn ReputationProvider>,
        tuning: PoolTuning,
    ) -> Self {
        Self {
            posts,
            reputation,
            tuning,
        }
    }
}

#[async_trait]
impl CandidatePool for RandomPool {
    async fn fetch(&self, _viewer: Option<Uuid>) -> Vec<ScoredItem> {
        let since = Utc::now() - Duration::days(self.tuning.lookback_days);
        let items = match self
            .posts
            .recent_public_posts(since, self.tuning.candidate_limit)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(pool = PoolName::Random.as_str(), error = %e, "Candidate retrieval failed, pool degrades to empty");
                return Vec::new();
            }
        };

        let now = Utc::now();
        let mut scored = Vec::with_capacity(items.len());
        for item in items {
            let multiplier = author_multiplier(self.reputation.as_ref(), item.author_id).await;
            let age_days = (now - item.created_at).num_days();
            let score = daily_decay(age_days, self.tuning.decay_per_day) * multiplier;
            scored.push(ScoredItem::new(item, PoolName::Random, score));
        }
        scored
    }

    fn pool(&self) -> PoolName {
        PoolName::Random
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedItem;
    use crate::providers::{MockPostSource, MockReputationProvider, ReputationScore};
    use anyhow::anyhow;

    fn post(age_days: i64, like_count: u32) -> FeedItem {
        FeedItem {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            created_at: Utc::now() - Duration::days(age_days),
            like_count,
            comment_count: 0,
            share_count: 0,
            embedding: None,
            cell_id: None,
            tags: vec![],
        }
    }

    fn neutral_reputation() -> MockReputationProvider {
        let mut reputation = MockReputationProvider::new();
        reputation
            .expect_reputation()
            .returning(|_| Ok(ReputationScore { current: 60.0 }));
        reputation
    }

    fn pool_with(posts: Vec<FeedItem>, reputation: MockReputationProvider) -> RandomPool {
        let mut source = MockPostSource::new();
        source
            .expect_recent_public_posts()
            .returning(move |_, _| Ok(posts.clone()));
        RandomPool::new(Arc::new(source), Arc::new(reputation), PoolTuning::default())
    }

    #[tokio::test]
    async fn test_newer_posts_score_higher() {
        let fresh = post(0, 0);
        let stale = post(10, 0);
        let fresh_id = fresh.id;

        let pool = pool_with(vec![fresh, stale], neutral_reputation());
        let scored = pool.fetch(None).await;

        assert_eq!(scored.len(), 2);
        let fresh_score = scored.iter().find(|s| s.item.id == fresh_id).unwrap().score;
        let stale_score = scored.iter().find(|s| s.item.id != fresh_id).unwrap().score;
        assert!(fresh_score > stale_score);
    }

    #[tokio::test]
    async fn test_engagement_does_not_enter_score() {
        let quiet = post(3, 0);
        let viral = post(3, 10_000);

        let pool = pool_with(vec![quiet, viral], neutral_reputation());
        let scored = pool.fetch(None).await;

        assert!((scored[0].score - scored[1].score).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reputation_bands_shift_scores() {
        let item = post(1, 0);
        let author_id = item.author_id;

        let mut reputation = MockReputationProvider::new();
        reputation
            .expect_reputation()
            .returning(move |id| {
                assert_eq!(id, author_id);
                Ok(ReputationScore { current: 95.0 })
            });

        let pool = pool_with(vec![item], reputation);
        let scored = pool.fetch(None).await;

        // decay(1 day, 0.9) * 1.1 boost
        assert!((scored[0].score - 0.9 * 1.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reputation_failure_neutral() {
        let item = post(1, 0);

        let mut reputation = MockReputationProvider::new();
        reputation
            .expect_reputation()
            .returning(|_| Err(anyhow!("timeout")));

        let pool = pool_with(vec![item], reputation);
        let scored = pool.fetch(None).await;

        assert_eq!(scored.len(), 1);
        assert!((scored[0].score - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades_to_empty() {
        let mut source = MockPostSource::new();
        source
            .expect_recent_public_posts()
            .returning(|_, _| Err(anyhow!("database unreachable")));

        let pool = RandomPool::new(
            Arc::new(source),
            Arc::new(neutral_reputation()),
            PoolTuning::default(),
        );

        assert!(pool.fetch(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_items_tagged_with_random_pool() {
        let pool = pool_with(vec![post(2, 5)], neutral_reputation());
        let scored = pool.fetch(None).await;

        assert!(scored.iter().all(|s| s.pool == PoolName::Random));
    }
}
