//! Scored candidate pools.
//!
//! Each pool retrieves its candidate universe from an injected provider and
//! attaches a pool-specific score. A pool that cannot reach its upstream
//! degrades to an empty list (logged, never propagated); slots rolled into it
//! then lean on the fallback chain.

mod personalized_pool;
mod random_pool;
mod trending_pool;

pub use personalized_pool::PersonalizedPool;
pub use random_pool::RandomPool;
pub use trending_pool::TrendingPool;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::models::{PoolName, ScoredItem};
use crate::providers::ReputationProvider;
use crate::utils::reputation_multiplier;

/// One of the three candidate sources a slot can draw from.
#[async_trait]
pub trait CandidatePool: Send + Sync {
    /// Fetch and score this pool's candidates for one feed-generation call.
    /// Infallible by contract: retrieval or scoring failure yields an empty
    /// list.
    async fn fetch(&self, viewer: Option<Uuid>) -> Vec<ScoredItem>;

    fn pool(&self) -> PoolName;
}

/// Banded author-standing multiplier with per-item failure tolerance: a
/// failed lookup defaults to neutral 1.0 and scoring continues.
pub(crate) async fn author_multiplier(
    reputation: &dyn ReputationProvider,
    author_id: Uuid,
) -> f64 {
    match reputation.reputation(author_id).await {
        Ok(score) => reputation_multiplier(score.current),
        Err(e) => {
            debug!(author_id = %author_id, error = %e, "Reputation lookup failed, using neutral multiplier");
            1.0
        }
    }
}
