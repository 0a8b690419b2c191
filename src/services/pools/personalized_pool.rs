use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::config::PoolTuning;
use crate::models::{FeedItem, PoolName, ScoredItem};
use crate::providers::{PersonalizationSource, ViewerProfile};
use crate::utils::cosine_similarity;

use super::CandidatePool;

/// Personalized pool, logged-in viewers only.
///
/// The base feed comes from the personalization backend; each candidate's
/// base score is shaped by the viewer-author relationship, embedding
/// relevance, and geographic proximity. Muted and blocked authors are
/// filtered before any scoring happens.
pub struct PersonalizedPool {
    source: Arc<dyn PersonalizationSource>,
    tuning: PoolTuning,
}

impl PersonalizedPool {
    pub fn new(source: Arc<dyn PersonalizationSource>, tuning: PoolTuning) -> Self {
        Self { source, tuning }
    }

    fn geo_boost(&self, viewer: &ViewerProfile, item: &FeedItem) -> f64 {
        let (Some(viewer_cell), Some(item_cell)) = (&viewer.cell_id, &item.cell_id) else {
            return 1.0;
        };

        if viewer_cell == item_cell {
            self.tuning.geo_boost_same_cell
        } else if viewer.nearby_cells.contains(item_cell) {
            self.tuning.geo_boost_nearby_cell
        } else {
            1.0
        }
    }
}

/// Embedding overlap between viewer and post, zero when either side has no
/// embedding. Negative similarity clamps to zero so the multiplier never
/// drops below 1.0.
fn content_relevance(viewer: &ViewerProfile, item: &FeedItem) -> f64 {
    match (&viewer.embedding, &item.embedding) {
        (Some(viewer_embedding), Some(item_embedding)) => {
            cosine_similarity(viewer_embedding, item_embedding).max(0.0)
        }
        _ => 0.0,
    }
}

#[async_trait]
impl CandidatePool for PersonalizedPool {
    async fn fetch(&self, viewer: Option<Uuid>) -> Vec<ScoredItem> {
        // No personalized pool on the logged-out path
        let Some(user_id) = viewer else {
            return Vec::new();
        };

        let feed = match self.source.base_feed(user_id).await {
            Ok(feed) => feed,
            Err(e) => {
                warn!(pool = PoolName::Personalized.as_str(), user_id = %user_id, error = %e, "Personalization retrieval failed, pool degrades to empty");
                return Vec::new();
            }
        };

        let profile = feed.viewer;
        feed.candidates
            .into_iter()
            .filter(|candidate| {
                !profile.muted_authors.contains(&candidate.item.author_id)
                    && !profile.blocked_authors.contains(&candidate.item.author_id)
            })
            .map(|candidate| {
                let relevance = content_relevance(&profile, &candidate.item);
                let geo = self.geo_boost(&profile, &candidate.item);
                let score =
                    candidate.base_score * candidate.relationship.weight() * (1.0 + relevance) * geo;
                ScoredItem::new(candidate.item, PoolName::Personalized, score)
            })
            .collect()
    }

    fn pool(&self) -> PoolName {
        PoolName::Personalized
    }
}
