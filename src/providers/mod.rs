//! Collaborator interfaces the ranking core consumes.
//!
//! Everything behind these traits is external to the core: post storage,
//! reputation bookkeeping, the personalization backend. They are injected at
//! construction so the composer can be exercised with deterministic fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::models::FeedItem;

/// Supplies the recent-post universe shared by the random and trending pools.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Publicly visible posts created after `since`, at most `limit`.
    async fn recent_public_posts(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<FeedItem>>;
}

/// Author-standing lookup. Callers tolerate failure by falling back to a
/// neutral multiplier.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReputationProvider: Send + Sync {
    async fn reputation(&self, author_id: Uuid) -> Result<ReputationScore>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReputationScore {
    pub current: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct EngagementCounts {
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
}

impl EngagementCounts {
    pub fn of(item: &FeedItem) -> Self {
        Self {
            likes: item.like_count,
            comments: item.comment_count,
            shares: item.share_count,
        }
    }
}

/// Engagement aggregate used by the trending pool. Pure computation, so the
/// trait is synchronous.
pub trait EngagementScorer: Send + Sync {
    fn score(&self, counts: &EngagementCounts, created_at: DateTime<Utc>) -> f64;
}

/// Default engagement aggregate: logarithmic so viral posts don't drown the
/// rest of the pool. Comments and shares count for more than likes.
#[derive(Debug, Clone, Copy)]
pub struct EngagementWeights {
    pub comment_weight: f64,
    pub share_weight: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            comment_weight: 2.0,
            share_weight: 3.0,
        }
    }
}

impl EngagementScorer for EngagementWeights {
    fn score(&self, counts: &EngagementCounts, _created_at: DateTime<Utc>) -> f64 {
        let combined = f64::from(counts.likes)
            + f64::from(counts.comments) * self.comment_weight
            + f64::from(counts.shares) * self.share_weight;

        // Minimum of 1.0 when there is no engagement at all
        1.0 + (1.0 + combined).ln()
    }
}

/// Personalization backend: vector-similarity + social-graph base feed.
/// Implementations must tolerate failure; the pool converts any error into
/// an empty candidate list.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PersonalizationSource: Send + Sync {
    async fn base_feed(&self, user_id: Uuid) -> Result<PersonalizedFeed>;
}

#[derive(Debug, Clone, Default)]
pub struct PersonalizedFeed {
    pub viewer: ViewerProfile,
    pub candidates: Vec<PersonalizedCandidate>,
}

/// Everything about the requesting viewer the personalized pool scores
/// against. Nearby cells are precomputed by the geo layer; the core treats
/// cell identifiers as opaque.
#[derive(Debug, Clone, Default)]
pub struct ViewerProfile {
    pub embedding: Option<Vec<f32>>,
    pub cell_id: Option<String>,
    pub nearby_cells: HashSet<String>,
    pub muted_authors: HashSet<Uuid>,
    pub blocked_authors: HashSet<Uuid>,
}

#[derive(Debug, Clone)]
pub struct PersonalizedCandidate {
    pub item: FeedItem,
    pub base_score: f64,
    pub relationship: Relationship,
}

/// Viewer-author relationship, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Subscription,
    Friend,
    Follow,
    None,
}

impl Relationship {
    /// Strictly descending weights: subscription > friend > follow > none.
    pub fn weight(&self) -> f64 {
        match self {
            Relationship::Subscription => 2.0,
            Relationship::Friend => 1.6,
            Relationship::Follow => 1.3,
            Relationship::None => 1.0,
        }
    }
}
