use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post as the ranking core sees it: a read-only snapshot fetched once per
/// feed-generation call. The core never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub comment_count: u32,
    pub share_count: u32,
    /// Dense content representation from the embedding pipeline, if computed.
    pub embedding: Option<Vec<f32>>,
    /// Geographic cell the post was published from, if geotagged.
    pub cell_id: Option<String>,
    pub tags: Vec<String>,
}

/// The three candidate sources a slot can draw from. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolName {
    Random,
    Trending,
    Personalized,
}

impl PoolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolName::Random => "random",
            PoolName::Trending => "trending",
            PoolName::Personalized => "personalized",
        }
    }
}

/// A candidate annotated with the pool that produced it and that pool's score.
///
/// Scores are clamped to zero at construction; the sampling-weight floor is
/// applied later, in the sampler.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem {
    pub item: FeedItem,
    pub pool: PoolName,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item: FeedItem, pool: PoolName, score: f64) -> Self {
        Self {
            item,
            pool,
            score: score.max(0.0),
        }
    }
}

/// One emitted feed entry. `pool` is the pool that actually satisfied the
/// slot, which may differ from the rolled pool after fallback.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResult {
    pub item: FeedItem,
    pub pool: PoolName,
    pub roll: u8,
}

/// Output of one feed-generation call: filled slots in slot order plus
/// diagnostics for logging and telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub posts: Vec<SlotResult>,
    pub stats: FeedStats,
}

/// Diagnostic block attached to every generated feed. Counts track where
/// *rolls* landed, not which pool ultimately filled each slot.
#[derive(Debug, Clone, Serialize)]
pub struct FeedStats {
    pub requested_slots: usize,
    pub filled_slots: usize,
    pub rolls: Vec<u8>,
    pub rolled: PoolRollCounts,
    pub logged_in: bool,
    pub expected: ExpectedDistribution,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PoolRollCounts {
    pub random: usize,
    pub trending: usize,
    pub personalized: usize,
}

impl PoolRollCounts {
    pub fn record(&mut self, pool: PoolName) {
        match pool {
            PoolName::Random => self.random += 1,
            PoolName::Trending => self.trending += 1,
            PoolName::Personalized => self.personalized += 1,
        }
    }
}

/// Theoretical pool distribution implied by the active thresholds.
/// Fallback and pool exhaustion shift the realized distribution away from
/// these figures; that variance is accepted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExpectedDistribution {
    pub random_pct: f64,
    pub trending_pct: f64,
    pub personalized_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> FeedItem {
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
        }
    }

    #[test]
    fn test_pool_name_as_str() {
        assert_eq!(PoolName::Random.as_str(), "random");
        assert_eq!(PoolName::Trending.as_str(), "trending");
        assert_eq!(PoolName::Personalized.as_str(), "personalized");
    }

    #[test]
    fn test_scored_item_clamps_negative_scores() {
        let scored = ScoredItem::new(item(), PoolName::Trending, -3.5);
        assert_eq!(scored.score, 0.0);

        let scored = ScoredItem::new(item(), PoolName::Trending, 2.5);
        assert_eq!(scored.score, 2.5);
    }

    #[test]
    fn test_roll_counts_record() {
        let mut counts = PoolRollCounts::default();
        counts.record(PoolName::Random);
        counts.record(PoolName::Trending);
        counts.record(PoolName::Trending);
        counts.record(PoolName::Personalized);

        assert_eq!(counts.random, 1);
        assert_eq!(counts.trending, 2);
        assert_eq!(counts.personalized, 1);
    }
}
