use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ExpectedDistribution;

pub const DEFAULT_SLOTS: usize = 15;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("slots must be at least 1")]
    ZeroSlots,

    #[error("logged-in random threshold {random} exceeds trending threshold {trending}")]
    InvertedThresholds { random: u8, trending: u8 },
}

/// Per-call feed configuration. Callers may supply a partial object; missing
/// fields take the defaults below (`#[serde(default)]` merges at decode time,
/// `Default` covers in-process construction).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedGenerationConfig {
    /// Total slot count for the requested page.
    pub slots: usize,
    pub logged_in_thresholds: LoggedInThresholds,
    pub logged_out_thresholds: LoggedOutThresholds,
    /// Items to treat as already selected, for pagination / infinite scroll.
    pub exclude_ids: HashSet<Uuid>,
}

/// Roll thresholds for logged-in viewers, upper-bound exclusive: a roll below
/// `random` lands in the random pool, below `trending` in the trending pool,
/// anything else in the personalized pool.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoggedInThresholds {
    pub random: u8,
    pub trending: u8,
}

/// Roll threshold for logged-out viewers. Everything at or above `random`
/// lands in the trending pool; there is no personalized pool on this path.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoggedOutThresholds {
    pub random: u8,
}

impl Default for FeedGenerationConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            logged_in_thresholds: LoggedInThresholds::default(),
            logged_out_thresholds: LoggedOutThresholds::default(),
            exclude_ids: HashSet::new(),
        }
    }
}

impl Default for LoggedInThresholds {
    fn default() -> Self {
        Self {
            random: 10,
            trending: 20,
        }
    }
}

impl Default for LoggedOutThresholds {
    fn default() -> Self {
        Self { random: 30 }
    }
}

impl FeedGenerationConfig {
    /// Boundary validation: thresholds are clamped into [0, 100]; structural
    /// misuse (zero slots, inverted logged-in thresholds) is a caller bug and
    /// fails fast.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        if self.slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }

        self.logged_in_thresholds.random = self.logged_in_thresholds.random.min(100);
        self.logged_in_thresholds.trending = self.logged_in_thresholds.trending.min(100);
        self.logged_out_thresholds.random = self.logged_out_thresholds.random.min(100);

        if self.logged_in_thresholds.random > self.logged_in_thresholds.trending {
            return Err(ConfigError::InvertedThresholds {
                random: self.logged_in_thresholds.random,
                trending: self.logged_in_thresholds.trending,
            });
        }

        Ok(self)
    }

    /// Distribution the thresholds imply on paper, for the stats block.
    pub fn expected_distribution(&self, logged_in: bool) -> ExpectedDistribution {
        if logged_in {
            let random_pct = f64::from(self.logged_in_thresholds.random);
            let trending_pct =
                f64::from(self.logged_in_thresholds.trending.saturating_sub(self.logged_in_thresholds.random));
            ExpectedDistribution {
                random_pct,
                trending_pct,
                personalized_pct: 100.0 - random_pct - trending_pct,
            }
        } else {
            let random_pct = f64::from(self.logged_out_thresholds.random);
            ExpectedDistribution {
                random_pct,
                trending_pct: 100.0 - random_pct,
                personalized_pct: 0.0,
            }
        }
    }
}

/// Service-level tuning for the candidate pools, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolTuning {
    /// Lookback window for the recent-post universe, in days.
    pub lookback_days: i64,
    /// Cap on candidates fetched per pool.
    pub candidate_limit: usize,
    /// Time-decay factor applied once per elapsed day.
    pub decay_per_day: f64,
    /// Boost when the post's cell matches the viewer's.
    pub geo_boost_same_cell: f64,
    /// Boost when the post's cell is adjacent to the viewer's.
    pub geo_boost_nearby_cell: f64,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            candidate_limit: 200,
            decay_per_day: 0.9,
            geo_boost_same_cell: 1.5,
            geo_boost_nearby_cell: 1.2,
        }
    }
}

impl PoolTuning {
    pub fn from_env() -> Self {
        Self {
            lookback_days: env::var("FEED_LOOKBACK_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("FEED_LOOKBACK_DAYS must be a valid i64"),
            candidate_limit: env::var("FEED_CANDIDATE_LIMIT")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .expect("FEED_CANDIDATE_LIMIT must be a valid usize"),
            decay_per_day: env::var("FEED_DECAY_PER_DAY")
                .unwrap_or_else(|_| "0.9".to_string())
                .parse()
                .expect("FEED_DECAY_PER_DAY must be a valid f64"),
            geo_boost_same_cell: env::var("FEED_GEO_BOOST_SAME_CELL")
                .unwrap_or_else(|_| "1.5".to_string())
                .parse()
                .expect("FEED_GEO_BOOST_SAME_CELL must be a valid f64"),
            geo_boost_nearby_cell: env::var("FEED_GEO_BOOST_NEARBY_CELL")
                .unwrap_or_else(|_| "1.2".to_string())
                .parse()
                .expect("FEED_GEO_BOOST_NEARBY_CELL must be a valid f64"),
        }
    }
}
