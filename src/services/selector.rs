//! Maps a slot roll onto the pool it should draw from.

use crate::config::FeedGenerationConfig;
use crate::models::PoolName;

/// Pure threshold walk over the roll value. Thresholds are upper-bound
/// exclusive and clamped into [0, 100] defensively; logged-out viewers have
/// no personalized pool.
pub fn select_pool(roll: u8, logged_in: bool, config: &FeedGenerationConfig) -> PoolName {
    if logged_in {
        if roll < config.logged_in_thresholds.random.min(100) {
            PoolName::Random
        } else if roll < config.logged_in_thresholds.trending.min(100) {
            PoolName::Trending
        } else {
            PoolName::Personalized
        }
    } else if roll < config.logged_out_thresholds.random.min(100) {
        PoolName::Random
    } else {
        PoolName::Trending
    }
}
