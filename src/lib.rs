pub mod config;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

pub use config::{FeedGenerationConfig, PoolTuning};
pub use models::{FeedItem, FeedPage, FeedStats, PoolName, ScoredItem, SlotResult};
pub use services::{CandidatePool, FeedError, SlotFeedComposer};
