pub mod composer;
pub mod fallback;
pub mod pools;
pub mod rolls;
pub mod sampler;
pub mod selector;

pub use composer::SlotFeedComposer;
pub use fallback::CandidatePools;
pub use pools::{CandidatePool, PersonalizedPool, RandomPool, TrendingPool};
pub use rolls::{RollSource, SeededRolls, ThreadRngRolls};

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, FeedError>;
