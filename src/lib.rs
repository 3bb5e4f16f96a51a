//! # chain-rl
//!
//! Chain-walk environments and tabular reinforcement learning in Rust
//!
//! The chain environment is a line of `n` cells. Advancing is free until the
//! last cell, where every further advance pays a large reward; retreating to
//! the origin pays a small reward immediately. Around it the crate provides
//! reward shaping, a parallel environment pool, tabular Q-learning, policy
//! export for serving, and thread-based rollout workers.
//!
//! ## Quick Start
//!
//! ```rust
//! use chain_rl::prelude::*;
//!
//! let mut env = ChainEnv::default();
//! assert_eq!(env.reset().unwrap(), 0);
//!
//! let result = env.step(1).unwrap();
//! assert_eq!(result.observation, 0);
//! assert_eq!(result.reward, 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Policies and policy export
pub mod policy;

/// Training algorithms
pub mod train;

/// Parallel policy evaluation
pub mod rollout;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::env::{
        chain::{ChainConfig, ChainEnv, ACTION_ADVANCE, ACTION_RETREAT},
        pool::EnvPool,
        wrappers::{RewardScale, RewardShaping},
        Environment, SpaceInfo, SpaceType, StepResult,
    };
    pub use crate::policy::{Policy, RandomPolicy, TabularPolicy};
    pub use crate::rollout::{summarize, EpisodeSummary, RolloutSummary, RolloutWorkers};
    pub use crate::train::{QLearningConfig, QLearningTrainer};
}

/// Current version of chain-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
