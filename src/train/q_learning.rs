//! Tabular Q-learning
//!
//! This module implements one-step, off-policy Q-learning over discrete
//! state and action spaces.
//!
//! # Algorithm Overview
//!
//! ```text
//! For each step, in every environment of the pool:
//!   1. Pick a = random action with probability epsilon, else argmax Q(s, .)
//!   2. Observe r, s' and the termination flag
//!   3. Q(s, a) += lr * (r + gamma * (1 - terminated) * max Q(s', .) - Q(s, a))
//!   4. Anneal epsilon linearly towards its final value
//! ```
//!
//! # References
//!
//! - Watkins & Dayan, "Q-learning", Machine Learning 8 (1992)
//! - Sutton & Barto, Reinforcement Learning: An Introduction, section 6.5

pub mod config;
pub mod stats;
pub mod trainer;

pub use config::QLearningConfig;
pub use stats::{AggregatedStats, TrainingStats};
pub use trainer::QLearningTrainer;
