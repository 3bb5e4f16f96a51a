//! Training algorithms
//!
//! This module implements RL training algorithms like tabular Q-learning.

pub mod q_learning;

pub use q_learning::{AggregatedStats, QLearningConfig, QLearningTrainer, TrainingStats};
