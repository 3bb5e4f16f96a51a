//! Environment traits and implementations
//!
//! This module defines the core environment interface and provides
//! the built-in chain environment, reward-shaping wrappers and a
//! parallel environment pool.

use anyhow::Result;

/// Core trait for RL environments
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Reset the environment and return initial observation
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Step the environment with an action
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Get the observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions
    fn action_space(&self) -> SpaceInfo;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    /// Next observation
    pub observation: O,

    /// Reward received
    pub reward: f32,

    /// Whether the episode terminated
    pub terminated: bool,

    /// Whether the episode was truncated
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

impl<O> StepResult<O> {
    /// Whether the episode ended, by termination or truncation
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Space information for observations and actions
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

impl SpaceInfo {
    /// Scalar discrete space with `n` options
    pub fn discrete(n: usize) -> Self {
        Self { shape: vec![], dtype: SpaceType::Discrete(n) }
    }

    /// Number of options if this is a discrete space
    pub fn n(&self) -> Option<usize> {
        match self.dtype {
            SpaceType::Discrete(n) => Some(n),
            _ => None,
        }
    }

    /// Sample-space membership check for discrete values
    ///
    /// Always false for non-discrete spaces.
    pub fn contains_discrete(&self, value: i64) -> bool {
        match self.n() {
            Some(n) => value >= 0 && (value as u64) < n as u64,
            None => false,
        }
    }
}

/// Space data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,

    /// Multi-discrete space
    MultiDiscrete,
}

/// Additional step information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInfo {}

pub mod chain;
pub mod pool;
pub mod wrappers;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_contains() {
        let space = SpaceInfo::discrete(2);
        assert!(space.contains_discrete(0));
        assert!(space.contains_discrete(1));
        assert!(!space.contains_discrete(2));
        assert!(!space.contains_discrete(-1));
        assert_eq!(space.n(), Some(2));
    }

    #[test]
    fn test_continuous_contains_nothing() {
        let space = SpaceInfo { shape: vec![4], dtype: SpaceType::Continuous };
        assert!(!space.contains_discrete(0));
        assert_eq!(space.n(), None);
    }

    #[test]
    fn test_step_result_done() {
        let mut result = StepResult {
            observation: 0usize,
            reward: 0.0,
            terminated: false,
            truncated: false,
            info: StepInfo::default(),
        };
        assert!(!result.is_done());
        result.truncated = true;
        assert!(result.is_done());
    }
}
