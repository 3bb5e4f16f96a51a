//! Q-learning configuration and hyperparameters
//!
//! This module defines the configuration parameters for tabular Q-learning
//! and provides validation and builder pattern methods.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Q-learning configuration parameters
///
/// Defaults are tuned for the 20-cell chain: a long random-exploration phase
/// is needed before the end of the chain is ever reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size for table updates
    pub learning_rate: f64,

    /// Discount factor (gamma)
    pub gamma: f64,

    /// Exploration rate at the start of training
    pub epsilon_start: f64,

    /// Exploration rate after annealing
    pub epsilon_end: f64,

    /// Environment steps over which epsilon is annealed linearly
    pub epsilon_decay_steps: usize,

    /// Number of parallel environments
    pub num_envs: usize,

    /// Seed for action selection
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            epsilon_decay_steps: 50_000,
            num_envs: 4,
            seed: 0,
        }
    }
}

impl QLearningConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file, filling missing fields with defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read training config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json).context("invalid training config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(anyhow!("learning_rate must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(anyhow!("gamma must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(anyhow!("epsilon_start must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.epsilon_end) {
            return Err(anyhow!("epsilon_end must be in [0, 1]"));
        }
        if self.epsilon_end > self.epsilon_start {
            return Err(anyhow!("epsilon_end must not exceed epsilon_start"));
        }
        if self.num_envs == 0 {
            return Err(anyhow!("num_envs must be positive"));
        }
        Ok(())
    }

    /// Exploration rate after `steps` environment steps
    pub fn epsilon_at(&self, steps: usize) -> f64 {
        if self.epsilon_decay_steps == 0 {
            return self.epsilon_end;
        }
        let progress = (steps as f64 / self.epsilon_decay_steps as f64).min(1.0);
        self.epsilon_start + progress * (self.epsilon_end - self.epsilon_start)
    }

    /// Set learning rate
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set discount factor
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set initial exploration rate
    pub fn epsilon_start(mut self, epsilon: f64) -> Self {
        self.epsilon_start = epsilon;
        self
    }

    /// Set final exploration rate
    pub fn epsilon_end(mut self, epsilon: f64) -> Self {
        self.epsilon_end = epsilon;
        self
    }

    /// Set annealing length
    pub fn epsilon_decay_steps(mut self, steps: usize) -> Self {
        self.epsilon_decay_steps = steps;
        self
    }

    /// Set number of parallel environments
    pub fn num_envs(mut self, num_envs: usize) -> Self {
        self.num_envs = num_envs;
        self
    }

    /// Set RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QLearningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.gamma, 0.99);
        assert_eq!(config.num_envs, 4);
    }

    #[test]
    fn test_config_validation() {
        assert!(QLearningConfig::new().learning_rate(0.0).validate().is_err());
        assert!(QLearningConfig::new().learning_rate(1.5).validate().is_err());
        assert!(QLearningConfig::new().learning_rate(1.0).validate().is_ok());
        assert!(QLearningConfig::new().gamma(1.5).validate().is_err());
        assert!(QLearningConfig::new().gamma(0.0).validate().is_ok());
        assert!(QLearningConfig::new().epsilon_start(1.2).validate().is_err());
        assert!(QLearningConfig::new().epsilon_start(0.1).epsilon_end(0.5).validate().is_err());
        assert!(QLearningConfig::new().num_envs(0).validate().is_err());
    }

    #[test]
    fn test_epsilon_schedule() {
        let config = QLearningConfig::new()
            .epsilon_start(1.0)
            .epsilon_end(0.0)
            .epsilon_decay_steps(100);

        assert_eq!(config.epsilon_at(0), 1.0);
        assert!((config.epsilon_at(50) - 0.5).abs() < 1e-12);
        assert_eq!(config.epsilon_at(100), 0.0);
        assert_eq!(config.epsilon_at(10_000), 0.0);

        let instant = config.epsilon_decay_steps(0);
        assert_eq!(instant.epsilon_at(0), 0.0);
    }

    #[test]
    fn test_config_builder() {
        let config = QLearningConfig::new().learning_rate(0.5).gamma(0.9).num_envs(8).seed(3);

        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.num_envs, 8);
        assert_eq!(config.seed, 3);

        // Other values should remain default
        assert_eq!(config.epsilon_start, 1.0);
        assert_eq!(config.epsilon_decay_steps, 50_000);
    }

    #[test]
    fn test_config_from_json_file() {
        let path = std::env::temp_dir().join("chain_rl_test_q_config.json");
        std::fs::write(&path, r#"{"gamma": 0.9, "num_envs": 2}"#).unwrap();

        let config = QLearningConfig::from_json_file(&path).unwrap();
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.num_envs, 2);
        assert_eq!(config.learning_rate, 0.1);

        std::fs::write(&path, r#"{"num_envs": 0}"#).unwrap();
        assert!(QLearningConfig::from_json_file(&path).is_err());

        std::fs::remove_file(&path).ok();
    }
}
