//! Chain environment
//!
//! A walk along a line of `n` cells:
//! - State: current cell index in `[0, n-1]`
//! - Actions: 0 (advance one cell) or 1 (retreat to the origin)
//! - Reward: `small_reward` for retreating, `large_reward` for advancing while
//!   already on the last cell, 0 otherwise
//! - Episodes: fixed horizon (defaults to `n` steps)
//!
//! Retreating pays immediately but little. The greedy agent keeps collecting
//! the small reward; an agent that plans ahead walks to the end of the chain
//! and collects the large reward on every remaining step.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::{Environment, SpaceInfo, StepInfo, StepResult};

/// Advance one cell towards the end of the chain
pub const ACTION_ADVANCE: i64 = 0;

/// Retreat to the start of the chain
pub const ACTION_RETREAT: i64 = 1;

/// Static configuration of a chain environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Number of cells in the chain
    pub n: usize,

    /// Reward for retreating to the origin
    pub small_reward: f32,

    /// Reward for advancing at the last cell
    pub large_reward: f32,

    /// Episode length; `None` means `n`
    pub horizon: Option<usize>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { n: 20, small_reward: 2.0, large_reward: 10.0, horizon: None }
    }
}

impl ChainConfig {
    /// Create a configuration whose horizon equals the chain length
    pub fn new(n: usize, small_reward: f32, large_reward: f32) -> Self {
        Self { n, small_reward, large_reward, horizon: None }
    }

    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid chain config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chain config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(anyhow!("n must be positive"));
        }
        if self.horizon == Some(0) {
            return Err(anyhow!("horizon must be positive"));
        }
        if !self.small_reward.is_finite() || !self.large_reward.is_finite() {
            return Err(anyhow!("rewards must be finite"));
        }
        Ok(())
    }

    /// Number of steps after which an episode terminates
    pub fn effective_horizon(&self) -> usize {
        self.horizon.unwrap_or(self.n)
    }

    /// Set chain length
    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Set retreat reward
    pub fn small_reward(mut self, reward: f32) -> Self {
        self.small_reward = reward;
        self
    }

    /// Set end-of-chain reward
    pub fn large_reward(mut self, reward: f32) -> Self {
        self.large_reward = reward;
        self
    }

    /// Set episode horizon
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }
}

/// Chain walk environment
#[derive(Debug, Clone)]
pub struct ChainEnv {
    config: ChainConfig,
    position: usize,
    steps: usize,
    horizon: usize,
}

impl ChainEnv {
    /// Create a chain environment from a validated configuration
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let horizon = config.effective_horizon();
        Ok(Self { config, position: 0, steps: 0, horizon })
    }

    /// Current cell index
    pub fn position(&self) -> usize {
        self.position
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Environment configuration
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn last_cell(&self) -> usize {
        self.config.n - 1
    }
}

impl Default for ChainEnv {
    fn default() -> Self {
        let config = ChainConfig::default();
        let horizon = config.effective_horizon();
        Self { config, position: 0, steps: 0, horizon }
    }
}

impl Environment for ChainEnv {
    type Observation = usize;
    type Action = i64;

    fn reset(&mut self) -> Result<Self::Observation> {
        self.position = 0;
        self.steps = 0;
        Ok(self.position)
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        if !self.action_space().contains_discrete(action) {
            bail!("invalid action {action}: expected {ACTION_ADVANCE} (advance) or {ACTION_RETREAT} (retreat)");
        }

        let reward = if action == ACTION_RETREAT {
            self.position = 0;
            self.config.small_reward
        } else if self.position < self.last_cell() {
            self.position += 1;
            0.0
        } else {
            self.config.large_reward
        };

        self.steps += 1;

        Ok(StepResult {
            observation: self.position,
            reward,
            terminated: self.steps >= self.horizon,
            truncated: false,
            info: StepInfo::default(),
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo::discrete(self.config.n)
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo::discrete(2)
    }
}
