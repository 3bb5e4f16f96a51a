//! Tabular action-value policy
//!
//! Stores one value per (state, action) pair and acts greedily. The table is
//! the whole model, so the JSON export is the deployable artefact.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::Policy;

/// Greedy policy over a Q-table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularPolicy {
    /// Number of discrete states
    pub num_states: usize,
    /// Number of discrete actions
    pub num_actions: usize,
    /// Action values, `[num_states][num_actions]`
    pub q_values: Vec<Vec<f32>>,
}

impl TabularPolicy {
    /// All-zero table
    pub fn zeros(num_states: usize, num_actions: usize) -> Self {
        Self { num_states, num_actions, q_values: vec![vec![0.0; num_actions]; num_states] }
    }

    /// Value of taking `action` in `state`
    pub fn value(&self, state: usize, action: usize) -> f32 {
        self.q_values[state][action]
    }

    /// Overwrite one table entry
    pub fn set_value(&mut self, state: usize, action: usize, value: f32) {
        self.q_values[state][action] = value;
    }

    /// Highest-valued action; ties go to the lowest index
    pub fn greedy_action(&self, state: usize) -> usize {
        let row = &self.q_values[state];
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        best
    }

    /// Value of the greedy action
    pub fn state_value(&self, state: usize) -> f32 {
        self.q_values[state].iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Check that the table matches its declared dimensions
    pub fn validate(&self) -> Result<()> {
        if self.num_actions == 0 {
            bail!("policy must have at least one action");
        }
        if self.q_values.len() != self.num_states {
            bail!("expected {} state rows, found {}", self.num_states, self.q_values.len());
        }
        if let Some((state, row)) =
            self.q_values.iter().enumerate().find(|(_, row)| row.len() != self.num_actions)
        {
            bail!("state {} has {} action values, expected {}", state, row.len(), self.num_actions);
        }
        Ok(())
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json).context("invalid policy JSON")?;
        policy.validate()?;
        Ok(policy)
    }

    /// Save policy to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write policy to {}", path.display()))?;
        Ok(())
    }

    /// Load policy from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy from {}", path.display()))?;
        Self::from_json(&json)
    }
}

impl Policy<usize> for TabularPolicy {
    fn compute_action(&self, obs: &usize) -> i64 {
        self.greedy_action(*obs) as i64
    }
}
