//! Vectorized environment pool for parallel execution
//!
//! This module provides parallel environment execution using Rayon. Every
//! environment in the pool is stepped on the Rayon thread pool, which replaces
//! spawning one OS process per environment worker.
//!
//! # Example
//!
//! ```rust
//! use chain_rl::env::{chain::ChainEnv, pool::EnvPool};
//!
//! // Create pool with 4 parallel environments
//! let mut pool = EnvPool::new(ChainEnv::default, 4);
//!
//! // Reset all environments in parallel
//! let observations = pool.reset().unwrap();
//! assert_eq!(observations, vec![0, 0, 0, 0]);
//!
//! // Step all environments in parallel
//! let actions = vec![0, 1, 0, 1]; // One action per environment
//! let results = pool.step(&actions).unwrap();
//! assert_eq!(results[0].observation, 1);
//! ```

use anyhow::{bail, Result};
use rayon::prelude::*;

use crate::env::{Environment, SpaceInfo, StepResult};

/// A pool of environments for parallel execution
///
/// For N environments with average step time T, a sequential loop costs
/// O(N * T) while the pool costs roughly O(T) when N does not exceed the
/// number of cores.
pub struct EnvPool<E: Environment> {
    /// Vector of environment instances
    envs: Vec<E>,

    /// Number of environments
    num_envs: usize,
}

impl<E> EnvPool<E>
where
    E: Environment + Send,
    E::Observation: Send,
    E::Action: Copy + Send + Sync,
{
    /// Create a new environment pool
    ///
    /// # Arguments
    ///
    /// * `env_fn` - Factory function to create environment instances
    /// * `num_envs` - Number of parallel environments
    ///
    /// An empty pool can be built, but its space queries panic. Use
    /// [`EnvPool::try_new`] to reject `num_envs == 0` up front.
    pub fn new<F>(env_fn: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        let envs = (0..num_envs).map(|_| env_fn()).collect();
        Self { envs, num_envs }
    }

    /// Build a pool from a fallible factory, such as [`ChainEnv::new`]
    ///
    /// Fails if `num_envs` is zero or any environment fails to build.
    ///
    /// [`ChainEnv::new`]: crate::env::chain::ChainEnv::new
    pub fn try_new<F>(env_fn: F, num_envs: usize) -> Result<Self>
    where
        F: Fn() -> Result<E>,
    {
        if num_envs == 0 {
            bail!("EnvPool needs at least one environment");
        }
        let envs = (0..num_envs).map(|_| env_fn()).collect::<Result<Vec<_>>>()?;
        Ok(Self { envs, num_envs })
    }

    /// Reset all environments in parallel
    ///
    /// Returns a vector of initial observations, one per environment.
    pub fn reset(&mut self) -> Result<Vec<E::Observation>> {
        self.envs.par_iter_mut().map(|env| env.reset()).collect()
    }

    /// Step all environments in parallel with given actions
    ///
    /// # Panics
    ///
    /// Panics if the number of actions doesn't match the number of
    /// environments.
    pub fn step(&mut self, actions: &[E::Action]) -> Result<Vec<StepResult<E::Observation>>> {
        assert_eq!(
            actions.len(),
            self.num_envs,
            "Number of actions must match number of environments"
        );

        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, &action)| env.step(action))
            .collect()
    }

    /// Get the number of environments in the pool
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Get observation space information from first environment
    ///
    /// # Panics
    ///
    /// Panics if the pool is empty.
    pub fn observation_space(&self) -> SpaceInfo {
        self.envs[0].observation_space()
    }

    /// Get action space information from first environment
    ///
    /// # Panics
    ///
    /// Panics if the pool is empty.
    pub fn action_space(&self) -> SpaceInfo {
        self.envs[0].action_space()
    }

    /// Reset a specific environment by index
    ///
    /// # Returns
    ///
    /// Initial observation from the reset environment
    pub fn reset_env(&mut self, env_id: usize) -> Result<E::Observation> {
        tracing::debug!(env_id, "resetting environment");
        self.envs[env_id].reset()
    }

    /// Borrow a single environment
    pub fn env(&self, env_id: usize) -> &E {
        &self.envs[env_id]
    }
}

/// Result of stepping an environment pool
///
/// Contains observations, rewards, and done flags for all environments.
#[derive(Debug, Clone)]
pub struct PoolStepResult<O> {
    /// Observations for each environment
    pub observations: Vec<O>,

    /// Rewards for each environment
    pub rewards: Vec<f32>,

    /// Termination flags for each environment
    pub terminated: Vec<bool>,

    /// Truncation flags for each environment
    pub truncated: Vec<bool>,
}

impl<E> EnvPool<E>
where
    E: Environment + Send,
    E::Observation: Send,
    E::Action: Copy + Send + Sync,
{
    /// Step all environments and return structured result
    ///
    /// Unpacks individual StepResults into a single PoolStepResult with
    /// parallel vectors.
    pub fn step_structured(&mut self, actions: &[E::Action]) -> Result<PoolStepResult<E::Observation>> {
        let results = self.step(actions)?;

        let mut observations = Vec::with_capacity(self.num_envs);
        let mut rewards = Vec::with_capacity(self.num_envs);
        let mut terminated = Vec::with_capacity(self.num_envs);
        let mut truncated = Vec::with_capacity(self.num_envs);

        for result in results {
            observations.push(result.observation);
            rewards.push(result.reward);
            terminated.push(result.terminated);
            truncated.push(result.truncated);
        }

        Ok(PoolStepResult { observations, rewards, terminated, truncated })
    }
}
