//! Q-learning trainer implementation
//!
//! Collects experience from a parallel [`EnvPool`] with an epsilon-greedy
//! behaviour policy and applies one-step Q-learning updates to a
//! [`TabularPolicy`].

use anyhow::{anyhow, bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{
    config::QLearningConfig,
    stats::{AggregatedStats, TrainingStats},
};
use crate::{
    env::{pool::EnvPool, Environment},
    policy::TabularPolicy,
};

/// Tabular Q-learning trainer
///
/// Environments finishing an episode are reset in place, so consecutive
/// iterations continue the same episodes.
pub struct QLearningTrainer<E: Environment> {
    config: QLearningConfig,
    pool: EnvPool<E>,
    policy: TabularPolicy,
    rng: StdRng,
    observations: Vec<usize>,
    episode_returns: Vec<f64>,
    total_steps: usize,
    total_episodes: usize,
}

impl<E> QLearningTrainer<E>
where
    E: Environment<Observation = usize, Action = i64> + Send,
{
    /// Create a new trainer
    ///
    /// # Arguments
    ///
    /// * `config` - Q-learning configuration parameters
    /// * `env_fn` - Factory for the `config.num_envs` environments
    pub fn new<F>(config: QLearningConfig, env_fn: F) -> Result<Self>
    where
        F: Fn() -> E,
    {
        config.validate()?;

        let mut pool = EnvPool::new(env_fn, config.num_envs);
        let num_states = pool
            .observation_space()
            .n()
            .ok_or_else(|| anyhow!("Q-learning requires a discrete observation space"))?;
        let num_actions = pool
            .action_space()
            .n()
            .ok_or_else(|| anyhow!("Q-learning requires a discrete action space"))?;
        if num_actions == 0 {
            bail!("action space is empty");
        }

        let observations = pool
            .reset()?
            .into_iter()
            .map(|obs| check_state(obs, num_states))
            .collect::<Result<Vec<_>>>()?;
        let episode_returns = vec![0.0; config.num_envs];
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            pool,
            policy: TabularPolicy::zeros(num_states, num_actions),
            rng,
            observations,
            episode_returns,
            total_steps: 0,
            total_episodes: 0,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Get reference to the learned policy
    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    /// Consume the trainer, returning the learned policy
    pub fn into_policy(self) -> TabularPolicy {
        self.policy
    }

    /// Get total environment steps (summed over envs)
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get total episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon_at(self.total_steps)
    }

    fn select_action(&mut self, state: usize, epsilon: f64) -> i64 {
        if self.rng.gen::<f64>() < epsilon {
            self.rng.gen_range(0..self.policy.num_actions) as i64
        } else {
            self.policy.greedy_action(state) as i64
        }
    }

    /// Run `steps_per_env` steps in every environment, updating the table
    /// after each one
    pub fn train_iteration(&mut self, steps_per_env: usize) -> Result<TrainingStats> {
        let lr = self.config.learning_rate as f32;
        let gamma = self.config.gamma as f32;
        let num_states = self.policy.num_states;
        let mut stats = TrainingStats::zeros();

        for _ in 0..steps_per_env {
            let epsilon = self.epsilon();
            let mut actions = Vec::with_capacity(self.observations.len());
            for env_id in 0..self.observations.len() {
                let state = self.observations[env_id];
                actions.push(self.select_action(state, epsilon));
            }

            let results = self.pool.step(&actions)?;

            for (env_id, result) in results.into_iter().enumerate() {
                let state = self.observations[env_id];
                let action = actions[env_id] as usize;
                let next_state = check_state(result.observation, num_states)?;

                let bootstrap =
                    if result.terminated { 0.0 } else { gamma * self.policy.state_value(next_state) };
                let current = self.policy.value(state, action);
                let td_error = result.reward + bootstrap - current;
                self.policy.set_value(state, action, current + lr * td_error);

                stats.total_td_error += td_error.abs() as f64;
                self.episode_returns[env_id] += result.reward as f64;

                if result.is_done() {
                    stats.episodes += 1;
                    stats.total_return += self.episode_returns[env_id];
                    self.episode_returns[env_id] = 0.0;
                    self.observations[env_id] =
                        check_state(self.pool.reset_env(env_id)?, num_states)?;
                } else {
                    self.observations[env_id] = next_state;
                }
            }

            stats.steps += actions.len();
            self.total_steps += actions.len();
        }

        self.total_episodes += stats.episodes;
        stats.epsilon = self.epsilon();
        Ok(stats)
    }

    /// Run `iterations` training iterations, logging each one
    pub fn train(&mut self, iterations: usize, steps_per_env: usize) -> Result<AggregatedStats> {
        let mut aggregated = AggregatedStats::new();

        for iteration in 0..iterations {
            let stats = self.train_iteration(steps_per_env)?;
            tracing::info!(
                "Iteration {} | Episodes: {} | Mean return: {:.2} | TD error: {:.4} | Epsilon: {:.3}",
                iteration,
                stats.episodes,
                stats.mean_return(),
                stats.mean_td_error(),
                stats.epsilon,
            );
            aggregated.update(stats);
        }

        Ok(aggregated)
    }
}

fn check_state(obs: usize, num_states: usize) -> Result<usize> {
    if obs >= num_states {
        bail!("observation {obs} outside state space of size {num_states}");
    }
    Ok(obs)
}
