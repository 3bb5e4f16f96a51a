//! Reward shaping wrappers
//!
//! Wrappers implement [`Environment`] themselves, so a shaped environment
//! can be dropped into an [`EnvPool`](super::pool::EnvPool) or a trainer in
//! place of the raw one.
//!
//! ```rust
//! use chain_rl::env::{chain::ChainEnv, wrappers::RewardShaping, Environment};
//!
//! // Penalise every step spent away from the end of the chain
//! let mut env = RewardShaping::new(ChainEnv::default(), |obs: &usize, _action: &i64, reward| {
//!     if *obs < 19 { reward - 0.1 } else { reward }
//! });
//! env.reset().unwrap();
//! let result = env.step(0).unwrap();
//! assert!((result.reward + 0.1).abs() < 1e-6);
//! ```

use anyhow::Result;

use super::{Environment, SpaceInfo, StepResult};

/// Applies a shaping function to the reward of every step
///
/// The function receives the observation after the step, the action taken
/// and the raw reward.
pub struct RewardShaping<E, F> {
    env: E,
    shape: F,
}

impl<E, F> RewardShaping<E, F>
where
    E: Environment,
    F: FnMut(&E::Observation, &E::Action, f32) -> f32,
{
    /// Wrap `env` with the shaping function `shape`
    pub fn new(env: E, shape: F) -> Self {
        Self { env, shape }
    }

    /// Inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Unwrap into the inner environment
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E, F> Environment for RewardShaping<E, F>
where
    E: Environment,
    E::Action: Clone,
    F: FnMut(&E::Observation, &E::Action, f32) -> f32,
{
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Result<Self::Observation> {
        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let mut result = self.env.step(action.clone())?;
        result.reward = (self.shape)(&result.observation, &action, result.reward);
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }
}

/// Multiplies every reward by a constant factor
#[derive(Debug, Clone)]
pub struct RewardScale<E> {
    env: E,
    scale: f32,
}

impl<E: Environment> RewardScale<E> {
    /// Wrap `env`, scaling its rewards by `scale`
    pub fn new(env: E, scale: f32) -> Self {
        Self { env, scale }
    }

    /// Scale factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: Environment> Environment for RewardScale<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Result<Self::Observation> {
        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>> {
        let mut result = self.env.step(action)?;
        result.reward *= self.scale;
        Ok(result)
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::chain::{ChainConfig, ChainEnv, ACTION_ADVANCE, ACTION_RETREAT};

    #[test]
    fn test_shaping_sees_post_step_observation() {
        let mut seen = Vec::new();
        {
            let mut env = RewardShaping::new(ChainEnv::default(), |obs: &usize, action: &i64, r| {
                seen.push((*obs, *action));
                r
            });
            env.reset().unwrap();
            env.step(ACTION_ADVANCE).unwrap();
            env.step(ACTION_ADVANCE).unwrap();
            env.step(ACTION_RETREAT).unwrap();
        }
        assert_eq!(seen, vec![(1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn test_shaping_bonus_for_progress() {
        let mut env =
            RewardShaping::new(ChainEnv::default(), |obs: &usize, _: &i64, r| r + *obs as f32);
        env.reset().unwrap();
        assert_eq!(env.step(ACTION_ADVANCE).unwrap().reward, 1.0);
        assert_eq!(env.step(ACTION_ADVANCE).unwrap().reward, 2.0);
        // Retreat: raw 2.0 plus bonus 0
        assert_eq!(env.step(ACTION_RETREAT).unwrap().reward, 2.0);
        assert_eq!(env.inner().position(), 0);
    }

    #[test]
    fn test_shaping_preserves_termination_and_errors() {
        let config = ChainConfig::new(2, 2.0, 10.0);
        let mut env =
            RewardShaping::new(ChainEnv::new(config).unwrap(), |_: &usize, _: &i64, r| -r);
        env.reset().unwrap();
        assert!(env.step(5).is_err());
        assert!(!env.step(ACTION_ADVANCE).unwrap().terminated);
        let result = env.step(ACTION_ADVANCE).unwrap();
        assert!(result.terminated);
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_reward_scale() {
        let mut env = RewardScale::new(ChainEnv::default(), 0.5);
        env.reset().unwrap();
        assert_eq!(env.step(ACTION_RETREAT).unwrap().reward, 1.0);
        assert_eq!(env.step(ACTION_ADVANCE).unwrap().reward, 0.0);
        assert_eq!(env.scale(), 0.5);
        assert_eq!(env.observation_space(), env.inner().observation_space());
    }
}
