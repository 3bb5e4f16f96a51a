//! Policy implementations
//!
//! A policy maps an observation to an action. Trained tabular policies can be
//! exported to JSON and loaded back for serving without the trainer.

use std::sync::Mutex;

use anyhow::{bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub mod tabular;

pub use tabular::TabularPolicy;

/// Maps observations to discrete actions
///
/// This is the single call a serving endpoint needs to answer queries.
pub trait Policy<O> {
    /// Choose an action for `obs`
    fn compute_action(&self, obs: &O) -> i64;
}

/// Uniformly random policy over `num_actions` discrete actions
#[derive(Debug)]
pub struct RandomPolicy {
    num_actions: usize,
    rng: Mutex<StdRng>,
}

impl RandomPolicy {
    /// Create a seeded random policy
    ///
    /// Fails if `num_actions` is zero.
    pub fn new(num_actions: usize, seed: u64) -> Result<Self> {
        if num_actions == 0 {
            bail!("RandomPolicy needs at least one action");
        }
        Ok(Self { num_actions, rng: Mutex::new(StdRng::seed_from_u64(seed)) })
    }

    /// Number of actions sampled from
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }
}

impl<O> Policy<O> for RandomPolicy {
    fn compute_action(&self, _obs: &O) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..self.num_actions) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_in_range() {
        let policy = RandomPolicy::new(2, 7).unwrap();
        let mut counts = [0usize; 2];
        for _ in 0..1000 {
            let action = Policy::<usize>::compute_action(&policy, &0);
            counts[action as usize] += 1;
        }
        assert!(counts[0] > 400 && counts[1] > 400, "counts: {:?}", counts);
    }

    #[test]
    fn test_random_policy_seeded() {
        let a = RandomPolicy::new(4, 42).unwrap();
        let b = RandomPolicy::new(4, 42).unwrap();
        let xs: Vec<i64> = (0..32).map(|_| Policy::<usize>::compute_action(&a, &0)).collect();
        let ys: Vec<i64> = (0..32).map(|_| Policy::<usize>::compute_action(&b, &0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_random_policy_rejects_empty_action_set() {
        assert!(RandomPolicy::new(0, 1).is_err());
        assert_eq!(RandomPolicy::new(3, 1).unwrap().num_actions(), 3);
    }
}
