//! Thread-based rollout workers
//!
//! Evaluates a policy on independent environment copies, one per worker
//! thread. Each worker owns its environment and streams a summary of every
//! finished episode back over a channel, the way a process pool would return
//! results from remote workers.
//!
//! ```rust
//! use chain_rl::{env::chain::ChainEnv, policy::RandomPolicy, rollout::{summarize, RolloutWorkers}};
//!
//! let workers = RolloutWorkers::new(4);
//! let policy = RandomPolicy::new(2, 0).unwrap();
//! let episodes = workers.evaluate(ChainEnv::default, &policy, 3).unwrap();
//! assert_eq!(episodes.len(), 12);
//! assert!(episodes.iter().all(|e| e.length == 20));
//! let summary = summarize(&episodes);
//! assert_eq!(summary.episodes, 12);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use crossbeam_channel::unbounded;

use crate::{env::Environment, policy::Policy};

/// Outcome of one evaluation episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    /// Worker that ran the episode
    pub worker_id: usize,
    /// Episode index within the worker
    pub episode: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f64,
    /// Number of steps taken
    pub length: usize,
}

/// Aggregate over a batch of episodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolloutSummary {
    /// Number of episodes
    pub episodes: usize,
    /// Mean episode reward
    pub mean_reward: f64,
    /// Lowest episode reward
    pub min_reward: f64,
    /// Highest episode reward
    pub max_reward: f64,
    /// Mean episode length
    pub mean_length: f64,
}

/// Pool of evaluation worker threads
#[derive(Debug, Clone)]
pub struct RolloutWorkers {
    num_workers: usize,
    max_episode_steps: usize,
}

impl RolloutWorkers {
    /// Create `num_workers` workers with the default episode step cap
    pub fn new(num_workers: usize) -> Self {
        Self { num_workers, max_episode_steps: 10_000 }
    }

    /// Set the maximum number of steps per episode
    pub fn max_episode_steps(mut self, steps: usize) -> Self {
        self.max_episode_steps = steps;
        self
    }

    /// Number of worker threads
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Run `episodes_per_worker` episodes on every worker
    ///
    /// Summaries are returned ordered by worker, then episode. The first
    /// environment error reported by any worker is returned instead, and the
    /// remaining workers stop at their next step.
    pub fn evaluate<E, F, P>(
        &self,
        env_fn: F,
        policy: &P,
        episodes_per_worker: usize,
    ) -> Result<Vec<EpisodeSummary>>
    where
        E: Environment<Action = i64>,
        F: Fn() -> E + Sync,
        P: Policy<E::Observation> + Sync,
    {
        let max_steps = self.max_episode_steps;
        let cancelled = AtomicBool::new(false);

        let mut summaries = std::thread::scope(|scope| -> Result<Vec<EpisodeSummary>> {
            let (tx, rx) = unbounded::<Result<EpisodeSummary>>();

            for worker_id in 0..self.num_workers {
                let tx = tx.clone();
                let env_fn = &env_fn;
                let cancelled = &cancelled;
                scope.spawn(move || {
                    let mut env = env_fn();
                    for episode in 0..episodes_per_worker {
                        let outcome = run_episode(
                            &mut env, policy, worker_id, episode, max_steps, cancelled,
                        );
                        let outcome = match outcome {
                            Ok(Some(summary)) => Ok(summary),
                            Ok(None) => return,
                            Err(e) => {
                                let _ = tx.send(Err(e));
                                cancelled.store(true, Ordering::Relaxed);
                                return;
                            }
                        };
                        if tx.send(outcome).is_err() {
                            return;
                        }
                    }
                });
            }
            drop(tx);

            let mut summaries = Vec::with_capacity(self.num_workers * episodes_per_worker);
            while let Ok(outcome) = rx.recv() {
                match outcome {
                    Ok(summary) => summaries.push(summary),
                    Err(e) => {
                        cancelled.store(true, Ordering::Relaxed);
                        drop(rx);
                        return Err(e);
                    }
                }
            }
            Ok(summaries)
        })?;

        summaries.sort_by_key(|s| (s.worker_id, s.episode));
        Ok(summaries)
    }
}

/// Run one episode; `None` if the evaluation was cancelled part way
fn run_episode<E, P>(
    env: &mut E,
    policy: &P,
    worker_id: usize,
    episode: usize,
    max_steps: usize,
    cancelled: &AtomicBool,
) -> Result<Option<EpisodeSummary>>
where
    E: Environment<Action = i64>,
    P: Policy<E::Observation> + ?Sized,
{
    let mut obs = env.reset()?;
    let mut total_reward = 0.0;
    let mut length = 0;

    loop {
        if cancelled.load(Ordering::Relaxed) {
            tracing::debug!(worker_id, episode, "evaluation cancelled");
            return Ok(None);
        }
        if length >= max_steps {
            tracing::warn!(worker_id, episode, max_steps, "episode hit the step cap");
            break;
        }
        let action = policy.compute_action(&obs);
        let result = env.step(action)?;
        total_reward += result.reward as f64;
        length += 1;
        if result.is_done() {
            break;
        }
        obs = result.observation;
    }

    Ok(Some(EpisodeSummary { worker_id, episode, total_reward, length }))
}

/// Summarize a batch of episodes
pub fn summarize(episodes: &[EpisodeSummary]) -> RolloutSummary {
    if episodes.is_empty() {
        return RolloutSummary::default();
    }

    let n = episodes.len() as f64;
    let mut min_reward = f64::INFINITY;
    let mut max_reward = f64::NEG_INFINITY;
    let mut reward_sum = 0.0;
    let mut length_sum = 0usize;
    for e in episodes {
        min_reward = min_reward.min(e.total_reward);
        max_reward = max_reward.max(e.total_reward);
        reward_sum += e.total_reward;
        length_sum += e.length;
    }

    RolloutSummary {
        episodes: episodes.len(),
        mean_reward: reward_sum / n,
        min_reward,
        max_reward,
        mean_length: length_sum as f64 / n,
    }
}
