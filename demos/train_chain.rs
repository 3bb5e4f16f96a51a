//! Train tabular Q-learning on the chain environment
//!
//! Trains on the chain, evaluates the greedy policy with rollout workers and
//! exports the Q-table for `serve_policy`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example train_chain --release -- [policy.json] [chain.json] [train.json]
//! ```
//!
//! Config files are optional JSON objects; missing fields use the defaults.

use anyhow::Result;
use chain_rl::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "chain_policy.json".to_string());
    let chain_config = match args.next() {
        Some(path) => ChainConfig::from_json_file(path)?,
        None => ChainConfig::default(),
    };
    let train_config = match args.next() {
        Some(path) => QLearningConfig::from_json_file(path)?,
        None => QLearningConfig::default(),
    };

    const ITERATIONS: usize = 100;
    const STEPS_PER_ENV: usize = 250;

    tracing::info!("Environment: Chain");
    tracing::info!("  Cells: {}", chain_config.n);
    tracing::info!("  Horizon: {}", chain_config.effective_horizon());
    tracing::info!("  Rewards: small={} large={}", chain_config.small_reward, chain_config.large_reward);
    tracing::info!("  Num envs: {}", train_config.num_envs);

    let env_fn = || ChainEnv::new(chain_config.clone()).expect("validated chain config");
    // Validate once up front so the factory above cannot fail
    ChainEnv::new(chain_config.clone())?;

    let mut trainer = QLearningTrainer::new(train_config, env_fn)?;
    let aggregated = trainer.train(ITERATIONS, STEPS_PER_ENV)?;

    tracing::info!("");
    tracing::info!("Training complete");
    tracing::info!("  Total steps: {}", trainer.total_steps());
    tracing::info!("  Total episodes: {}", trainer.total_episodes());
    tracing::info!("  Best mean return: {:.2}", aggregated.best_mean_return);

    let policy = trainer.into_policy();
    let episodes = RolloutWorkers::new(4).evaluate(env_fn, &policy, 5)?;
    let summary = summarize(&episodes);
    tracing::info!(
        "Greedy evaluation: {} episodes, mean reward {:.2} (min {:.2}, max {:.2})",
        summary.episodes,
        summary.mean_reward,
        summary.min_reward,
        summary.max_reward
    );

    let actions: Vec<i64> = (0..policy.num_states).map(|s| policy.compute_action(&s)).collect();
    tracing::info!("Greedy actions per cell: {:?}", actions);

    policy.save_json(&output)?;
    tracing::info!("Policy exported to {}", output);

    Ok(())
}
