//! Serve an exported chain policy
//!
//! Loads a Q-table written by `train_chain`, evaluates it on parallel rollout
//! workers, then answers queries read from stdin: one observation (cell index)
//! per line, one action per output line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example serve_policy --release -- chain_policy.json [chain.json]
//! echo -e "0\n19" | cargo run --example serve_policy -- chain_policy.json
//! ```

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use chain_rl::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let policy_path = args.next().ok_or_else(|| anyhow!("usage: serve_policy <policy.json> [chain.json]"))?;
    let chain_config = match args.next() {
        Some(path) => ChainConfig::from_json_file(path)?,
        None => ChainConfig::default(),
    };

    let policy = TabularPolicy::load_json(&policy_path)?;
    tracing::info!(
        "Loaded policy from {} ({} states, {} actions)",
        policy_path,
        policy.num_states,
        policy.num_actions
    );
    if policy.num_states != chain_config.n {
        return Err(anyhow!(
            "policy has {} states but the chain has {} cells",
            policy.num_states,
            chain_config.n
        ));
    }

    ChainEnv::new(chain_config.clone())?;
    let env_fn = || ChainEnv::new(chain_config.clone()).expect("validated chain config");
    let summary = summarize(&RolloutWorkers::new(4).evaluate(env_fn, &policy, 10)?);
    tracing::info!("Evaluation mean reward: {:.2} over {} episodes", summary.mean_reward, summary.episodes);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let obs: usize = line.parse().with_context(|| format!("bad observation {line:?}"))?;
        if obs >= policy.num_states {
            tracing::warn!("observation {} out of range, skipping", obs);
            continue;
        }
        writeln!(stdout, "{}", policy.compute_action(&obs))?;
    }

    Ok(())
}
