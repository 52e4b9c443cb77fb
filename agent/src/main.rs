//! Agent - plays card battles with Monte Carlo Tree Search
//!
//! 1. Loads configuration (CLI > env > config.toml > built-in defaults)
//! 2. Plays the requested number of seeded battles
//! 3. Logs a summary and optionally writes a JSON stats snapshot

use agent::{AgentKind, BattleAgent, BattleRunner, Config, MctsAgent, RandomAgent};
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::load();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let seed = config.seed.unwrap_or_else(rand::random);
    let game = config.game()?;
    let mcts_config = config.mcts_config()?;

    let mut agent: Box<dyn BattleAgent> = match config.agent_kind()? {
        AgentKind::Mcts => {
            info!(
                iterations = mcts_config.iterations,
                exploration = mcts_config.exploration,
                rollout = %mcts_config.rollout,
                "Using MCTS agent"
            );
            Box::new(
                MctsAgent::with_seed(mcts_config, seed)
                    .with_verbose(config.verbose, config.dump_depth),
            )
        }
        AgentKind::Random => {
            info!("Using random agent");
            Box::new(RandomAgent::with_seed(seed))
        }
    };

    let runner =
        BattleRunner::new(game, config.battles, seed).with_log_interval(config.log_interval);
    let stats = runner.run(agent.as_mut())?;
    stats.log_summary();

    if let Some(ref path) = config.stats_path {
        if let Err(e) = stats.write_stats(Path::new(path)) {
            warn!("Failed to write battle stats: {:#}", e);
        } else {
            info!("Wrote battle stats to {}", path);
        }
    }

    Ok(())
}
