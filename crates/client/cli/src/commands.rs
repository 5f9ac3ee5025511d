//! Subcommands of the headless client.
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use game_core::RunSummary;
use runtime::{
    AutopilotProvider, FileSaveRepository, HighScoreStore, OracleManager, RuntimeConfig,
    RuntimeError, SaveRepository, Session,
};

/// Inputs one autopilot run may take before it is saved and paused.
const INPUT_BUDGET: usize = 50_000;
const AUTOSAVE_SLOT: &str = "autosave";

pub async fn play(config: &RuntimeConfig, oracles: OracleManager) -> Result<()> {
    let seed = config.run_seed.unwrap_or_else(fresh_seed);
    let session = Session::start(oracles, seed, config.pregenerate)?;
    println!("run {seed} started");
    drive(config, session).await
}

pub async fn resume(config: &RuntimeConfig, oracles: OracleManager, slot: &str) -> Result<()> {
    let repo = FileSaveRepository::new(&config.save_dir)?;
    let state = repo
        .load(slot)
        .with_context(|| format!("loading save slot {slot}"))?
        .with_context(|| format!("no save in slot {slot}"))?;
    println!("run {} resumed at depth {}", state.run_seed, state.depth);
    drive(config, Session::resume(oracles, state, config.pregenerate)).await
}

pub fn scores(config: &RuntimeConfig) -> Result<()> {
    let store = HighScoreStore::new(config.scores_path());
    let entries = store.top(HighScoreStore::DEFAULT_CAPACITY)?;
    if entries.is_empty() {
        println!("no finished runs yet");
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. depth {:>3}  defeated {:>4}  seed {}",
            rank + 1,
            entry.max_depth,
            entry.enemies_defeated,
            entry.run_seed
        );
    }
    Ok(())
}

async fn drive(config: &RuntimeConfig, mut session: Session) -> Result<()> {
    match session.play(&AutopilotProvider, INPUT_BUDGET).await {
        Ok(summary) if session.is_over() => record(config, summary),
        Ok(_) | Err(RuntimeError::InputLimit { .. }) => {
            let repo = FileSaveRepository::new(&config.save_dir)?;
            session.save(&repo, AUTOSAVE_SLOT)?;
            let depth = session.state().depth;
            println!("paused at depth {depth}; continue with `resume {AUTOSAVE_SLOT}`");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn record(config: &RuntimeConfig, summary: RunSummary) -> Result<()> {
    println!(
        "run over: reached depth {}, defeated {} enemies",
        summary.max_depth, summary.enemies_defeated
    );
    let store = HighScoreStore::new(config.scores_path());
    match store.record(summary)? {
        Some(rank) => println!("new high score, rank {rank}"),
        None => println!("not in the top {}", HighScoreStore::DEFAULT_CAPACITY),
    }
    Ok(())
}

fn fresh_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
