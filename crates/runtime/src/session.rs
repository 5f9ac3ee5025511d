//! Run driver: applies player input to a [`RunState`] and owns the
//! background work around it.
//!
//! A [`Session`] is the single writer of its run. It forwards each input to
//! the pure core, logs what happened, keeps one level pre-generated while
//! the player explores, and hands the final [`RunSummary`] back when the
//! run ends.
use game_core::{
    BattleCommand, BattleEvent, BattleOutcome, ConditionalNode, Direction, FragmentId, GameError,
    RunState, RunSummary, StepOutcome,
};
use tracing::{debug, info, warn};

use crate::api::{PlayerInput, PlayerProvider, Result, RuntimeError};
use crate::oracle::OracleManager;
use crate::repository::SaveRepository;
use crate::worker::LevelPregen;

/// What an accepted input did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Stepped(StepOutcome),
    Composed { slot: usize },
    Battle(BattleOutcome),
    Descended { depth: u32 },
}

pub struct Session {
    oracles: OracleManager,
    state: RunState,
    pregenerate: bool,
    pregen: Option<LevelPregen>,
}

impl Session {
    /// Starts a fresh run at depth 0.
    pub fn start(oracles: OracleManager, run_seed: u64, pregenerate: bool) -> Result<Self> {
        let state = RunState::new(run_seed, oracles.as_game_env())?;
        info!(
            run_seed,
            width = state.level.width,
            height = state.level.height,
            enemies = state.level.enemies.len(),
            "run started"
        );
        Ok(Self::resume(oracles, state, pregenerate))
    }

    /// Continues a run restored from a save.
    pub fn resume(oracles: OracleManager, state: RunState, pregenerate: bool) -> Self {
        let mut session = Self {
            oracles,
            state,
            pregenerate,
            pregen: None,
        };
        session.schedule_pregen();
        session
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Depth of the level currently being generated in the background.
    pub fn pregenerating(&self) -> Option<u32> {
        self.pregen.as_ref().map(LevelPregen::depth)
    }

    pub async fn apply(&mut self, input: PlayerInput) -> Result<InputOutcome> {
        match input {
            PlayerInput::Step(direction) => self.step(direction).map(InputOutcome::Stepped),
            PlayerInput::Compose { fragments, logic } => self
                .compose(&fragments, logic)
                .map(|slot| InputOutcome::Composed { slot }),
            PlayerInput::Command(command) => self.command(command).map(InputOutcome::Battle),
            PlayerInput::Descend => {
                self.descend().await?;
                Ok(InputOutcome::Descended {
                    depth: self.state.depth,
                })
            }
        }
    }

    pub fn step(&mut self, direction: Direction) -> Result<StepOutcome> {
        let outcome = self.state.step(direction, self.oracles.config())?;
        match &outcome {
            StepOutcome::Collected { to, fragment } => {
                debug!(%to, %fragment, "fragment collected");
            }
            StepOutcome::BattleStarted { enemies } => {
                info!(
                    depth = self.state.depth,
                    enemies = enemies.len(),
                    "battle started"
                );
            }
            StepOutcome::Moved { .. } | StepOutcome::Blocked => {}
        }
        Ok(outcome)
    }

    pub fn compose(
        &mut self,
        fragments: &[FragmentId],
        logic: Option<ConditionalNode>,
    ) -> Result<usize> {
        let slot = self
            .state
            .compose_spell(fragments, logic, self.oracles.as_game_env())?;
        if let Some(spell) = self.state.player.spell(slot) {
            debug!(slot, cost = spell.cost(), "spell composed");
        }
        Ok(slot)
    }

    pub fn command(&mut self, command: BattleCommand) -> Result<BattleOutcome> {
        let outcome = self.state.command(command, self.oracles.as_game_env())?;
        for event in &outcome.events {
            log_battle_event(outcome.round, event);
        }
        if self.state.is_over() {
            self.cancel_pregen();
            let summary = self.state.summary();
            info!(
                run_seed = summary.run_seed,
                max_depth = summary.max_depth,
                enemies_defeated = summary.enemies_defeated,
                "run ended"
            );
        }
        Ok(outcome)
    }

    /// Moves to the next level, adopting the pre-generated one when it
    /// matches.
    pub async fn descend(&mut self) -> Result<()> {
        if !self.state.can_descend() {
            // The core reports the precise reason.
            return Ok(self.state.descend(self.oracles.as_game_env())?);
        }

        let next = self.state.depth + 1;
        match self.pregen.take() {
            Some(pregen) if pregen.depth() == next => match pregen.join().await {
                Ok(level) => self.state.descend_into(level, self.oracles.config())?,
                Err(RuntimeError::WorkerJoin(err)) => {
                    warn!(depth = next, error = %err, "level worker failed, generating inline");
                    self.state.descend(self.oracles.as_game_env())?;
                }
                Err(err) => return Err(err),
            },
            stale => {
                if let Some(pregen) = stale {
                    pregen.abort();
                }
                self.state.descend(self.oracles.as_game_env())?;
            }
        }

        info!(
            depth = self.state.depth,
            enemies = self.state.level.enemies.len(),
            items = self.state.level.items.len(),
            "descended"
        );
        self.schedule_pregen();
        Ok(())
    }

    /// Writes the run to `slot`.
    pub fn save(&self, repo: &dyn SaveRepository, slot: &str) -> Result<()> {
        repo.save(slot, &self.state)?;
        info!(slot, depth = self.state.depth, "run saved");
        Ok(())
    }

    /// Feeds input from `provider` until the run ends or the provider stops.
    ///
    /// Rejected inputs are logged and skipped. At most `max_inputs` inputs
    /// are requested.
    pub async fn play(
        &mut self,
        provider: &dyn PlayerProvider,
        max_inputs: usize,
    ) -> Result<RunSummary> {
        for _ in 0..max_inputs {
            if self.is_over() {
                return Ok(self.state.summary());
            }
            let Some(input) = provider.next_input(&self.state).await? else {
                return Ok(self.state.summary());
            };
            match self.apply(input).await {
                Ok(_) => {}
                Err(RuntimeError::Run(err)) if !err.severity().is_internal() => {
                    warn!(code = err.error_code(), "input rejected: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        if self.is_over() {
            Ok(self.state.summary())
        } else {
            Err(RuntimeError::InputLimit { limit: max_inputs })
        }
    }

    /// Ends the session and returns the run's tally.
    pub fn finish(mut self) -> RunSummary {
        self.cancel_pregen();
        self.state.summary()
    }

    /// Consumes the session, returning the run for inspection or saving.
    pub fn into_state(mut self) -> RunState {
        self.cancel_pregen();
        self.state
    }

    fn schedule_pregen(&mut self) {
        if !self.pregenerate || self.state.is_over() {
            return;
        }
        let depth = self.state.depth + 1;
        if self.pregenerating() == Some(depth) {
            return;
        }
        self.cancel_pregen();
        self.pregen = LevelPregen::spawn(self.oracles.clone(), self.state.run_seed, depth);
        if self.pregen.is_none() {
            debug!(depth, "no async runtime, next level will be generated on descend");
        }
    }

    fn cancel_pregen(&mut self) {
        if let Some(pregen) = self.pregen.take() {
            pregen.abort();
        }
    }
}

fn log_battle_event(round: u32, event: &BattleEvent) {
    match event {
        BattleEvent::SpellCast {
            caster,
            target,
            slot,
            cost,
        } => debug!(round, %caster, %target, slot, cost, "spell cast"),
        BattleEvent::Waited { entity } => debug!(round, %entity, "waited"),
        BattleEvent::HealthChanged {
            entity,
            before,
            after,
        } => debug!(round, %entity, ?before, ?after, "health changed"),
        BattleEvent::Defeated { entity } => debug!(round, %entity, "defeated"),
        BattleEvent::RoundEnded { round } => debug!(round, "round ended"),
        BattleEvent::Finished { status, reason } => {
            info!(round, ?status, ?reason, "battle finished")
        }
    }
}

#[cfg(test)]
mod tests {
    use game_core::generate_level;

    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn failed_worker_falls_back_to_inline_generation() {
        let oracles = testing::oracles();
        let mut state = testing::new_run(8);
        state.player.position = state.level.stairs;

        let mut session = Session::resume(oracles.clone(), state, false);
        session.pregen = Some(LevelPregen::cancelled(1));
        session.descend().await.unwrap();

        assert_eq!(session.state().depth, 1);
        assert_eq!(
            session.state().level,
            generate_level(8, 1, oracles.as_game_env()).unwrap()
        );
    }
}
