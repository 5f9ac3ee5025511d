//! Battle resolver.
//!
//! [`Battle`] owns the player and up to [`GameConfig::MAX_ENCOUNTER`] enemies
//! for the duration of one encounter. Every call to [`Battle::advance`]
//! drives the state machine one full step: validate the player's command,
//! resolve it, let the enemies answer, check for a decision and close the
//! round. Rejected commands leave the battle untouched.
//!
//! All randomness (enemy spell choice) is derived from the battle seed, so a
//! battle replays identically from its initial state and a command list.

mod command;
mod enemy;
mod error;
mod outcome;

pub use command::BattleCommand;
pub use enemy::choose_spell;
pub use error::BattleError;
pub use outcome::{BattleEvent, BattleOutcome, BattlePhase, BattleStatus, FinishReason};

use arrayvec::ArrayVec;

use crate::combat::{Combatant, apply_effect, regenerate_gauge, try_cast};
use crate::config::{GameConfig, HealthBounds};
use crate::env::{FragmentOracle, Env, RngOracle, ThemeOracle};
use crate::spell::{BattleContext, Spell};
use crate::state::EntityId;

/// Enemies engaged in one battle.
pub type Encounter = ArrayVec<Combatant, { GameConfig::MAX_ENCOUNTER }>;

/// One encounter between the player and a group of enemies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    seed: u64,
    round: u32,
    phase: BattlePhase,
    status: BattleStatus,
    player: Combatant,
    enemies: Encounter,
}

impl Battle {
    /// Starts a battle in round 1, awaiting the player's first command.
    ///
    /// # Errors
    ///
    /// Rejects empty or oversized encounters and duplicate combatant ids.
    pub fn new(
        seed: u64,
        player: Combatant,
        enemies: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, BattleError> {
        let enemies: Vec<Combatant> = enemies.into_iter().collect();
        if enemies.is_empty() {
            return Err(BattleError::EmptyEncounter);
        }
        if enemies.len() > GameConfig::MAX_ENCOUNTER {
            return Err(BattleError::EncounterTooLarge {
                count: enemies.len(),
                max: GameConfig::MAX_ENCOUNTER,
            });
        }
        for (index, enemy) in enemies.iter().enumerate() {
            if enemy.id == player.id || enemies[..index].iter().any(|e| e.id == enemy.id) {
                return Err(BattleError::DuplicateCombatant(enemy.id));
            }
        }

        Ok(Self {
            seed,
            round: 1,
            phase: BattlePhase::AwaitingCommand,
            status: BattleStatus::Ongoing,
            player,
            enemies: enemies.into_iter().collect(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.enemies.iter().filter(|enemy| !enemy.is_defeated())
    }

    /// Read-only snapshot for rendering a pending player cast.
    pub fn context_for(&self, target: EntityId) -> Option<BattleContext> {
        let target = self.combatant(target)?;
        Some(BattleContext::new(
            self.player.view(),
            target.view(),
            self.round,
        ))
    }

    /// Consumes the battle, handing back the player and the enemies.
    pub fn into_parts(self) -> (Combatant, Vec<Combatant>) {
        (self.player, self.enemies.into_iter().collect())
    }

    /// Drives the state machine through one command.
    ///
    /// # Errors
    ///
    /// Validation failures ([`BattleError::InsufficientGauge`],
    /// [`BattleError::UnknownSpell`], [`BattleError::UnknownTarget`],
    /// [`BattleError::TargetDefeated`]) and [`BattleError::Finished`] are
    /// recoverable: no round is consumed and nothing is mutated.
    /// [`BattleError::Oracle`] is returned when `env` has no RNG oracle.
    pub fn advance<F, T, R>(
        &mut self,
        command: BattleCommand,
        env: Env<'_, F, T, R>,
    ) -> Result<BattleOutcome, BattleError>
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        if self.phase == BattlePhase::Finished {
            return Err(BattleError::Finished);
        }
        let rng = env.rng()?;
        let config = env.config();

        self.phase = BattlePhase::Validating;
        let cast = match self.validate(command) {
            Ok(cast) => cast,
            Err(err) => {
                self.phase = BattlePhase::AwaitingCommand;
                return Err(err);
            }
        };

        let round = self.round;
        let mut events = Vec::new();

        self.phase = BattlePhase::Resolving;
        match cast {
            Some((slot, spell, target)) => {
                let cost = spell.cost();
                events.push(BattleEvent::SpellCast {
                    caster: self.player.id,
                    target,
                    slot,
                    cost,
                });
                self.resolve_cast(self.player.id, &spell, target, &config.health, &mut events);
            }
            None => events.push(BattleEvent::Waited {
                entity: self.player.id,
            }),
        }

        self.phase = BattlePhase::CheckTerminal;
        if self.check_terminal(&mut events) {
            return Ok(self.outcome(round, events));
        }

        self.phase = BattlePhase::Resolving;
        self.enemy_turns(rng, &config.health, &mut events);

        self.phase = BattlePhase::CheckTerminal;
        if self.check_terminal(&mut events) {
            return Ok(self.outcome(round, events));
        }

        self.end_round(config, &mut events);
        Ok(self.outcome(round, events))
    }

    /// Checks a command without mutating anything. `Ok(None)` means wait.
    fn validate(
        &self,
        command: BattleCommand,
    ) -> Result<Option<(usize, Spell, EntityId)>, BattleError> {
        let BattleCommand::Cast { spell: slot, target } = command else {
            return Ok(None);
        };
        let spell = self
            .player
            .spell(slot)
            .ok_or(BattleError::UnknownSpell { slot })?;
        let target_combatant = self
            .combatant(target)
            .ok_or(BattleError::UnknownTarget(target))?;
        if target_combatant.is_defeated() {
            return Err(BattleError::TargetDefeated(target));
        }
        if !self.player.gauge.can_afford(spell.cost()) {
            return Err(BattleError::InsufficientGauge {
                required: spell.cost(),
                available: self.player.gauge.current(),
            });
        }
        Ok(Some((slot, spell.clone(), target)))
    }

    fn enemy_turns<R>(&mut self, rng: &R, bounds: &HealthBounds, events: &mut Vec<BattleEvent>)
    where
        R: RngOracle + ?Sized,
    {
        for index in 0..self.enemies.len() {
            if self.player.is_defeated() {
                break;
            }
            let enemy = &self.enemies[index];
            if enemy.is_defeated() {
                continue;
            }
            let enemy_id = enemy.id;
            let Some(slot) = choose_spell(enemy, self.seed, self.round, rng) else {
                events.push(BattleEvent::Waited { entity: enemy_id });
                continue;
            };
            let Some(spell) = enemy.spell(slot).cloned() else {
                continue;
            };
            let target = self.player.id;
            if try_cast(&mut self.enemies[index], &spell, target).is_err() {
                events.push(BattleEvent::Waited { entity: enemy_id });
                continue;
            }
            events.push(BattleEvent::SpellCast {
                caster: enemy_id,
                target,
                slot,
                cost: spell.cost(),
            });
            self.resolve_cast(enemy_id, &spell, target, bounds, events);
        }
    }

    /// Applies a validated cast. The player's gauge is charged here; enemies
    /// are charged by [`Self::enemy_turns`] before the call.
    fn resolve_cast(
        &mut self,
        caster: EntityId,
        spell: &Spell,
        target: EntityId,
        bounds: &HealthBounds,
        events: &mut Vec<BattleEvent>,
    ) {
        if caster == self.player.id && try_cast(&mut self.player, spell, target).is_err() {
            return;
        }
        let affected = self.affected(caster, spell, target);

        // Every effect reads the same snapshot, taken after the cost is paid.
        let Some(caster_view) = self.combatant(caster).map(Combatant::view) else {
            return;
        };
        let contexts: Vec<(EntityId, BattleContext)> = affected
            .iter()
            .filter_map(|id| {
                self.combatant(*id).map(|combatant| {
                    (
                        *id,
                        BattleContext::new(caster_view, combatant.view(), self.round),
                    )
                })
            })
            .collect();

        for (id, context) in contexts {
            let Some(combatant) = self.combatant_mut(id) else {
                continue;
            };
            let before = combatant.health;
            let after = apply_effect(before, spell, &context, bounds);
            combatant.health = after;
            if before != after {
                events.push(BattleEvent::HealthChanged {
                    entity: id,
                    before,
                    after,
                });
            }
            if after.is_zero() && !before.is_zero() {
                events.push(BattleEvent::Defeated { entity: id });
            }
        }
    }

    /// Ids hit by `spell`, in a stable order without duplicates.
    ///
    /// A self-target pattern affects only the caster. Otherwise the commanded
    /// target is hit, plus every living opponent standing on
    /// `caster.position + offset`, plus the caster when the pattern says so.
    fn affected(&self, caster: EntityId, spell: &Spell, target: EntityId) -> Vec<EntityId> {
        let pattern = spell.pattern();
        if pattern.is_self_target() {
            return vec![caster];
        }
        let Some(origin) = self.combatant(caster).map(|c| c.position) else {
            return Vec::new();
        };

        let mut affected = vec![target];
        let opponents: Vec<&Combatant> = if caster == self.player.id {
            self.living_enemies().collect()
        } else {
            vec![&self.player]
        };
        for offset in pattern.offsets() {
            let cell = origin.offset(offset.dx, offset.dy);
            for opponent in &opponents {
                if opponent.position == cell && !affected.contains(&opponent.id) {
                    affected.push(opponent.id);
                }
            }
        }
        if pattern.includes_caster() && !affected.contains(&caster) {
            affected.push(caster);
        }
        affected
    }

    fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    /// Finishes the battle if either side is wiped out. Player defeat wins
    /// ties, so a mutual knock-out is a loss.
    fn check_terminal(&mut self, events: &mut Vec<BattleEvent>) -> bool {
        if self.player.is_defeated() {
            self.finish(BattleStatus::Defeat, FinishReason::PlayerDefeated, events);
            return true;
        }
        if self.enemies.iter().all(Combatant::is_defeated) {
            self.finish(BattleStatus::Victory, FinishReason::EnemiesDefeated, events);
            return true;
        }
        self.phase = BattlePhase::AwaitingCommand;
        false
    }

    fn end_round(&mut self, config: &GameConfig, events: &mut Vec<BattleEvent>) {
        regenerate_gauge(&mut self.player);
        for enemy in self.enemies.iter_mut().filter(|e| !e.is_defeated()) {
            regenerate_gauge(enemy);
        }
        events.push(BattleEvent::RoundEnded { round: self.round });

        if self.round >= config.battle.max_rounds {
            self.finish(BattleStatus::Defeat, FinishReason::RoundLimit, events);
            return;
        }
        self.round += 1;
        self.phase = BattlePhase::AwaitingCommand;
    }

    fn finish(&mut self, status: BattleStatus, reason: FinishReason, events: &mut Vec<BattleEvent>) {
        self.status = status;
        self.phase = BattlePhase::Finished;
        events.push(BattleEvent::Finished { status, reason });
    }

    fn outcome(&self, round: u32, events: Vec<BattleEvent>) -> BattleOutcome {
        BattleOutcome {
            round,
            events,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests;
