//! Run-level state: the player walking an endless sequence of levels.
//!
//! [`RunState`] ties the subsystems together. Exploration moves the player
//! one cell at a time; bumping into an enemy spawn opens a [`Battle`] with
//! that enemy and its neighbours; standing on the stairs allows descending
//! into the next level. Levels come from [`generate_level`], so the run is a
//! pure function of its seed and the ordered list of player inputs.

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::battle::{Battle, BattleCommand, BattleOutcome, BattleStatus};
use crate::combat::{Combatant, SpellGauge};
use crate::config::GameConfig;
use crate::dungeon::{CellKind, DungeonLevel, generate_level, level_seed};
use crate::env::{Env, FragmentOracle, OracleError, RngOracle, ThemeOracle, roll_seed};
use crate::spell::{ConditionalNode, FragmentId, FragmentInventory, compose_spell};
use crate::state::{EntityId, Position, RunError};

/// Cardinal step direction, `y` grows southwards.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// What a single exploration step did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    Moved { to: Position },
    /// Wall or edge of the map; nothing changed.
    Blocked,
    Collected { to: Position, fragment: FragmentId },
    /// The player stays put and the listed enemies engage.
    BattleStarted { enemies: Vec<EntityId> },
}

/// Coarse phase of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Exploring,
    Battling,
    Over,
}

/// Final tally of a run, consumed by high-score tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub run_seed: u64,
    pub max_depth: u32,
    pub enemies_defeated: u32,
}

/// Everything needed to resume a run.
///
/// # Invariants
///
/// - `level.depth == depth` and `level.seed == level_seed(run_seed, depth)`
/// - `battle` is `Some` exactly when `phase` is [`RunPhase::Battling`]
/// - while battling, `player` holds the state from before the battle; the
///   authoritative copy lives in the battle until it finishes
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunState {
    pub run_seed: u64,
    pub depth: u32,
    pub max_depth: u32,
    pub enemies_defeated: u32,
    pub battles_started: u32,
    pub phase: RunPhase,
    pub player: Combatant,
    pub level: DungeonLevel,
    pub battle: Option<Battle>,
}

impl RunState {
    /// Starts a run at depth 0 with the configured starting loadout.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors from level generation.
    pub fn new<F, T, R>(run_seed: u64, env: Env<'_, F, T, R>) -> Result<Self, OracleError>
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let level = generate_level(run_seed, 0, env)?;
        Ok(Self::with_level(run_seed, level, env.config()))
    }

    /// Starts a run on an already generated first level.
    pub fn with_level(run_seed: u64, level: DungeonLevel, config: &GameConfig) -> Self {
        let player_config = &config.player;
        let inventory: FragmentInventory =
            player_config.starting_fragments.iter().copied().collect();
        let player = Combatant::player(
            config.health.clamp(player_config.starting_health),
            SpellGauge::full(player_config.gauge_max, player_config.regen_at(level.depth)),
            inventory,
        )
        .with_position(level.entry);

        Self {
            run_seed,
            depth: level.depth,
            max_depth: level.depth,
            enemies_defeated: 0,
            battles_started: 0,
            phase: RunPhase::Exploring,
            player,
            level,
            battle: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::Over
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_seed: self.run_seed,
            max_depth: self.max_depth,
            enemies_defeated: self.enemies_defeated,
        }
    }

    pub fn can_descend(&self) -> bool {
        self.phase == RunPhase::Exploring && self.player.position == self.level.stairs
    }

    /// Composes a spell from owned fragments and adds it to the spellbook.
    ///
    /// Fragments are not consumed. `logic` defaults to casting every listed
    /// fragment in order. Returns the new spellbook slot.
    ///
    /// # Errors
    ///
    /// [`RunError::NotExploring`] outside exploration, and any
    /// [`crate::spell::CompositionError`] from ownership or composition.
    pub fn compose_spell<F, T, R>(
        &mut self,
        fragments: &[FragmentId],
        logic: Option<ConditionalNode>,
        env: Env<'_, F, T, R>,
    ) -> Result<usize, RunError>
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        self.ensure_phase(RunPhase::Exploring)?;
        let catalog = env.fragments()?;
        let config = env.config();

        let inventory = self.player.inventory().ok_or(RunError::NotExploring)?;
        inventory.ensure_owns(fragments)?;

        let logic = logic.unwrap_or_else(|| ConditionalNode::chain(fragments.iter().copied()));
        let spell = compose_spell(
            &catalog.resolve(fragments),
            logic,
            &config.limits,
            &config.cost,
        )?;
        self.player
            .learn_spell(spell)
            .ok_or(RunError::NotExploring)
    }

    /// Moves the player one cell.
    ///
    /// # Errors
    ///
    /// [`RunError::NotExploring`] while a battle is active or the run is over.
    pub fn step(
        &mut self,
        direction: Direction,
        config: &GameConfig,
    ) -> Result<StepOutcome, RunError> {
        self.ensure_phase(RunPhase::Exploring)?;
        let (dx, dy) = direction.delta();
        let to = self.player.position.offset(dx, dy);

        match self.level.kind_at(to) {
            None | Some(CellKind::Wall) => Ok(StepOutcome::Blocked),
            Some(CellKind::EnemySpawn) => self.engage(to, config),
            Some(CellKind::Item) => {
                self.player.position = to;
                match self.level.take_item(to) {
                    Some(drop) => {
                        if let Some(inventory) = self.player.inventory_mut() {
                            inventory.add(drop.fragment, 1);
                        }
                        Ok(StepOutcome::Collected {
                            to,
                            fragment: drop.fragment,
                        })
                    }
                    None => Ok(StepOutcome::Moved { to }),
                }
            }
            Some(_) => {
                self.player.position = to;
                Ok(StepOutcome::Moved { to })
            }
        }
    }

    /// Opens a battle with the enemy at `at` and every enemy within the
    /// engage radius of it, nearest first.
    fn engage(&mut self, at: Position, config: &GameConfig) -> Result<StepOutcome, RunError> {
        let mut nearby: Vec<&Combatant> = self
            .level
            .enemies
            .iter()
            .filter(|enemy| enemy.position.manhattan(at) <= config.battle.engage_radius)
            .collect();
        if nearby.is_empty() {
            // Spawn cell without an enemy: treat it as floor.
            self.player.position = at;
            return Ok(StepOutcome::Moved { to: at });
        }
        nearby.sort_by_key(|enemy| (enemy.position.manhattan(at), enemy.id));
        nearby.truncate(GameConfig::MAX_ENCOUNTER);

        let enemies: Vec<Combatant> = nearby.into_iter().cloned().collect();
        let ids = enemies.iter().map(|enemy| enemy.id).collect();
        let seed = roll_seed(self.level.seed, self.battles_started, self.depth, 0);
        let battle = Battle::new(seed, self.player.clone(), enemies)?;

        self.battles_started += 1;
        self.battle = Some(battle);
        self.phase = RunPhase::Battling;
        Ok(StepOutcome::BattleStarted { enemies: ids })
    }

    /// Forwards a command to the active battle and settles it once decided.
    ///
    /// On victory the defeated enemies leave the level and the player keeps
    /// their post-battle health and gauge. Any defeat ends the run.
    ///
    /// # Errors
    ///
    /// [`RunError::NotBattling`] without an active battle, otherwise whatever
    /// [`Battle::advance`] rejects.
    pub fn command<F, T, R>(
        &mut self,
        command: BattleCommand,
        env: Env<'_, F, T, R>,
    ) -> Result<BattleOutcome, RunError>
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let battle = self.battle.as_mut().ok_or(RunError::NotBattling)?;
        let outcome = battle.advance(command, env)?;
        if battle.is_finished() {
            self.settle();
        }
        Ok(outcome)
    }

    fn settle(&mut self) {
        let Some(battle) = self.battle.take() else {
            return;
        };
        let status = battle.status();
        let (player, enemies) = battle.into_parts();

        for enemy in enemies.iter().filter(|enemy| enemy.is_defeated()) {
            if self.level.remove_enemy(enemy.id).is_some() {
                self.enemies_defeated += 1;
            }
        }
        for enemy in enemies.into_iter().filter(|enemy| !enemy.is_defeated()) {
            if let Some(slot) = self.level.enemies.iter_mut().find(|e| e.id == enemy.id) {
                *slot = enemy;
            }
        }

        let position = self.player.position;
        self.player = player;
        self.player.position = position;
        self.phase = match status {
            BattleStatus::Victory => RunPhase::Exploring,
            BattleStatus::Defeat | BattleStatus::Ongoing => RunPhase::Over,
        };
    }

    /// Generates the next level and moves the player onto its entry.
    ///
    /// # Errors
    ///
    /// [`RunError::NotOnStairs`] unless exploring on the stairs cell, and
    /// catalog errors from generation.
    pub fn descend<F, T, R>(&mut self, env: Env<'_, F, T, R>) -> Result<(), RunError>
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        self.ensure_descend()?;
        let level = generate_level(self.run_seed, self.depth + 1, env)?;
        self.descend_into(level, env.config())
    }

    /// Descends into a level generated ahead of time.
    ///
    /// # Errors
    ///
    /// [`RunError::NotOnStairs`] as for [`RunState::descend`], and
    /// [`RunError::LevelMismatch`] if `level` is not the next level of this
    /// run.
    pub fn descend_into(&mut self, level: DungeonLevel, config: &GameConfig) -> Result<(), RunError> {
        self.ensure_descend()?;
        let expected = self.depth + 1;
        if level.depth != expected || level.seed != level_seed(self.run_seed, expected) {
            return Err(RunError::LevelMismatch {
                expected,
                found: level.depth,
            });
        }

        self.depth = expected;
        self.max_depth = self.max_depth.max(expected);
        self.player.position = level.entry;
        self.player
            .gauge
            .set_regen(config.player.regen_at(self.depth));
        self.player.gauge.refill();
        self.level = level;
        Ok(())
    }

    fn ensure_descend(&self) -> Result<(), RunError> {
        self.ensure_phase(RunPhase::Exploring)?;
        if self.player.position != self.level.stairs {
            return Err(RunError::NotOnStairs {
                position: self.player.position,
            });
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: RunPhase) -> Result<(), RunError> {
        match (self.phase, expected) {
            (actual, expected) if actual == expected => Ok(()),
            (RunPhase::Over, _) => Err(RunError::RunOver),
            (_, RunPhase::Battling) => Err(RunError::NotBattling),
            _ => Err(RunError::NotExploring),
        }
    }
}
