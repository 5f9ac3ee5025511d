//! Asynchronous abstraction for sourcing player input.
//!
//! Runtime users plug in [`PlayerProvider`] implementations so a session can
//! run with human input, scripted fixtures, or an automatic policy.
use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use game_core::{
    BattleCommand, CellKind, ConditionalNode, Direction, FragmentId, Position, RunPhase, RunState,
};
use strum::IntoEnumIterator;
use tokio::sync::Mutex;

use super::errors::Result;

/// One decision fed into a [`crate::Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    Step(Direction),
    Compose {
        fragments: Vec<FragmentId>,
        logic: Option<ConditionalNode>,
    },
    Command(BattleCommand),
    Descend,
}

/// Trait for providing player input based on the current run.
///
/// Returning `Ok(None)` ends the session loop without finishing the run,
/// e.g. when a human quits or a script runs dry.
#[async_trait]
pub trait PlayerProvider: Send + Sync {
    async fn next_input(&self, state: &RunState) -> Result<Option<PlayerInput>>;
}

/// Replays a fixed list of inputs in order.
pub struct ScriptedProvider {
    inputs: Mutex<VecDeque<PlayerInput>>,
}

impl ScriptedProvider {
    pub fn new(inputs: impl IntoIterator<Item = PlayerInput>) -> Self {
        Self {
            inputs: Mutex::new(inputs.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.inputs.lock().await.len()
    }
}

#[async_trait]
impl PlayerProvider for ScriptedProvider {
    async fn next_input(&self, _state: &RunState) -> Result<Option<PlayerInput>> {
        Ok(self.inputs.lock().await.pop_front())
    }
}

/// Deterministic policy that plays a run without supervision.
///
/// While exploring it first composes a one-fragment spell for every owned
/// fragment it has no spell for, then walks the shortest path to the stairs
/// and descends. Enemies in the way are fought with the most expensive
/// affordable offensive spell; it waits when nothing is affordable.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutopilotProvider;

impl AutopilotProvider {
    pub fn decide(state: &RunState) -> Option<PlayerInput> {
        match state.phase {
            RunPhase::Over => None,
            RunPhase::Battling => Some(PlayerInput::Command(Self::battle_command(state))),
            RunPhase::Exploring => Self::explore(state),
        }
    }

    fn battle_command(state: &RunState) -> BattleCommand {
        let Some(battle) = state.battle.as_ref() else {
            return BattleCommand::Wait;
        };
        let Some(target) = battle.living_enemies().next().map(|enemy| enemy.id) else {
            return BattleCommand::Wait;
        };
        let player = battle.player();
        player
            .spells()
            .iter()
            .enumerate()
            .filter(|(_, spell)| !spell.pattern().is_self_target())
            .filter(|(_, spell)| player.gauge.can_afford(spell.cost()))
            .max_by_key(|(slot, spell)| (spell.cost(), std::cmp::Reverse(*slot)))
            .map_or(BattleCommand::Wait, |(slot, _)| BattleCommand::cast(slot, target))
    }

    fn explore(state: &RunState) -> Option<PlayerInput> {
        if let Some(fragment) = Self::uncomposed_fragment(state) {
            return Some(PlayerInput::Compose {
                fragments: vec![fragment],
                logic: None,
            });
        }
        if state.can_descend() {
            return Some(PlayerInput::Descend);
        }
        Self::first_step(state, state.level.stairs).map(PlayerInput::Step)
    }

    fn uncomposed_fragment(state: &RunState) -> Option<FragmentId> {
        let spells = state.player.spells();
        state
            .player
            .inventory()?
            .iter()
            .map(|(id, _)| id)
            .find(|id| {
                !spells
                    .iter()
                    .any(|spell| matches!(spell.fragments(), [only] if only.id == *id))
            })
    }

    /// First direction of a breadth-first path to `goal` over every non-wall
    /// cell. Enemy spawns are walked into, which starts a battle.
    fn first_step(state: &RunState, goal: Position) -> Option<Direction> {
        let start = state.player.position;
        let mut first: BTreeMap<Position, Direction> = BTreeMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                return first.get(&current).copied();
            }
            for direction in Direction::iter() {
                let (dx, dy) = direction.delta();
                let next = current.offset(dx, dy);
                let open = !matches!(state.level.kind_at(next), None | Some(CellKind::Wall));
                if !open || next == start || first.contains_key(&next) {
                    continue;
                }
                let origin = first.get(&current).copied().unwrap_or(direction);
                first.insert(next, origin);
                queue.push_back(next);
            }
        }
        None
    }
}

#[async_trait]
impl PlayerProvider for AutopilotProvider {
    async fn next_input(&self, state: &RunState) -> Result<Option<PlayerInput>> {
        Ok(Self::decide(state))
    }
}
