use crate::state::EntityId;

/// One player decision, supplied while the battle awaits a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleCommand {
    /// Cast the spell in spellbook `spell` at `target`.
    Cast { spell: usize, target: EntityId },
    /// Skip casting; enemies still act and gauges still regenerate.
    Wait,
}

impl BattleCommand {
    pub fn cast(spell: usize, target: EntityId) -> Self {
        Self::Cast { spell, target }
    }
}
