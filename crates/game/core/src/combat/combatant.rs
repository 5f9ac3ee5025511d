use crate::combat::SpellGauge;
use crate::env::{AppearanceTag, EnemyTemplateId};
use crate::matrix::Matrix;
use crate::spell::{CombatantView, FragmentInventory, Spell};
use crate::state::{EntityId, Position};

/// Type tag of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player,
    Enemy { template: EnemyTemplateId },
}

/// What a combatant casts from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Loadout {
    /// Player: collected fragments plus the spells composed from them.
    Fragments {
        inventory: FragmentInventory,
        spellbook: Vec<Spell>,
    },
    /// Enemy: a fixed spell list assigned at generation time.
    Spells(Vec<Spell>),
}

/// A participant in battles: health matrix, gauge, position and loadout.
///
/// # Invariants
///
/// - `health` cells stay within the configured [`crate::config::HealthBounds`]
/// - the combatant is defeated exactly when `health` is the zero matrix
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub kind: CombatantKind,
    pub health: Matrix,
    pub gauge: SpellGauge,
    pub position: Position,
    pub loadout: Loadout,
    pub appearance: Option<AppearanceTag>,
}

impl Combatant {
    pub fn player(health: Matrix, gauge: SpellGauge, inventory: FragmentInventory) -> Self {
        Self {
            id: EntityId::PLAYER,
            kind: CombatantKind::Player,
            health,
            gauge,
            position: Position::ORIGIN,
            loadout: Loadout::Fragments {
                inventory,
                spellbook: Vec::new(),
            },
            appearance: None,
        }
    }

    pub fn enemy(
        id: EntityId,
        template: EnemyTemplateId,
        health: Matrix,
        gauge: SpellGauge,
        spells: Vec<Spell>,
    ) -> Self {
        Self {
            id,
            kind: CombatantKind::Enemy { template },
            health,
            gauge,
            position: Position::ORIGIN,
            loadout: Loadout::Spells(spells),
            appearance: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_appearance(mut self, appearance: AppearanceTag) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CombatantKind::Player)
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_zero()
    }

    /// Castable spells: the spellbook for the player, the fixed list for enemies.
    pub fn spells(&self) -> &[Spell] {
        match &self.loadout {
            Loadout::Fragments { spellbook, .. } => spellbook,
            Loadout::Spells(spells) => spells,
        }
    }

    pub fn spell(&self, slot: usize) -> Option<&Spell> {
        self.spells().get(slot)
    }

    pub fn inventory(&self) -> Option<&FragmentInventory> {
        match &self.loadout {
            Loadout::Fragments { inventory, .. } => Some(inventory),
            Loadout::Spells(_) => None,
        }
    }

    pub fn inventory_mut(&mut self) -> Option<&mut FragmentInventory> {
        match &mut self.loadout {
            Loadout::Fragments { inventory, .. } => Some(inventory),
            Loadout::Spells(_) => None,
        }
    }

    /// Adds a spell to the player's spellbook. Returns the slot, or `None`
    /// for enemies whose spell list is fixed.
    pub fn learn_spell(&mut self, spell: Spell) -> Option<usize> {
        match &mut self.loadout {
            Loadout::Fragments { spellbook, .. } => {
                spellbook.push(spell);
                Some(spellbook.len() - 1)
            }
            Loadout::Spells(_) => None,
        }
    }

    /// Removes a spell from the player's spellbook.
    pub fn forget_spell(&mut self, slot: usize) -> Option<Spell> {
        match &mut self.loadout {
            Loadout::Fragments { spellbook, .. } if slot < spellbook.len() => {
                Some(spellbook.remove(slot))
            }
            _ => None,
        }
    }

    /// Snapshot used by spell predicates.
    pub fn view(&self) -> CombatantView {
        CombatantView {
            id: self.id,
            health: self.health,
            gauge: self.gauge.current(),
            gauge_max: self.gauge.maximum(),
        }
    }
}
