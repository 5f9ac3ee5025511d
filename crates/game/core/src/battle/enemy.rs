//! Enemy spell selection.

use crate::combat::Combatant;
use crate::env::{RngOracle, roll_seed};

/// Roll context for spell selection; other per-enemy rolls use other values.
const SPELL_ROLL: u32 = 0;

/// Picks uniformly among the spells the enemy can currently afford.
///
/// Returns the spell slot, or `None` when nothing is affordable (the enemy
/// waits). The roll depends only on `(battle_seed, round, enemy id)`.
pub fn choose_spell<R>(enemy: &Combatant, battle_seed: u64, round: u32, rng: &R) -> Option<usize>
where
    R: RngOracle + ?Sized,
{
    let affordable: Vec<usize> = enemy
        .spells()
        .iter()
        .enumerate()
        .filter(|(_, spell)| enemy.gauge.can_afford(spell.cost()))
        .map(|(slot, _)| slot)
        .collect();

    let seed = roll_seed(battle_seed, round, enemy.id.0, SPELL_ROLL);
    rng.pick_index(seed, affordable.len())
        .map(|index| affordable[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::SpellGauge;
    use crate::config::{CompositionLimits, CostWeights};
    use crate::env::{EnemyTemplateId, PcgRng};
    use crate::matrix::{Matrix, Operation};
    use crate::spell::{ConditionalNode, FragmentId, Spell, SpellFragment, compose_spell};
    use crate::state::EntityId;

    fn spell_of(magnitude: i32) -> Spell {
        let fragment = SpellFragment::new(FragmentId(1), Matrix::splat(magnitude), Operation::Subtract);
        compose_spell(
            &[fragment],
            ConditionalNode::leaf(FragmentId(1)),
            &CompositionLimits::default(),
            &CostWeights::default(),
        )
        .unwrap()
    }

    fn enemy(gauge: u32, spells: Vec<Spell>) -> Combatant {
        Combatant::enemy(
            EntityId(4),
            EnemyTemplateId(0),
            Matrix::splat(3),
            SpellGauge::new(gauge, 100, 1),
            spells,
        )
    }

    #[test]
    fn waits_when_nothing_is_affordable() {
        let enemy = enemy(0, vec![spell_of(1)]);
        assert_eq!(choose_spell(&enemy, 9, 1, &PcgRng), None);
    }

    #[test]
    fn only_picks_affordable_spells() {
        let cheap = spell_of(1);
        let expensive = spell_of(20);
        let gauge = cheap.cost();
        let enemy = enemy(gauge, vec![expensive, cheap]);
        for round in 1..50 {
            assert_eq!(choose_spell(&enemy, 9, round, &PcgRng), Some(1));
        }
    }

    #[test]
    fn selection_is_reproducible() {
        let enemy = enemy(100, vec![spell_of(1), spell_of(2), spell_of(3)]);
        for round in 1..20 {
            assert_eq!(
                choose_spell(&enemy, 77, round, &PcgRng),
                choose_spell(&enemy, 77, round, &PcgRng)
            );
        }
    }
}
