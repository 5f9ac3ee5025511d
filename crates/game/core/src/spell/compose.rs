//! Composition of fragments into castable spells, and the cast cost formula.

use super::error::CompositionError;
use super::fragment::{FragmentId, SpellFragment};
use super::logic::ConditionalNode;
use super::pattern::TargetPattern;
use crate::config::{CompositionLimits, CostWeights};

/// A composed spell: resolved fragments, logic tree, final pattern and cost.
///
/// Built once at composition time, then cast any number of times.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    fragments: Vec<SpellFragment>,
    logic: ConditionalNode,
    pattern: TargetPattern,
    cost: u32,
}

impl Spell {
    pub fn fragments(&self) -> &[SpellFragment] {
        &self.fragments
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&SpellFragment> {
        self.fragments.iter().find(|fragment| fragment.id == id)
    }

    pub fn logic(&self) -> &ConditionalNode {
        &self.logic
    }

    pub fn pattern(&self) -> &TargetPattern {
        &self.pattern
    }

    /// Gauge cost of one cast.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Returns a copy with every fragment matrix scaled by `percent / 100`.
    ///
    /// The target pattern is kept as composed; only potency and cost change.
    pub fn with_potency(&self, percent: u32, weights: &CostWeights) -> Self {
        let fragments: Vec<_> = self.fragments.iter().map(|f| f.scaled(percent)).collect();
        let cost = cast_cost(&fragments, &self.logic, &self.pattern, weights);
        Self {
            fragments,
            logic: self.logic.clone(),
            pattern: self.pattern.clone(),
            cost,
        }
    }
}

/// Composes `fragments` under `logic` into a [`Spell`].
///
/// # Errors
///
/// - [`CompositionError::TreeTooLarge`] if the tree exceeds `limits`
/// - [`CompositionError::Empty`] if no leaf is reachable
/// - [`CompositionError::UnknownFragment`] if a leaf references a fragment not
///   in `fragments`
///
/// Fragments that no leaf references are dropped. When the same id is supplied
/// twice the first definition wins.
pub fn compose_spell(
    fragments: &[SpellFragment],
    logic: ConditionalNode,
    limits: &CompositionLimits,
    weights: &CostWeights,
) -> Result<Spell, CompositionError> {
    let nodes = logic.node_count();
    let depth = logic.depth();
    if nodes > limits.max_nodes || depth > limits.max_depth {
        return Err(CompositionError::TreeTooLarge {
            nodes,
            depth,
            max_nodes: limits.max_nodes,
            max_depth: limits.max_depth,
        });
    }

    let leaves = logic.leaves();
    if leaves.is_empty() {
        return Err(CompositionError::Empty);
    }
    if let Some(unknown) = leaves
        .iter()
        .find(|id| !fragments.iter().any(|fragment| fragment.id == **id))
    {
        return Err(CompositionError::UnknownFragment(*unknown));
    }

    let mut used: Vec<SpellFragment> = Vec::new();
    for fragment in fragments {
        if leaves.contains(&fragment.id) && !used.iter().any(|f| f.id == fragment.id) {
            used.push(fragment.clone());
        }
    }

    let pattern = used.iter().fold(TargetPattern::empty(), |pattern, fragment| {
        fragment.pattern.apply(pattern, &fragment.matrix)
    });
    let cost = cast_cost(&used, &logic, &pattern, weights);

    Ok(Spell {
        fragments: used,
        logic,
        pattern,
        cost,
    })
}

/// Cost formula, summed over every leaf occurrence:
///
/// `base + Σ (op_weight + cost_weight + magnitude × per_magnitude)
///  + pattern_cells × per_pattern_cell`
///
/// Every term is non-negative, so the cost is monotonic in the operation
/// weights, the pattern size and the matrix magnitude.
fn cast_cost(
    fragments: &[SpellFragment],
    logic: &ConditionalNode,
    pattern: &TargetPattern,
    weights: &CostWeights,
) -> u32 {
    let leaves_cost = logic
        .leaves()
        .into_iter()
        .filter_map(|id| fragments.iter().find(|f| f.id == id))
        .fold(0u32, |acc, fragment| {
            acc.saturating_add(weights.operation_weight(fragment.operation))
                .saturating_add(fragment.cost_weight)
                .saturating_add(fragment.matrix.magnitude().saturating_mul(weights.per_magnitude))
        });
    let pattern_cost = (pattern.cell_count() as u32).saturating_mul(weights.per_pattern_cell);
    weights
        .base
        .saturating_add(leaves_cost)
        .saturating_add(pattern_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Matrix, Operation};
    use crate::spell::logic::Predicate;
    use crate::spell::pattern::{Offset, PatternModifier};

    fn fragment(id: u16, matrix: Matrix, op: Operation) -> SpellFragment {
        SpellFragment::new(FragmentId(id), matrix, op)
    }

    fn compose(fragments: &[SpellFragment], logic: ConditionalNode) -> Result<Spell, CompositionError> {
        compose_spell(
            fragments,
            logic,
            &CompositionLimits::default(),
            &CostWeights::default(),
        )
    }

    #[test]
    fn rejects_unknown_fragment() {
        let frags = [fragment(1, Matrix::IDENTITY, Operation::Add)];
        let err = compose(&frags, ConditionalNode::chain([FragmentId(1), FragmentId(9)]));
        assert_eq!(err, Err(CompositionError::UnknownFragment(FragmentId(9))));
    }

    #[test]
    fn rejects_empty_logic() {
        let frags = [fragment(1, Matrix::IDENTITY, Operation::Add)];
        assert_eq!(
            compose(&frags, ConditionalNode::sequence([])),
            Err(CompositionError::Empty)
        );
    }

    #[test]
    fn rejects_oversized_tree() {
        let frags = [fragment(1, Matrix::IDENTITY, Operation::Add)];
        let mut deep = ConditionalNode::leaf(FragmentId(1));
        for _ in 0..10 {
            deep = ConditionalNode::sequence([deep]);
        }
        assert!(matches!(
            compose(&frags, deep),
            Err(CompositionError::TreeTooLarge { depth: 11, .. })
        ));
    }

    #[test]
    fn cost_follows_formula() {
        let frags = [fragment(1, Matrix::new(1, 0, 0, 0), Operation::Subtract)
            .with_pattern(PatternModifier::Override(TargetPattern::new([Offset::new(0, 1)])))];
        let spell = compose(&frags, ConditionalNode::leaf(FragmentId(1))).unwrap();
        // base 1 + subtract 1 + magnitude 1 + one pattern cell
        assert_eq!(spell.cost(), 4);
    }

    #[test]
    fn heavier_operations_cost_more() {
        let m = Matrix::new(1, 1, 0, 0);
        let cheap = compose(&[fragment(1, m, Operation::Add)], ConditionalNode::leaf(FragmentId(1)))
            .unwrap();
        let dot = compose(
            &[fragment(1, m, Operation::DotProduct)],
            ConditionalNode::leaf(FragmentId(1)),
        )
        .unwrap();
        let mul = compose(
            &[fragment(1, m, Operation::Multiply)],
            ConditionalNode::leaf(FragmentId(1)),
        )
        .unwrap();
        assert!(dot.cost() > cheap.cost());
        assert!(mul.cost() > cheap.cost());
    }

    #[test]
    fn bigger_matrices_and_patterns_cost_more() {
        let small = compose(
            &[fragment(1, Matrix::new(1, 0, 0, 0), Operation::Subtract)],
            ConditionalNode::leaf(FragmentId(1)),
        )
        .unwrap();
        let large = compose(
            &[fragment(1, Matrix::new(3, 0, 0, 0), Operation::Subtract)],
            ConditionalNode::leaf(FragmentId(1)),
        )
        .unwrap();
        assert!(large.pattern().cell_count() > small.pattern().cell_count());
        assert!(large.cost() > small.cost());
    }

    #[test]
    fn unreferenced_fragments_are_dropped_from_pattern() {
        let frags = [
            fragment(1, Matrix::new(1, 0, 0, 0), Operation::Subtract),
            fragment(2, Matrix::new(0, 3, 0, 0), Operation::Subtract),
        ];
        let spell = compose(&frags, ConditionalNode::leaf(FragmentId(1))).unwrap();
        assert_eq!(spell.fragments().len(), 1);
        assert_eq!(spell.pattern().cell_count(), 1);
    }

    #[test]
    fn conditional_leaves_all_count_toward_cost() {
        let frags = [
            fragment(1, Matrix::new(1, 0, 0, 0), Operation::Subtract),
            fragment(2, Matrix::new(1, 0, 0, 0), Operation::Add),
        ];
        let single = compose(&frags, ConditionalNode::leaf(FragmentId(1))).unwrap();
        let branching = compose(
            &frags,
            ConditionalNode::if_else(
                Predicate::TurnAtLeast(2),
                ConditionalNode::leaf(FragmentId(1)),
                ConditionalNode::leaf(FragmentId(2)),
            ),
        )
        .unwrap();
        assert!(branching.cost() > single.cost());
    }

    #[test]
    fn potency_scales_matrices_and_cost() {
        let frags = [fragment(1, Matrix::new(2, 0, 0, 2), Operation::Subtract)];
        let spell = compose(&frags, ConditionalNode::leaf(FragmentId(1))).unwrap();
        let boosted = spell.with_potency(200, &CostWeights::default());
        assert_eq!(boosted.fragments()[0].matrix, Matrix::new(4, 0, 0, 4));
        assert_eq!(boosted.pattern(), spell.pattern());
        assert!(boosted.cost() > spell.cost());
    }
}
