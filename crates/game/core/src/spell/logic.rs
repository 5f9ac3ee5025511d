//! Conditional spell logic.
//!
//! The tree is a finite value: children are owned through `Box`/`Vec`, so a
//! node can never refer back to an ancestor. Size and depth are still bounded
//! at composition time so evaluation stays cheap.

use super::context::{BattleContext, Side};
use super::fragment::FragmentId;

/// Boolean test over a [`BattleContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    /// Health magnitude is strictly below the threshold.
    HealthBelow { side: Side, magnitude: u32 },

    /// Health magnitude is at or above the threshold.
    HealthAtLeast { side: Side, magnitude: u32 },

    /// Current gauge is strictly below `amount`.
    GaugeBelow { side: Side, amount: u32 },

    /// Current gauge is at or above `amount`.
    GaugeAtLeast { side: Side, amount: u32 },

    /// The health cell at `(row, col)` is zero. Out-of-range cells are never zero.
    CellIsZero { side: Side, row: u8, col: u8 },

    /// Battle turn counter reached `turn`.
    TurnAtLeast(u32),

    /// All predicates hold (vacuously true when empty).
    And(Vec<Predicate>),

    /// Any predicate holds (false when empty).
    Or(Vec<Predicate>),

    Not(Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, ctx: &BattleContext) -> bool {
        match self {
            Self::HealthBelow { side, magnitude } => ctx.view(*side).health.magnitude() < *magnitude,
            Self::HealthAtLeast { side, magnitude } => {
                ctx.view(*side).health.magnitude() >= *magnitude
            }
            Self::GaugeBelow { side, amount } => ctx.view(*side).gauge < *amount,
            Self::GaugeAtLeast { side, amount } => ctx.view(*side).gauge >= *amount,
            Self::CellIsZero { side, row, col } => ctx
                .view(*side)
                .health
                .get(usize::from(*row), usize::from(*col))
                .is_some_and(|cell| cell == 0),
            Self::TurnAtLeast(turn) => ctx.turn >= *turn,
            Self::And(all) => all.iter().all(|p| p.evaluate(ctx)),
            Self::Or(any) => any.iter().any(|p| p.evaluate(ctx)),
            Self::Not(inner) => !inner.evaluate(ctx),
        }
    }

    /// Number of predicate nodes, including this one.
    pub fn node_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Predicate::node_count).sum::<usize>()
            }
            Self::Not(inner) => 1 + inner.node_count(),
            _ => 1,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Predicate::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }
}

/// Node of a spell's logic tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionalNode {
    /// Fold the referenced fragment into the target.
    Leaf(FragmentId),

    /// Evaluate `predicate` and continue with exactly one branch.
    If {
        predicate: Predicate,
        then: Box<ConditionalNode>,
        otherwise: Box<ConditionalNode>,
    },

    /// Run every child left to right.
    Sequence(Vec<ConditionalNode>),
}

impl ConditionalNode {
    pub fn leaf(id: FragmentId) -> Self {
        Self::Leaf(id)
    }

    pub fn sequence(nodes: impl IntoIterator<Item = ConditionalNode>) -> Self {
        Self::Sequence(nodes.into_iter().collect())
    }

    /// Leaf sequence over `ids`, the logic of an unconditional spell.
    pub fn chain(ids: impl IntoIterator<Item = FragmentId>) -> Self {
        Self::sequence(ids.into_iter().map(Self::Leaf))
    }

    pub fn if_else(predicate: Predicate, then: ConditionalNode, otherwise: ConditionalNode) -> Self {
        Self::If {
            predicate,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// `if` without an else branch.
    pub fn when(predicate: Predicate, then: ConditionalNode) -> Self {
        Self::if_else(predicate, then, Self::Sequence(Vec::new()))
    }

    /// Total node count, predicates included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::If {
                predicate,
                then,
                otherwise,
            } => 1 + predicate.node_count() + then.node_count() + otherwise.node_count(),
            Self::Sequence(children) => {
                1 + children.iter().map(ConditionalNode::node_count).sum::<usize>()
            }
        }
    }

    /// Nesting depth; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::If {
                predicate,
                then,
                otherwise,
            } => 1 + predicate.depth().max(then.depth()).max(otherwise.depth()),
            Self::Sequence(children) => {
                1 + children.iter().map(ConditionalNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Every leaf in left-to-right order, regardless of which branches a cast
    /// would take.
    pub fn leaves(&self) -> Vec<FragmentId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<FragmentId>) {
        match self {
            Self::Leaf(id) => out.push(*id),
            Self::If {
                then, otherwise, ..
            } => {
                then.collect_leaves(out);
                otherwise.collect_leaves(out);
            }
            Self::Sequence(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Leaves reached under `ctx`, in evaluation order.
    pub fn reached_leaves(&self, ctx: &BattleContext) -> Vec<FragmentId> {
        let mut out = Vec::new();
        self.walk(ctx, &mut |id| out.push(id));
        out
    }

    /// Calls `visit` for every leaf reached under `ctx`, left to right.
    pub fn walk(&self, ctx: &BattleContext, visit: &mut impl FnMut(FragmentId)) {
        match self {
            Self::Leaf(id) => visit(*id),
            Self::If {
                predicate,
                then,
                otherwise,
            } => {
                if predicate.evaluate(ctx) {
                    then.walk(ctx, visit);
                } else {
                    otherwise.walk(ctx, visit);
                }
            }
            Self::Sequence(children) => {
                for child in children {
                    child.walk(ctx, visit);
                }
            }
        }
    }
}
