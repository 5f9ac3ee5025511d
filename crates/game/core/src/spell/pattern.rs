//! Relative target patterns.
//!
//! A pattern is a finite set of `(dx, dy)` offsets relative to the caster.
//! `(0, 0)` is never stored; the caster is affected only through the
//! explicit `includes_caster` flag. An empty offset set means the spell is
//! self-targeted.
//!
//! Derivation from a matrix maps each cell to a direction:
//!
//! | cell | direction | offset |
//! |------|-----------|--------|
//! | `a`  | north     | `(0, -1)` |
//! | `b`  | east      | `(1, 0)`  |
//! | `c`  | west      | `(-1, 0)` |
//! | `d`  | south     | `(0, 1)`  |
//!
//! A positive value `v` covers every tile at distance `1..=min(v, 3)`, a
//! negative value covers the single tile at distance `min(|v|, 3)`, zero
//! contributes nothing.

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::matrix::Matrix;

/// Relative tile offset from the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub const fn is_origin(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

const DIRECTIONS: [Offset; 4] = [
    Offset::new(0, -1),
    Offset::new(1, 0),
    Offset::new(-1, 0),
    Offset::new(0, 1),
];

/// Set of tiles a spell affects, relative to its caster.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetPattern {
    offsets: BTreeSet<Offset>,
    #[cfg_attr(feature = "serde", serde(default))]
    includes_caster: bool,
}

impl TargetPattern {
    /// The self-target pattern.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a pattern from offsets, dropping `(0, 0)`.
    pub fn new(offsets: impl IntoIterator<Item = Offset>) -> Self {
        Self {
            offsets: offsets.into_iter().filter(|o| !o.is_origin()).collect(),
            includes_caster: false,
        }
    }

    /// Marks the caster's own tile as affected.
    pub fn with_caster(mut self) -> Self {
        self.includes_caster = true;
        self
    }

    /// Derives a pattern from a matrix's cell values (see module docs).
    pub fn derive_from(matrix: &Matrix) -> Self {
        let mut offsets = BTreeSet::new();
        for (cell, dir) in matrix.cells().into_iter().zip(DIRECTIONS) {
            let reach = (cell.unsigned_abs().min(GameConfig::MAX_PATTERN_RANGE as u32)) as i32;
            if cell > 0 {
                for distance in 1..=reach {
                    offsets.insert(Offset::new(dir.dx * distance, dir.dy * distance));
                }
            } else if cell < 0 {
                offsets.insert(Offset::new(dir.dx * reach, dir.dy * reach));
            }
        }
        Self {
            offsets,
            includes_caster: false,
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            offsets: self.offsets.union(&other.offsets).copied().collect(),
            includes_caster: self.includes_caster || other.includes_caster,
        }
    }

    pub fn offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        self.offsets.iter().copied()
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.offsets.contains(&offset)
    }

    pub fn includes_caster(&self) -> bool {
        self.includes_caster
    }

    /// True when the spell affects only its caster.
    pub fn is_self_target(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of affected cells, used by the cost formula.
    pub fn cell_count(&self) -> usize {
        self.offsets.len() + usize::from(self.includes_caster)
    }
}

/// How a fragment changes the pattern of the spell it is composed into.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternModifier {
    /// Union with the pattern derived from the fragment's matrix.
    #[default]
    Derive,
    /// Union with an explicit pattern.
    Union(TargetPattern),
    /// Replace everything accumulated so far.
    Override(TargetPattern),
    /// Reset to the self-target pattern.
    SelfOnly,
}

impl PatternModifier {
    /// Applies this modifier to the pattern accumulated so far.
    pub fn apply(&self, current: TargetPattern, matrix: &Matrix) -> TargetPattern {
        match self {
            Self::Derive => current.union(&TargetPattern::derive_from(matrix)),
            Self::Union(pattern) => current.union(pattern),
            Self::Override(pattern) => pattern.clone(),
            Self::SelfOnly => TargetPattern::empty(),
        }
    }
}
