//! Theme and enemy catalog types consumed by the dungeon generator.

use std::fmt;

use crate::matrix::Matrix;
use crate::spell::{ConditionalNode, FragmentId};

/// Opaque appearance id, resolved to glyphs/sprites by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppearanceTag(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemeId(pub u16);

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "theme:{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplateId(pub u16);

impl fmt::Display for EnemyTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy:{}", self.0)
    }
}

/// Malformed weight curve, reported by catalog loaders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WeightCurveError {
    #[error("weight curve has no keys")]
    Empty,

    #[error("weight curve must start at depth 0 (first key is at depth {0})")]
    MissingOrigin(u32),

    #[error("weight curve depths must strictly increase (key {index})")]
    NotIncreasing { index: usize },
}

/// Piecewise-linear blend weight over depth.
///
/// Keys are `(depth, weight)` pairs. Between keys the weight is linearly
/// interpolated (integer division, rounding toward the earlier key); past
/// the last key it stays at the last weight.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightCurve {
    keys: Vec<(u32, u32)>,
}

impl WeightCurve {
    pub fn new(keys: Vec<(u32, u32)>) -> Self {
        Self { keys }
    }

    /// A curve with the same weight at every depth.
    pub fn flat(weight: u32) -> Self {
        Self::new(vec![(0, weight)])
    }

    pub fn keys(&self) -> &[(u32, u32)] {
        &self.keys
    }

    pub fn validate(&self) -> Result<(), WeightCurveError> {
        let Some(&(first, _)) = self.keys.first() else {
            return Err(WeightCurveError::Empty);
        };
        if first != 0 {
            return Err(WeightCurveError::MissingOrigin(first));
        }
        for (index, pair) in self.keys.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(WeightCurveError::NotIncreasing { index: index + 1 });
            }
        }
        Ok(())
    }

    /// Blend weight at `depth`. Empty curves weigh zero everywhere.
    pub fn weight_at(&self, depth: u32) -> u32 {
        let Some(&(_, first_weight)) = self.keys.first() else {
            return 0;
        };
        let mut weight = first_weight;
        for pair in self.keys.windows(2) {
            let ((d0, w0), (d1, w1)) = (pair[0], pair[1]);
            if depth < d0 {
                break;
            }
            if depth >= d1 {
                weight = w1;
                continue;
            }
            let span = i64::from(d1 - d0);
            let delta = i64::from(w1) - i64::from(w0);
            let offset = i64::from(depth - d0);
            weight = (i64::from(w0) + delta * offset / span) as u32;
            break;
        }
        weight
    }
}

/// Appearance tags a theme assigns to each cell role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemePalette {
    pub floor: AppearanceTag,
    pub wall: AppearanceTag,
    pub door: AppearanceTag,
    pub item: AppearanceTag,
    pub spawn: AppearanceTag,
    pub stairs: AppearanceTag,
    pub enemy: AppearanceTag,
}

/// Depth-scoped visual and difficulty profile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemeDescriptor {
    pub id: ThemeId,
    pub name: String,
    pub curve: WeightCurve,
    /// Spell potency multiplier in percent (100 = unchanged).
    pub difficulty_percent: u32,
    pub enemy_pool: Vec<EnemyTemplateId>,
    pub palette: ThemePalette,
}

/// Fragments plus optional logic an enemy composes into one spell.
///
/// Without explicit logic the fragments are chained left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellRecipe {
    pub fragments: Vec<FragmentId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub logic: Option<ConditionalNode>,
}

impl SpellRecipe {
    pub fn logic(&self) -> ConditionalNode {
        self.logic
            .clone()
            .unwrap_or_else(|| ConditionalNode::chain(self.fragments.iter().copied()))
    }
}

/// Catalog blueprint for an enemy type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyTemplateId,
    pub name: String,
    /// Relative distribution of the health budget over the four cells.
    /// Cells must be non-negative with a positive sum.
    pub health_shape: Matrix,
    pub gauge_max: u32,
    pub gauge_regen: u32,
    /// Recipes ordered from weakest to strongest; deeper levels unlock more.
    pub spells: Vec<SpellRecipe>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub appearance: Option<AppearanceTag>,
}

/// Read-only theme and enemy catalog, loaded once at startup.
pub trait ThemeOracle: Send + Sync {
    /// Themes in catalog order (ascending id).
    fn themes(&self) -> &[ThemeDescriptor];

    fn enemy_template(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate>;

    fn theme(&self, id: ThemeId) -> Option<&ThemeDescriptor> {
        self.themes().iter().find(|theme| theme.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_keys() {
        let curve = WeightCurve::new(vec![(0, 10), (10, 0), (20, 50)]);
        assert_eq!(curve.weight_at(0), 10);
        assert_eq!(curve.weight_at(5), 5);
        assert_eq!(curve.weight_at(10), 0);
        assert_eq!(curve.weight_at(15), 25);
        assert_eq!(curve.weight_at(500), 50);
    }

    #[test]
    fn validation_catches_malformed_curves() {
        assert_eq!(WeightCurve::default().validate(), Err(WeightCurveError::Empty));
        assert_eq!(
            WeightCurve::new(vec![(3, 1)]).validate(),
            Err(WeightCurveError::MissingOrigin(3))
        );
        assert_eq!(
            WeightCurve::new(vec![(0, 1), (5, 2), (5, 3)]).validate(),
            Err(WeightCurveError::NotIncreasing { index: 2 })
        );
        assert!(WeightCurve::flat(4).validate().is_ok());
    }

    #[test]
    fn recipe_without_logic_chains_fragments() {
        let recipe = SpellRecipe {
            fragments: vec![FragmentId(3), FragmentId(1)],
            logic: None,
        };
        assert_eq!(recipe.logic().leaves(), vec![FragmentId(3), FragmentId(1)]);
    }
}
