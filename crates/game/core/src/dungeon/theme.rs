//! Depth-weighted theme selection.

use rand::Rng;

use crate::env::{ThemeDescriptor, ThemeId};

/// Primary theme plus an optional secondary one blended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThemeBlend {
    pub primary: ThemeId,
    pub secondary: Option<ThemeId>,
    /// Secondary weight as a percent of both weights. Zero without a secondary.
    pub secondary_percent: u32,
}

impl ThemeBlend {
    pub fn single(primary: ThemeId) -> Self {
        Self {
            primary,
            secondary: None,
            secondary_percent: 0,
        }
    }

    /// Picks the primary or the secondary theme for one roll in `0..100`.
    pub fn pick(&self, roll: u32) -> ThemeId {
        match self.secondary {
            Some(secondary) if roll < self.secondary_percent => secondary,
            _ => self.primary,
        }
    }
}

/// Samples the primary theme by curve weight, then a secondary among the
/// remaining positive-weight themes.
///
/// When every weight is zero the first theme is used alone. Returns `None`
/// only for an empty catalog.
pub fn select_themes<G: Rng>(
    themes: &[ThemeDescriptor],
    depth: u32,
    rng: &mut G,
) -> Option<ThemeBlend> {
    let first = themes.first()?;
    let weights: Vec<u64> = themes
        .iter()
        .map(|theme| u64::from(theme.curve.weight_at(depth)))
        .collect();

    let Some(primary) = sample(&weights, rng) else {
        return Some(ThemeBlend::single(first.id));
    };

    let mut remaining = weights.clone();
    remaining[primary] = 0;
    let blend = match sample(&remaining, rng) {
        Some(secondary) => {
            let (w1, w2) = (weights[primary], weights[secondary]);
            ThemeBlend {
                primary: themes[primary].id,
                secondary: Some(themes[secondary].id),
                secondary_percent: (w2 * 100 / (w1 + w2)) as u32,
            }
        }
        None => ThemeBlend::single(themes[primary].id),
    };
    Some(blend)
}

/// Weighted index draw, `None` when all weights are zero.
fn sample<G: Rng>(weights: &[u64], rng: &mut G) -> Option<usize> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for (index, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return Some(index);
        }
        roll -= weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ThemePalette, WeightCurve};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn theme(id: u16, curve: WeightCurve) -> ThemeDescriptor {
        ThemeDescriptor {
            id: ThemeId(id),
            name: format!("theme-{id}"),
            curve,
            difficulty_percent: 100,
            enemy_pool: Vec::new(),
            palette: ThemePalette::default(),
        }
    }

    #[test]
    fn zero_weight_themes_are_never_drawn() {
        let themes = vec![
            theme(0, WeightCurve::new(vec![(0, 10), (5, 0)])),
            theme(1, WeightCurve::new(vec![(0, 0), (5, 10)])),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let early = select_themes(&themes, 0, &mut rng).unwrap();
            assert_eq!(early, ThemeBlend::single(ThemeId(0)));
            let late = select_themes(&themes, 9, &mut rng).unwrap();
            assert_eq!(late, ThemeBlend::single(ThemeId(1)));
        }
    }

    #[test]
    fn overlapping_curves_blend() {
        let themes = vec![
            theme(0, WeightCurve::new(vec![(0, 10), (10, 0)])),
            theme(1, WeightCurve::new(vec![(0, 0), (10, 10)])),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let blend = select_themes(&themes, 5, &mut rng).unwrap();
        assert!(blend.secondary.is_some());
        assert_eq!(blend.secondary_percent, 50);
        assert_ne!(Some(blend.primary), blend.secondary);
    }

    #[test]
    fn all_zero_falls_back_to_first_theme() {
        let themes = vec![theme(4, WeightCurve::flat(0)), theme(5, WeightCurve::flat(0))];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            select_themes(&themes, 3, &mut rng),
            Some(ThemeBlend::single(ThemeId(4)))
        );
        assert_eq!(select_themes(&[], 3, &mut rng), None);
    }

    #[test]
    fn pick_respects_share() {
        let blend = ThemeBlend {
            primary: ThemeId(1),
            secondary: Some(ThemeId(2)),
            secondary_percent: 30,
        };
        assert_eq!(blend.pick(29), ThemeId(2));
        assert_eq!(blend.pick(30), ThemeId(1));
        assert_eq!(ThemeBlend::single(ThemeId(1)).pick(0), ThemeId(1));
    }
}
