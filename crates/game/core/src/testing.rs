//! Shared fixtures for unit tests.

use crate::config::GameConfig;
use crate::env::{
    AppearanceTag, CatalogSnapshot, EnemyTemplate, EnemyTemplateId, Env, GameEnv, PcgRng,
    SpellRecipe, ThemeDescriptor, ThemeId, ThemePalette, WeightCurve,
};
use crate::matrix::{Matrix, Operation};
use crate::spell::{
    ConditionalNode, FragmentId, Offset, PatternModifier, Predicate, Side, SpellFragment,
    TargetPattern,
};

pub fn fragments() -> Vec<SpellFragment> {
    vec![
        SpellFragment::new(FragmentId(1), Matrix::new(1, 0, 0, 0), Operation::Subtract),
        SpellFragment::new(FragmentId(2), Matrix::new(0, 1, 0, 1), Operation::Subtract),
        SpellFragment::new(FragmentId(3), Matrix::splat(1), Operation::Subtract)
            .with_pattern(PatternModifier::Override(TargetPattern::new([Offset::new(0, 1)]))),
        SpellFragment::new(FragmentId(4), Matrix::splat(1), Operation::Add)
            .with_pattern(PatternModifier::SelfOnly),
        SpellFragment::new(FragmentId(5), Matrix::new(1, 0, 0, 1), Operation::DotProduct)
            .with_cost_weight(2),
    ]
}

fn palette(base: u32) -> ThemePalette {
    ThemePalette {
        floor: AppearanceTag(base),
        wall: AppearanceTag(base + 1),
        door: AppearanceTag(base + 2),
        item: AppearanceTag(base + 3),
        spawn: AppearanceTag(base + 4),
        stairs: AppearanceTag(base + 5),
        enemy: AppearanceTag(base + 6),
    }
}

pub fn themes() -> Vec<ThemeDescriptor> {
    vec![
        ThemeDescriptor {
            id: ThemeId(0),
            name: "crypt".into(),
            curve: WeightCurve::new(vec![(0, 100), (10, 20)]),
            difficulty_percent: 100,
            enemy_pool: vec![EnemyTemplateId(0), EnemyTemplateId(1)],
            palette: palette(100),
        },
        ThemeDescriptor {
            id: ThemeId(1),
            name: "caverns".into(),
            curve: WeightCurve::new(vec![(0, 0), (5, 60), (20, 100)]),
            difficulty_percent: 120,
            enemy_pool: vec![EnemyTemplateId(1), EnemyTemplateId(2)],
            palette: palette(200),
        },
    ]
}

fn recipe(ids: &[u16]) -> SpellRecipe {
    SpellRecipe {
        fragments: ids.iter().copied().map(FragmentId).collect(),
        logic: None,
    }
}

pub fn enemies() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate {
            id: EnemyTemplateId(0),
            name: "skeleton".into(),
            health_shape: Matrix::splat(1),
            gauge_max: 12,
            gauge_regen: 2,
            spells: vec![recipe(&[1]), recipe(&[2]), recipe(&[3])],
            appearance: None,
        },
        EnemyTemplate {
            id: EnemyTemplateId(1),
            name: "bat".into(),
            health_shape: Matrix::new(2, 1, 1, 0),
            gauge_max: 8,
            gauge_regen: 3,
            spells: vec![
                recipe(&[1]),
                SpellRecipe {
                    fragments: vec![FragmentId(3), FragmentId(4)],
                    logic: Some(ConditionalNode::if_else(
                        Predicate::HealthBelow {
                            side: Side::Caster,
                            magnitude: 4,
                        },
                        ConditionalNode::leaf(FragmentId(4)),
                        ConditionalNode::leaf(FragmentId(3)),
                    )),
                },
            ],
            appearance: Some(AppearanceTag(900)),
        },
        EnemyTemplate {
            id: EnemyTemplateId(2),
            name: "golem".into(),
            health_shape: Matrix::new(1, 2, 2, 1),
            gauge_max: 20,
            gauge_regen: 1,
            spells: vec![recipe(&[2]), recipe(&[5, 1])],
            appearance: None,
        },
    ]
}

pub fn catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(fragments(), themes(), enemies())
}

pub fn env<'a>(catalog: &'a CatalogSnapshot, config: &'a GameConfig) -> GameEnv<'a> {
    Env::with_all(catalog, catalog, &PcgRng, config).into_game_env()
}
