//! End-to-end properties exercised through the public API only.
use proptest::prelude::*;

use game_core::config::{CompositionLimits, CostWeights, HealthBounds};
use game_core::matrix::apply;
use game_core::{
    AppearanceTag, Battle, BattleCommand, BattleContext, CatalogSnapshot, Combatant,
    ConditionalNode, EnemyTemplate, EnemyTemplateId, EntityId, Env, FragmentId,
    FragmentInventory, GameConfig, Matrix, Offset, Operation, PatternModifier, PcgRng, RunState,
    SpellFragment, SpellGauge, SpellRecipe, TargetPattern, ThemeDescriptor, ThemeId, ThemePalette,
    WeightCurve, apply_effect, compose_spell, deserialize_run_state, serialize_run_state,
    try_cast,
};

fn catalog() -> CatalogSnapshot {
    let fragments = vec![
        SpellFragment::new(FragmentId(1), Matrix::new(1, 0, 0, 0), Operation::Subtract)
            .with_pattern(PatternModifier::Override(TargetPattern::new([Offset::new(0, 1)]))),
        SpellFragment::new(FragmentId(2), Matrix::splat(1), Operation::Subtract),
    ];
    let palette = ThemePalette {
        floor: AppearanceTag(1),
        wall: AppearanceTag(2),
        door: AppearanceTag(3),
        item: AppearanceTag(4),
        spawn: AppearanceTag(5),
        stairs: AppearanceTag(6),
        enemy: AppearanceTag(7),
    };
    let themes = vec![ThemeDescriptor {
        id: ThemeId(0),
        name: "vault".into(),
        curve: WeightCurve::flat(1),
        difficulty_percent: 100,
        enemy_pool: vec![EnemyTemplateId(0)],
        palette,
    }];
    let enemies = vec![EnemyTemplate {
        id: EnemyTemplateId(0),
        name: "slime".into(),
        health_shape: Matrix::splat(1),
        gauge_max: 6,
        gauge_regen: 1,
        spells: vec![SpellRecipe {
            fragments: vec![FragmentId(2)],
            logic: None,
        }],
        appearance: None,
    }];
    CatalogSnapshot::new(fragments, themes, enemies)
}

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.player.starting_fragments = vec![(FragmentId(1), 1), (FragmentId(2), 1)];
    config
}

fn enemy(health: Matrix) -> Combatant {
    Combatant::enemy(
        EntityId(1),
        EnemyTemplateId(0),
        health,
        SpellGauge::full(5, 1),
        Vec::new(),
    )
}

#[test]
fn subtract_fragment_hits_a_single_cell() {
    let fragment = catalog().fragments[0].clone();
    let spell = compose_spell(
        &[fragment],
        ConditionalNode::leaf(FragmentId(1)),
        &CompositionLimits::default(),
        &CostWeights::default(),
    )
    .unwrap();
    let player = Combatant::player(Matrix::splat(5), SpellGauge::full(20, 2), FragmentInventory::new());
    let target = enemy(Matrix::splat(2));
    let context = BattleContext::new(player.view(), target.view(), 1);

    let after = apply_effect(target.health, &spell, &context, &HealthBounds::default());
    assert_eq!(after, Matrix::new(1, 2, 2, 2));
    assert!(spell.pattern().contains(Offset::new(0, 1)));
}

fn non_negative_matrix() -> impl Strategy<Value = Matrix> {
    // Half of i32::MAX keeps A + B clear of saturation.
    let cell = 0..=i32::MAX / 2;
    (cell.clone(), cell.clone(), cell.clone(), cell)
        .prop_map(|(a, b, c, d)| Matrix::new(a, b, c, d))
}

fn any_matrix() -> impl Strategy<Value = Matrix> {
    any::<[i32; 4]>().prop_map(Matrix::from_cells)
}

proptest! {
    #[test]
    fn add_then_subtract_restores_non_negative_operands(
        a in non_negative_matrix(),
        b in non_negative_matrix(),
    ) {
        let sum = apply(Operation::Add, a, b);
        prop_assert_eq!(apply(Operation::Subtract, sum, b), a);
    }

    #[test]
    fn unaffordable_cast_changes_nothing(
        health in any_matrix(),
        shortfall in 1u32..=u32::MAX,
        regen in any::<u32>(),
        use_chain in any::<bool>(),
    ) {
        let logic = if use_chain {
            ConditionalNode::chain([FragmentId(1), FragmentId(2)])
        } else {
            ConditionalNode::leaf(FragmentId(2))
        };
        let spell = compose_spell(
            &catalog().fragments,
            logic,
            &CompositionLimits::default(),
            &CostWeights::default(),
        )
        .unwrap();
        prop_assume!(spell.cost() > 0);

        let current = spell.cost().saturating_sub(shortfall);
        let mut caster = enemy(health);
        caster.gauge = SpellGauge::new(current, spell.cost(), regen);
        let before = caster.clone();

        prop_assert!(try_cast(&mut caster, &spell, EntityId::PLAYER).is_err());
        prop_assert_eq!(caster, before);
    }
}

#[test]
fn waiting_battles_end_within_the_round_limit() {
    let catalog = catalog();
    let config = config();
    let env = Env::with_all(&catalog, &catalog, &PcgRng, &config).into_game_env();

    for seed in 0..16u64 {
        let state = RunState::new(seed, env).unwrap();
        let Some(foe) = state.level.enemies.first().cloned() else {
            continue;
        };
        let mut battle = Battle::new(seed, state.player.clone(), [foe]).unwrap();

        let mut commands = 0;
        while !battle.is_finished() {
            battle.advance(BattleCommand::Wait, env).unwrap();
            commands += 1;
            assert!(commands <= config.battle.max_rounds);
        }
    }
}

#[test]
fn run_survives_a_save_round_trip() {
    let catalog = catalog();
    let config = config();
    let env = Env::with_all(&catalog, &catalog, &PcgRng, &config).into_game_env();

    let mut state = RunState::new(42, env).unwrap();
    state
        .compose_spell(&[FragmentId(1), FragmentId(2)], None, env)
        .unwrap();

    let blob = serialize_run_state(&state).unwrap();
    assert_eq!(deserialize_run_state(&blob).unwrap(), state);
}
