use super::*;
use crate::combat::SpellGauge;
use crate::config::{CompositionLimits, CostWeights};
use crate::env::{EnemyTemplateId, GameEnv, PcgRng};
use crate::error::GameError;
use crate::matrix::{Matrix, Operation};
use crate::spell::{
    ConditionalNode, FragmentId, FragmentInventory, Offset, PatternModifier, SpellFragment,
    TargetPattern, compose_spell,
};
use crate::state::Position;

fn env(config: &GameConfig) -> GameEnv<'_> {
    let rng: &dyn RngOracle = &PcgRng;
    Env::new(None, None, Some(rng), config)
}

fn spell(matrix: Matrix, operation: Operation, pattern: PatternModifier) -> Spell {
    let fragment = SpellFragment::new(FragmentId(1), matrix, operation).with_pattern(pattern);
    compose_spell(
        &[fragment],
        ConditionalNode::leaf(FragmentId(1)),
        &CompositionLimits::default(),
        &CostWeights::default(),
    )
    .unwrap()
}

fn single_target(matrix: Matrix) -> Spell {
    spell(
        matrix,
        Operation::Subtract,
        PatternModifier::Override(TargetPattern::new([Offset::new(0, 1)])),
    )
}

fn player(spells: Vec<Spell>) -> Combatant {
    let mut player = Combatant::player(
        Matrix::splat(12),
        SpellGauge::full(40, 10),
        FragmentInventory::new(),
    );
    for spell in spells {
        player.learn_spell(spell);
    }
    player
}

fn enemy(id: u32, health: Matrix, spells: Vec<Spell>, gauge: SpellGauge) -> Combatant {
    Combatant::enemy(EntityId(id), EnemyTemplateId(0), health, gauge, spells)
        .with_position(Position::new(0, id as i32))
}

fn idle_enemy(id: u32, health: Matrix) -> Combatant {
    enemy(id, health, Vec::new(), SpellGauge::full(0, 0))
}

#[test]
fn encounter_is_validated() {
    assert_eq!(
        Battle::new(1, player(vec![]), Vec::new()).unwrap_err(),
        BattleError::EmptyEncounter
    );

    let crowd = (1..=9).map(|id| idle_enemy(id, Matrix::splat(1)));
    assert_eq!(
        Battle::new(1, player(vec![]), crowd).unwrap_err(),
        BattleError::EncounterTooLarge { count: 9, max: 8 }
    );

    let twins = [idle_enemy(3, Matrix::splat(1)), idle_enemy(3, Matrix::splat(1))];
    assert_eq!(
        Battle::new(1, player(vec![]), twins).unwrap_err(),
        BattleError::DuplicateCombatant(EntityId(3))
    );
}

#[test]
fn rejected_commands_consume_no_round() {
    let config = GameConfig::default();
    let mut battle = Battle::new(
        7,
        player(vec![single_target(Matrix::splat(1))]),
        [idle_enemy(1, Matrix::splat(3)), idle_enemy(2, Matrix::ZERO)],
    )
    .unwrap();
    let before = battle.clone();

    assert_eq!(
        battle.advance(BattleCommand::cast(4, EntityId(1)), env(&config)),
        Err(BattleError::UnknownSpell { slot: 4 })
    );
    assert_eq!(
        battle.advance(BattleCommand::cast(0, EntityId(99)), env(&config)),
        Err(BattleError::UnknownTarget(EntityId(99)))
    );
    assert_eq!(
        battle.advance(BattleCommand::cast(0, EntityId(2)), env(&config)),
        Err(BattleError::TargetDefeated(EntityId(2)))
    );
    assert_eq!(battle, before);
    assert_eq!(battle.phase(), BattlePhase::AwaitingCommand);
}

#[test]
fn insufficient_gauge_is_recoverable() {
    let config = GameConfig::default();
    let heavy = single_target(Matrix::splat(30));
    let mut battle = Battle::new(
        7,
        player(vec![heavy.clone()]),
        [idle_enemy(1, Matrix::splat(3))],
    )
    .unwrap();
    let before = battle.clone();

    let err = battle
        .advance(BattleCommand::cast(0, EntityId(1)), env(&config))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::InsufficientGauge {
            required: heavy.cost(),
            available: 40
        }
    );
    assert!(err.severity().is_recoverable());
    assert_eq!(battle, before);
}

#[test]
fn victory_ends_the_battle_before_enemies_act() {
    let config = GameConfig::default();
    let killer = enemy(
        1,
        Matrix::splat(2),
        vec![single_target(Matrix::splat(1))],
        SpellGauge::full(100, 0),
    );
    let mut battle = Battle::new(
        3,
        player(vec![single_target(Matrix::splat(2))]),
        [killer],
    )
    .unwrap();

    let outcome = battle
        .advance(BattleCommand::cast(0, EntityId(1)), env(&config))
        .unwrap();
    assert_eq!(outcome.status, BattleStatus::Victory);
    assert_eq!(outcome.round, 1);
    assert!(outcome.events.contains(&BattleEvent::Defeated {
        entity: EntityId(1)
    }));
    assert_eq!(battle.player().health, Matrix::splat(12));
    assert!(battle.is_finished());
    assert_eq!(
        battle.advance(BattleCommand::Wait, env(&config)),
        Err(BattleError::Finished)
    );
}

#[test]
fn player_defeat_ends_the_battle() {
    let config = GameConfig::default();
    let killer = enemy(
        1,
        Matrix::splat(5),
        vec![single_target(Matrix::splat(12))],
        SpellGauge::full(200, 0),
    );
    let mut battle = Battle::new(3, player(vec![]), [killer]).unwrap();

    let outcome = battle.advance(BattleCommand::Wait, env(&config)).unwrap();
    assert_eq!(outcome.status, BattleStatus::Defeat);
    assert_eq!(
        outcome.events.last(),
        Some(&BattleEvent::Finished {
            status: BattleStatus::Defeat,
            reason: FinishReason::PlayerDefeated
        })
    );
    assert!(battle.player().is_defeated());
}

#[test]
fn round_limit_forces_a_decision() {
    let mut config = GameConfig::default();
    config.battle.max_rounds = 5;
    let mut battle = Battle::new(3, player(vec![]), [idle_enemy(1, Matrix::splat(3))]).unwrap();

    for round in 1..5 {
        let outcome = battle.advance(BattleCommand::Wait, env(&config)).unwrap();
        assert_eq!(outcome.status, BattleStatus::Ongoing);
        assert_eq!(outcome.round, round);
    }
    let last = battle.advance(BattleCommand::Wait, env(&config)).unwrap();
    assert_eq!(last.status, BattleStatus::Defeat);
    assert!(last.events.contains(&BattleEvent::Finished {
        status: BattleStatus::Defeat,
        reason: FinishReason::RoundLimit
    }));
}

#[test]
fn pattern_hits_enemies_on_covered_tiles() {
    let config = GameConfig::default();
    // Derived pattern: south, distances 1 and 2.
    let line = spell(Matrix::new(0, 0, 0, 2), Operation::Subtract, PatternModifier::Derive);
    let far = idle_enemy(9, Matrix::splat(5)).with_position(Position::new(6, 6));
    let mut battle = Battle::new(
        1,
        player(vec![line]),
        [
            idle_enemy(1, Matrix::splat(5)),
            idle_enemy(2, Matrix::splat(5)),
            idle_enemy(3, Matrix::splat(5)),
            far,
        ],
    )
    .unwrap();

    battle
        .advance(BattleCommand::cast(0, EntityId(9)), env(&config))
        .unwrap();
    let health = |id: u32| battle.combatant(EntityId(id)).unwrap().health;
    assert_eq!(health(1), Matrix::new(5, 5, 5, 3));
    assert_eq!(health(2), Matrix::new(5, 5, 5, 3));
    assert_eq!(health(3), Matrix::splat(5));
    assert_eq!(health(9), Matrix::new(5, 5, 5, 3));
}

#[test]
fn self_target_spell_affects_only_the_caster() {
    let config = GameConfig::default();
    let heal = spell(Matrix::splat(2), Operation::Add, PatternModifier::SelfOnly);
    let mut p = player(vec![heal]);
    p.health = Matrix::splat(5);
    let mut battle = Battle::new(1, p, [idle_enemy(1, Matrix::splat(4))]).unwrap();

    battle
        .advance(BattleCommand::cast(0, EntityId(1)), env(&config))
        .unwrap();
    assert_eq!(battle.player().health, Matrix::splat(7));
    assert_eq!(battle.enemies()[0].health, Matrix::splat(4));
}

#[test]
fn gauges_regenerate_at_round_end() {
    let config = GameConfig::default();
    let poke = single_target(Matrix::new(1, 0, 0, 0));
    let cost = poke.cost();
    let mut battle = Battle::new(
        1,
        player(vec![poke]),
        [idle_enemy(1, Matrix::splat(9))],
    )
    .unwrap();

    battle
        .advance(BattleCommand::cast(0, EntityId(1)), env(&config))
        .unwrap();
    assert_eq!(
        battle.player().gauge.current(),
        (40 - cost + 10).min(40)
    );
    assert_eq!(battle.round(), 2);
}

#[test]
fn battles_replay_identically() {
    let config = GameConfig::default();
    let build = || {
        let enemies = (1..=3).map(|id| {
            enemy(
                id,
                Matrix::splat(6),
                vec![
                    single_target(Matrix::new(1, 0, 0, 0)),
                    single_target(Matrix::new(0, 1, 0, 0)),
                    single_target(Matrix::new(0, 0, 1, 1)),
                ],
                SpellGauge::full(30, 5),
            )
        });
        Battle::new(42, player(vec![single_target(Matrix::splat(1))]), enemies).unwrap()
    };

    let mut first = build();
    let mut second = build();
    for _ in 0..6 {
        let a = first.advance(BattleCommand::cast(0, EntityId(1)), env(&config));
        let b = second.advance(BattleCommand::cast(0, EntityId(1)), env(&config));
        assert_eq!(a, b);
    }
    assert_eq!(first, second);
}

#[test]
fn scripted_battle_terminates() {
    let config = GameConfig::default();
    let enemies = (1..=4).map(|id| {
        enemy(
            id,
            Matrix::splat(4),
            vec![single_target(Matrix::new(1, 0, 0, 0))],
            SpellGauge::full(20, 3),
        )
    });
    let mut battle =
        Battle::new(5, player(vec![single_target(Matrix::splat(1))]), enemies).unwrap();

    let mut steps = 0;
    while !battle.is_finished() {
        let command = battle
            .living_enemies()
            .next()
            .map(|enemy| BattleCommand::cast(0, enemy.id))
            .unwrap_or(BattleCommand::Wait);
        match battle.advance(command, env(&config)) {
            Ok(_) => {}
            Err(BattleError::InsufficientGauge { .. }) => {
                battle.advance(BattleCommand::Wait, env(&config)).unwrap();
            }
            Err(other) => panic!("unexpected rejection: {other}"),
        }
        steps += 1;
        assert!(steps <= config.battle.max_rounds as usize * 2);
    }
    assert!(battle.status().is_finished());
}

#[test]
fn missing_rng_oracle_is_reported() {
    let config = GameConfig::default();
    let env: GameEnv<'_> = Env::new(None, None, None, &config);
    let mut battle = Battle::new(1, player(vec![]), [idle_enemy(1, Matrix::splat(1))]).unwrap();
    assert_eq!(
        battle.advance(BattleCommand::Wait, env),
        Err(BattleError::Oracle(crate::env::OracleError::RngNotAvailable))
    );
}
