//! Rules compliance tests.
//!
//! Named scenarios for each rule of the engine, driven through the public
//! API: deployment, simultaneous movement, combat math, terrain, victory,
//! and chaos rifts.
//!
//! Coordinates are `Coord::new(column, row)`. Player One deploys on rows 3
//! and 4, player Two on rows 0 and 1.

use riftfall::board::{
    Coord, GameState, Grid, Phase, Placement, PlannedAction, PlayerSlot, TerrainKind, UnitId,
    UnitKind,
};
use riftfall::config::{GameConfig, RiftSchedule};
use riftfall::error::{GameError, TargetRejection};
use riftfall::game::Game;
use riftfall::resolve::{
    apply_resolution, apply_rift, attack_damage, check_victory, resolve_turn, BlockReason,
    CombatEvent, DeathCause, Outcome, VoidReason,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

use PlayerSlot::{One, Two};
use UnitKind::{Archer, Commander, Warrior};

type Layout = [(UnitKind, u8, u8); 3];

const SEED: u64 = 7;

fn battle(one: Layout, two: Layout, terrain: &[(Coord, TerrainKind)]) -> GameState {
    let mut state = GameState::new(Grid::with_terrain(terrain), SEED, None);
    let placements = |layout: Layout| layout.map(|(kind, x, y)| Placement::new(kind, x, y));
    state.deploy(&placements(one), &placements(two));
    state.phase = Phase::Planning;
    assert!(state.grid.verify_occupancy(&state.units));
    state
}

fn id(player: PlayerSlot, kind: UnitKind) -> UnitId {
    UnitId::of(player, kind)
}

fn at(x: u8, y: u8) -> Coord {
    Coord::new(x, y)
}

fn set_health(state: &mut GameState, unit: UnitId, health: u32) {
    state.units[unit.index()].health = health;
}

/// Resolves one turn on a copy of `state`.
fn resolve(
    state: &GameState,
    one: &[PlannedAction],
    two: &[PlannedAction],
) -> (GameState, Vec<CombatEvent>) {
    let mut next = state.clone();
    let resolution = resolve_turn(state, one, two);
    let events = apply_resolution(&mut next, resolution);
    assert!(next.grid.verify_occupancy(&next.units));
    (next, events)
}

fn position(state: &GameState, unit: UnitId) -> Coord {
    state.units[unit.index()].position
}

fn health(state: &GameState, unit: UnitId) -> u32 {
    state.units[unit.index()].health
}

/// Every living unit of `player` defends, except those listed in `orders`.
fn orders(game: &Game, player: PlayerSlot, overrides: &[PlannedAction]) -> Vec<PlannedAction> {
    game.default_actions(player)
        .into_iter()
        .map(|a| {
            overrides
                .iter()
                .find(|o| o.unit_id == a.unit_id)
                .copied()
                .unwrap_or(a)
        })
        .collect()
}

const P1_HOME: Layout = [(Commander, 0, 4), (Warrior, 2, 4), (Archer, 4, 4)];
const P2_HOME: Layout = [(Commander, 0, 0), (Warrior, 2, 0), (Archer, 4, 0)];

// ===========================================================================
// Deployment
// ===========================================================================

#[test]
fn deploy_commander_in_middle_row_rejected() {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let placements = [
        Placement::new(Commander, 2, 2),
        Placement::new(Warrior, 1, 3),
        Placement::new(Archer, 3, 3),
    ];
    assert_eq!(
        game.submit_placement(One, &placements),
        Err(GameError::IllegalTarget {
            target: at(2, 2),
            reason: TargetRejection::OutsideDeploymentZone,
        })
    );
    assert_eq!(game.state().phase, Phase::Setup);
    assert!(!game.state().setup_complete(One));

    let placements = [
        Placement::new(Commander, 2, 4),
        Placement::new(Warrior, 1, 3),
        Placement::new(Archer, 3, 3),
    ];
    assert_eq!(game.submit_placement(One, &placements), Ok(()));
    assert!(game.state().setup_complete(One));
}

#[test]
fn deploy_zones_are_mirrored() {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let into_enemy_rows = [
        Placement::new(Commander, 0, 0),
        Placement::new(Warrior, 1, 0),
        Placement::new(Archer, 2, 3),
    ];
    assert!(matches!(
        game.submit_placement(Two, &into_enemy_rows),
        Err(GameError::IllegalTarget { reason: TargetRejection::OutsideDeploymentZone, .. })
    ));

    let own_rows = [
        Placement::new(Commander, 0, 0),
        Placement::new(Warrior, 1, 0),
        Placement::new(Archer, 2, 1),
    ];
    assert_eq!(game.submit_placement(Two, &own_rows), Ok(()));
}

#[test]
fn deploy_order_does_not_matter() {
    let one = [
        Placement::new(Commander, 2, 4),
        Placement::new(Warrior, 1, 3),
        Placement::new(Archer, 3, 3),
    ];
    let two = [
        Placement::new(Commander, 2, 0),
        Placement::new(Warrior, 1, 1),
        Placement::new(Archer, 3, 1),
    ];

    let mut a = Game::new(GameConfig::default()).unwrap();
    a.submit_placement(One, &one).unwrap();
    a.submit_placement(Two, &two).unwrap();

    let mut b = Game::new(GameConfig::default()).unwrap();
    b.submit_placement(Two, &two).unwrap();
    b.submit_placement(One, &one).unwrap();

    assert_eq!(a.state(), b.state());
    assert_eq!(a.state().phase, Phase::Planning);
}

#[test]
fn deploy_after_setup_rejected() {
    let mut game = Game::new(GameConfig::default()).unwrap();
    let one = [
        Placement::new(Commander, 2, 4),
        Placement::new(Warrior, 1, 3),
        Placement::new(Archer, 3, 3),
    ];
    let two = [
        Placement::new(Commander, 2, 0),
        Placement::new(Warrior, 1, 1),
        Placement::new(Archer, 3, 1),
    ];
    game.submit_placement(One, &one).unwrap();
    game.submit_placement(Two, &two).unwrap();
    assert_eq!(
        game.submit_placement(One, &one),
        Err(GameError::InvalidPhase { expected: Phase::Setup, actual: Phase::Planning })
    );
}

// ===========================================================================
// Movement
// ===========================================================================

#[test]
fn move_same_destination_cancels_both() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 1), (Archer, 4, 0)],
        &[],
    );
    let w1 = id(One, Warrior);
    let w2 = id(Two, Warrior);
    let (next, events) = resolve(
        &state,
        &[PlannedAction::move_to(w1, at(2, 2))],
        &[PlannedAction::move_to(w2, at(2, 2))],
    );

    assert_eq!(position(&next, w1), at(2, 3));
    assert_eq!(position(&next, w2), at(2, 1));
    assert!(!next.grid.is_occupied(at(2, 2)));
    for unit in [w1, w2] {
        assert!(events.contains(&CombatEvent::MoveCancelled {
            unit,
            target: Some(at(2, 2)),
            reason: BlockReason::Collision,
        }));
    }
}

#[test]
fn move_collision_between_friends_also_cancels() {
    let state = battle(
        [(Commander, 1, 3), (Warrior, 3, 3), (Archer, 4, 4)],
        P2_HOME,
        &[],
    );
    let (next, _) = resolve(
        &state,
        &[
            PlannedAction::move_to(id(One, Commander), at(2, 2)),
            PlannedAction::move_to(id(One, Warrior), at(2, 2)),
        ],
        &[],
    );
    assert_eq!(position(&next, id(One, Commander)), at(1, 3));
    assert_eq!(position(&next, id(One, Warrior)), at(3, 3));
}

#[test]
fn move_resolution_ignores_list_order() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 3, 3)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 3, 1)],
        &[(at(1, 2), TerrainKind::Lava)],
    );
    let one = [
        PlannedAction::move_to(id(One, Warrior), at(1, 2)),
        PlannedAction::attack(id(One, Archer), at(3, 1)),
        PlannedAction::defend(id(One, Commander)),
    ];
    let two = [
        PlannedAction::attack(id(Two, Archer), at(3, 3)),
        PlannedAction::move_to(id(Two, Warrior), at(2, 3)),
        PlannedAction::defend(id(Two, Commander)),
    ];
    let forward = resolve_turn(&state, &one, &two);
    let swapped = resolve_turn(&state, &two, &one);
    assert_eq!(forward, swapped);
    assert_eq!(forward, resolve_turn(&state, &one, &two));
}

#[test]
fn move_swap_places_allowed() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 4, 0)],
        &[],
    );
    let w1 = id(One, Warrior);
    let w2 = id(Two, Warrior);
    let (next, _) = resolve(
        &state,
        &[PlannedAction::move_to(w1, at(2, 2))],
        &[PlannedAction::move_to(w2, at(2, 3))],
    );
    assert_eq!(position(&next, w1), at(2, 2));
    assert_eq!(position(&next, w2), at(2, 3));
}

#[test]
fn move_into_unit_that_stays_fails() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 4, 0)],
        &[],
    );
    let w1 = id(One, Warrior);
    let (next, events) = resolve(
        &state,
        &[PlannedAction::move_to(w1, at(2, 2))],
        &[PlannedAction::defend(id(Two, Warrior))],
    );
    assert_eq!(position(&next, w1), at(2, 3));
    assert!(events.contains(&CombatEvent::MoveCancelled {
        unit: w1,
        target: Some(at(2, 2)),
        reason: BlockReason::Occupied,
    }));
}

#[test]
fn move_chain_follows_leader() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 2, 2)],
        [(Commander, 0, 0), (Warrior, 4, 1), (Archer, 4, 0)],
        &[],
    );
    let (next, _) = resolve(
        &state,
        &[
            PlannedAction::move_to(id(One, Warrior), at(2, 2)),
            PlannedAction::move_to(id(One, Archer), at(2, 1)),
        ],
        &[],
    );
    assert_eq!(position(&next, id(One, Warrior)), at(2, 2));
    assert_eq!(position(&next, id(One, Archer)), at(2, 1));
}

#[test]
fn move_blocked_leader_pins_follower() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 2, 2)],
        [(Commander, 0, 0), (Warrior, 2, 1), (Archer, 4, 0)],
        &[],
    );
    let (next, _) = resolve(
        &state,
        &[
            PlannedAction::move_to(id(One, Warrior), at(2, 2)),
            PlannedAction::move_to(id(One, Archer), at(2, 1)),
        ],
        &[PlannedAction::defend(id(Two, Warrior))],
    );
    assert_eq!(position(&next, id(One, Archer)), at(2, 2));
    assert_eq!(position(&next, id(One, Warrior)), at(2, 3));
}

#[test]
fn move_onto_wall_rejected_at_submission() {
    let mut game = Game::from_state(
        battle(P1_HOME, P2_HOME, &[(at(2, 3), TerrainKind::Wall)]),
        GameConfig::default().with_seed(SEED),
    )
    .unwrap();
    let w1 = id(One, Warrior);
    let actions = orders(&game, One, &[PlannedAction::move_to(w1, at(2, 3))]);
    assert_eq!(
        game.submit_moves(One, actions),
        Err(GameError::IllegalTarget { target: at(2, 3), reason: TargetRejection::Wall })
    );
    assert!(!game.state().has_committed(One));
}

// ===========================================================================
// Combat
// ===========================================================================

#[test]
fn combat_damage_floor() {
    for attack in 0..12 {
        for defense in 0..12 {
            let raw = attack_damage(attack, 0, defense, false);
            assert_eq!(raw, attack.saturating_sub(defense));
            assert_eq!(attack_damage(attack, 0, defense, true), raw / 2);
        }
    }
    assert_eq!(attack_damage(7, 0, 2, true), 2);
}

#[test]
fn combat_archer_range_two() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 4), (Archer, 0, 0)],
        [(Commander, 4, 2), (Warrior, 2, 0), (Archer, 3, 0)],
        &[],
    );
    let archer = id(One, Archer);

    let (next, events) = resolve(&state, &[PlannedAction::attack(archer, at(2, 0))], &[]);
    assert!(events.contains(&CombatEvent::Attacked {
        attacker: archer,
        target: id(Two, Warrior),
        damage: 4,
    }));
    assert_eq!(health(&next, id(Two, Warrior)), 11);

    let (next, events) = resolve(&state, &[PlannedAction::attack(archer, at(3, 0))], &[]);
    assert!(events.contains(&CombatEvent::AttackVoid {
        attacker: archer,
        target: Some(at(3, 0)),
        reason: VoidReason::OutOfRange,
    }));
    assert_eq!(health(&next, id(Two, Archer)), 10);
    assert_eq!(next.stats.damage_dealt[One], 0);
}

#[test]
fn combat_defend_halves_damage() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 4, 0)],
        &[],
    );
    let (next, _) = resolve(
        &state,
        &[PlannedAction::attack(id(One, Warrior), at(2, 2))],
        &[PlannedAction::defend(id(Two, Warrior))],
    );
    // (7 - 2) / 2
    assert_eq!(health(&next, id(Two, Warrior)), 13);
}

#[test]
fn combat_mutual_kill_uses_snapshot() {
    let mut state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 4, 0)],
        &[],
    );
    let w1 = id(One, Warrior);
    let w2 = id(Two, Warrior);
    set_health(&mut state, w1, 5);
    set_health(&mut state, w2, 5);

    let (next, events) = resolve(
        &state,
        &[PlannedAction::attack(w1, at(2, 2))],
        &[PlannedAction::attack(w2, at(2, 3))],
    );
    for unit in [w1, w2] {
        assert!(!next.units[unit.index()].alive);
        assert_eq!(health(&next, unit), 0);
        assert!(events.contains(&CombatEvent::Died { unit, cause: DeathCause::Combat }));
    }
    assert!(!next.grid.is_occupied(at(2, 2)));
    assert!(!next.grid.is_occupied(at(2, 3)));
    assert_eq!(next.stats.kills[One], 1);
    assert_eq!(next.stats.kills[Two], 1);
}

#[test]
fn combat_boost_tile_adds_attack() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        [(Commander, 0, 0), (Warrior, 2, 2), (Archer, 4, 0)],
        &[(at(2, 3), TerrainKind::Boost)],
    );
    let (next, _) = resolve(&state, &[PlannedAction::attack(id(One, Warrior), at(2, 2))], &[]);
    // 7 + 2 - 2
    assert_eq!(health(&next, id(Two, Warrior)), 8);
}

#[test]
fn combat_friendly_target_is_void() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 2, 4)],
        P2_HOME,
        &[],
    );
    let (next, events) = resolve(&state, &[PlannedAction::attack(id(One, Warrior), at(2, 4))], &[]);
    assert_eq!(health(&next, id(One, Archer)), 10);
    assert!(events.contains(&CombatEvent::AttackVoid {
        attacker: id(One, Warrior),
        target: Some(at(2, 4)),
        reason: VoidReason::FriendlyTarget,
    }));
}

// ===========================================================================
// Terrain
// ===========================================================================

#[test]
fn terrain_lava_clamps_and_kills() {
    let mut state = battle(
        [(Commander, 0, 4), (Warrior, 2, 4), (Archer, 1, 3)],
        P2_HOME,
        &[(at(1, 3), TerrainKind::Lava)],
    );
    let archer = id(One, Archer);
    set_health(&mut state, archer, 1);

    let (next, events) = resolve(&state, &[], &[]);
    assert_eq!(health(&next, archer), 0);
    assert!(!next.units[archer.index()].alive);
    assert!(!next.grid.is_occupied(at(1, 3)));
    assert!(events.contains(&CombatEvent::TerrainDamage { unit: archer, amount: 1 }));
    assert!(events.contains(&CombatEvent::Died { unit: archer, cause: DeathCause::Lava }));
    assert_eq!(next.stats.kills[Two], 0);
}

#[test]
fn terrain_heal_stops_at_max() {
    let mut state = battle(
        [(Commander, 0, 4), (Warrior, 2, 2), (Archer, 4, 4)],
        P2_HOME,
        &[(at(2, 2), TerrainKind::Heal)],
    );
    let warrior = id(One, Warrior);
    set_health(&mut state, warrior, 14);

    let (next, events) = resolve(&state, &[], &[]);
    assert_eq!(health(&next, warrior), 15);
    assert!(events.contains(&CombatEvent::TerrainHeal { unit: warrior, amount: 1 }));

    let (again, events) = resolve(&next, &[], &[]);
    assert_eq!(health(&again, warrior), 15);
    assert!(!events.iter().any(|e| matches!(e, CombatEvent::TerrainHeal { .. })));
}

#[test]
fn terrain_applies_after_movement() {
    let state = battle(
        [(Commander, 0, 4), (Warrior, 2, 3), (Archer, 4, 4)],
        P2_HOME,
        &[(at(2, 2), TerrainKind::Lava)],
    );
    let warrior = id(One, Warrior);
    let (next, _) = resolve(&state, &[PlannedAction::move_to(warrior, at(2, 2))], &[]);
    assert_eq!(health(&next, warrior), 13);
}

// ===========================================================================
// Victory
// ===========================================================================

#[test]
fn victory_when_enemy_commander_falls() {
    let mut state = battle(
        [(Commander, 0, 4), (Warrior, 2, 2), (Archer, 4, 4)],
        [(Commander, 2, 1), (Warrior, 0, 0), (Archer, 4, 0)],
        &[],
    );
    set_health(&mut state, id(Two, Commander), 1);
    let mut game = Game::from_state(state, GameConfig::default().with_seed(SEED)).unwrap();

    let strike = PlannedAction::attack(id(One, Warrior), at(2, 1));
    game.submit_moves(One, orders(&game, One, &[strike])).unwrap();
    game.submit_moves(Two, orders(&game, Two, &[])).unwrap();
    let report = game.advance().unwrap();

    assert_eq!(report.outcome, Outcome::Victory(One));
    assert_eq!(game.state().winner, Some(One));
    assert_eq!(game.state().phase, Phase::Finished);
    assert_eq!(check_victory(game.state()), Outcome::Victory(One));
    assert_eq!(
        game.submit_moves(One, Vec::new()),
        Err(GameError::InvalidPhase { expected: Phase::Planning, actual: Phase::Finished })
    );
}

#[test]
fn victory_double_knockout_is_draw() {
    let mut state = battle(
        [(Commander, 2, 3), (Warrior, 0, 4), (Archer, 4, 4)],
        [(Commander, 2, 2), (Warrior, 0, 0), (Archer, 4, 0)],
        &[],
    );
    set_health(&mut state, id(One, Commander), 1);
    set_health(&mut state, id(Two, Commander), 1);
    let mut game = Game::from_state(state, GameConfig::default().with_seed(SEED)).unwrap();

    let one = orders(&game, One, &[PlannedAction::attack(id(One, Commander), at(2, 2))]);
    let two = orders(&game, Two, &[PlannedAction::attack(id(Two, Commander), at(2, 3))]);
    game.submit_moves(Two, two).unwrap();
    game.submit_moves(One, one).unwrap();
    let report = game.advance().unwrap();

    assert_eq!(report.outcome, Outcome::Draw);
    assert_eq!(game.state().winner, None);
    assert_eq!(game.state().phase, Phase::Finished);
}

#[test]
fn victory_not_declared_while_commanders_live() {
    let state = battle(P1_HOME, P2_HOME, &[]);
    let mut game = Game::from_state(state, GameConfig::default().with_seed(SEED)).unwrap();
    for _ in 0..3 {
        game.submit_moves(One, orders(&game, One, &[])).unwrap();
        game.submit_moves(Two, orders(&game, Two, &[])).unwrap();
        assert_eq!(game.advance().unwrap().outcome, Outcome::Ongoing);
    }
    assert_eq!(game.state().winner, None);
    assert_eq!(game.state().turn_number, 4);
}

// ===========================================================================
// Chaos rifts
// ===========================================================================

#[test]
fn rift_only_permutes_terrain() {
    let terrain = [
        (at(0, 2), TerrainKind::Lava),
        (at(4, 2), TerrainKind::Lava),
        (at(2, 2), TerrainKind::Heal),
        (at(1, 1), TerrainKind::Boost),
        (at(3, 3), TerrainKind::Wall),
    ];
    let state = battle(P1_HOME, P2_HOME, &terrain);
    for turn in 1..40 {
        let mut grid = state.grid.clone();
        let swap = apply_rift(&mut grid, state.seed, turn).unwrap();
        assert_eq!(grid.terrain_counts(), state.grid.terrain_counts());
        assert_eq!(grid.terrain(at(3, 3)), TerrainKind::Wall);
        assert_ne!(swap.first, swap.second);
        for coord in Coord::all() {
            assert_eq!(grid.occupant(coord), state.grid.occupant(coord));
        }
    }
}

#[test]
fn rift_fires_through_controller() {
    let config = GameConfig::default()
        .with_seed(SEED)
        .with_rift(RiftSchedule::Fixed { every: 1 });
    let mut state = battle(P1_HOME, P2_HOME, &[(at(2, 2), TerrainKind::Heal)]);
    state.next_rift_turn = Some(1);
    let mut game = Game::from_state(state, config).unwrap();

    let before: Vec<Coord> = game.state().units.iter().map(|u| u.position).collect();
    let counts = game.state().grid.terrain_counts();
    game.submit_moves(One, orders(&game, One, &[])).unwrap();
    game.submit_moves(Two, orders(&game, Two, &[])).unwrap();
    let report = game.advance().unwrap();

    assert!(report.rift.is_some());
    assert!(matches!(report.events.last(), Some(CombatEvent::Rift { .. })));
    let after: Vec<Coord> = game.state().units.iter().map(|u| u.position).collect();
    assert_eq!(before, after);
    assert_eq!(game.state().grid.terrain_counts(), counts);
    assert_eq!(game.state().next_rift_turn, Some(2));
    assert_eq!(game.state().phase, Phase::Planning);
}
