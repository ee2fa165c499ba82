mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{harness, harness_sharing, harness_with};
use game_core::{Immunities, Monster, MouseButton, NpcId, Position, SkillId, UnitId};
use game_sandbox::{InputEvent, SandboxWorld};
use runtime::{AttackSettings, EngineConfig, EngineError, MonsterStateTracker};

fn zombie(id: u32, x: i32, y: i32, life: u32) -> Monster {
    Monster::new(UnitId(id), NpcId::ZOMBIE, Position::new(x, y), life)
}

#[test]
fn stalled_target_is_repositioned_once_then_dropped() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 30, 20, 100));
    world.make_invulnerable(UnitId(1));
    let h = harness(&world);

    let settings = AttackSettings::primary(UnitId(1), SkillId::ATTACK, 1_000).range(0, 15);
    h.session.attacker().attack(&settings).unwrap();

    assert_eq!(world.path_steps(), vec![Position::new(16, 20)]);
    assert!(h.session.tracker().get(UnitId(1)).is_none());
    // A full stall before the move and another from the new spot.
    assert!(h.clock.elapsed() > Duration::from_secs(6));
    assert_eq!(world.monster_life(UnitId(1)), Some(100));

    let events = world.events();
    let moved = events
        .iter()
        .position(|event| matches!(event, InputEvent::PathStep { .. }))
        .unwrap();
    let clicks_after_move = events[moved..]
        .iter()
        .filter(|event| matches!(event, InputEvent::Click { .. }))
        .count();
    assert!(clicks_after_move > 0, "never attacked from the new spot");
}

#[test]
fn ranged_attack_approaches_to_first_point_with_sight() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(10, 20));
    world.spawn(zombie(1, 30, 20, 30));
    world.set_sight_rule(|from, to| from.distance_to(to) <= 10);
    let h = harness(&world);

    let settings = AttackSettings::secondary(UnitId(1), SkillId::BLIZZARD, 3).range(8, 15);
    h.session.attacker().attack(&settings).unwrap();

    let steps = world.path_steps();
    assert!(!steps.is_empty());
    assert!(steps.iter().all(|step| *step == Position::new(20, 20)));
    assert_eq!(world.player_position(), Position::new(20, 20));
    assert_eq!(world.monster_life(UnitId(1)), Some(0));
}

#[test]
fn attack_count_bounds_clicks_and_stand_still_wraps_them() {
    let world = SandboxWorld::new(40, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 22, 20, 500));
    let h = harness(&world);

    let settings = AttackSettings::primary(UnitId(1), SkillId::ATTACK, 4).stand_still();
    h.session.attacker().attack(&settings).unwrap();

    let events = world.events();
    let clicks: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, InputEvent::Click { button: MouseButton::Left, .. }))
        .collect();
    assert_eq!(clicks.len(), 4);
    assert_eq!(world.monster_life(UnitId(1)), Some(460));

    let first_click = events
        .iter()
        .position(|event| matches!(event, InputEvent::Click { .. }))
        .unwrap();
    let stand_still = world_stand_still(&world);
    assert_eq!(events[first_click - 1], InputEvent::KeyDown(stand_still));
    assert_eq!(events[first_click + 1], InputEvent::KeyUp(stand_still));
}

fn world_stand_still(world: &SandboxWorld) -> game_core::Key {
    use game_core::GameData;
    world.key_bindings().stand_still
}

#[test]
fn attacks_are_paced_by_cast_duration() {
    let world = SandboxWorld::new(40, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 25, 20, 500));
    let h = harness(&world);

    let settings = AttackSettings::secondary(UnitId(1), SkillId::BLIZZARD, 3).range(0, 10);
    h.session.attacker().attack(&settings).unwrap();

    // 490 ms casts with 120 ms of slack: two full cycles before the third click.
    assert_eq!(world.clicks().len(), 3);
    assert!(h.clock.elapsed() >= Duration::from_millis(2 * 370));
    let presses = world
        .events()
        .into_iter()
        .filter(|event| matches!(event, InputEvent::Press(_)))
        .count();
    assert_eq!(presses, 1, "skill is bound once and stays selected");
}

#[test]
fn burst_hits_nearest_targets_within_range_only() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 24, 20, 20));
    world.spawn(zombie(2, 20, 26, 20));
    world.spawn(zombie(3, 17, 17, 20));
    world.spawn(zombie(4, 45, 20, 20));
    let h = harness(&world);

    let settings = AttackSettings::burst(SkillId::BLIZZARD, 10, Duration::from_secs(10));
    h.session.attacker().attack(&settings).unwrap();

    for id in 1..=3 {
        assert_eq!(world.monster_life(UnitId(id)), Some(0), "monster {id}");
    }
    assert_eq!(world.monster_life(UnitId(4)), Some(20));
    assert!(h.clock.elapsed() < Duration::from_secs(10));
}

#[test]
fn burst_stops_at_timeout() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 24, 20, 10_000));
    let h = harness(&world);

    let settings = AttackSettings::burst(SkillId::BLIZZARD, 10, Duration::from_secs(2));
    h.session.attacker().attack(&settings).unwrap();

    assert!(h.clock.elapsed() >= Duration::from_secs(2));
    assert!(world.monster_life(UnitId(1)).unwrap() < 10_000);
}

#[test]
fn clearing_skips_monsters_the_routine_declines() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 24, 20, 20));
    world.spawn(zombie(2, 20, 25, 20));
    world.spawn(zombie(3, 22, 22, 20).with_immunities(Immunities::COLD));
    world.spawn(zombie(4, 50, 20, 20));
    let h = harness(&world);

    h.session
        .attacker()
        .clear_area_around(Position::new(20, 20), 10)
        .unwrap();

    assert_eq!(world.monster_life(UnitId(1)), Some(0));
    assert_eq!(world.monster_life(UnitId(2)), Some(0));
    assert_eq!(world.monster_life(UnitId(3)), Some(20));
    assert_eq!(world.monster_life(UnitId(4)), Some(20));
}

#[test]
fn unwalkable_target_is_ignored_unless_exempt() {
    let world = SandboxWorld::new(40, 40);
    world.place_player(Position::new(20, 20));
    world.add_wall(Position::new(23, 20));
    world.spawn(zombie(1, 23, 20, 20));
    world.spawn(Monster::new(UnitId(2), NpcId::BAAL_CRAB, Position::new(23, 20), 20));
    let h = harness(&world);

    let attacker = h.session.attacker();
    attacker
        .attack(&AttackSettings::secondary(UnitId(1), SkillId::BLIZZARD, 5).range(0, 10))
        .unwrap();
    assert!(world.clicks().is_empty());

    attacker
        .attack(&AttackSettings::secondary(UnitId(2), SkillId::BLIZZARD, 1).range(0, 10))
        .unwrap();
    assert_eq!(world.clicks().len(), 1);
}

#[test]
fn dead_player_ends_attack() {
    let world = SandboxWorld::new(40, 40);
    world.spawn(zombie(1, 22, 20, 20));
    world.set_player_life(0);
    let h = harness(&world);

    let err = h
        .session
        .attacker()
        .attack(&AttackSettings::primary(UnitId(1), SkillId::ATTACK, 3))
        .unwrap_err();
    assert!(matches!(err, EngineError::PlayerDied));
    assert!(world.events().is_empty());
}

#[test]
fn stopped_gate_cancels_attack() {
    let world = SandboxWorld::new(40, 40);
    world.spawn(zombie(1, 22, 20, 20));
    let h = harness(&world);
    h.gate.stop();

    let err = h
        .session
        .attacker()
        .attack(&AttackSettings::primary(UnitId(1), SkillId::ATTACK, 3))
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}

#[test]
fn kiting_backs_away_from_close_enemies() {
    let world = SandboxWorld::new(60, 60);
    world.place_player(Position::new(30, 30));
    world.spawn(zombie(1, 32, 30, 1_000));
    world.spawn(zombie(2, 33, 35, 1_000));
    let h = harness(&world);

    let settings = AttackSettings::secondary(UnitId(1), SkillId::BLIZZARD, 2)
        .range(0, 12)
        .kite(4, 10);
    h.session.attacker().attack(&settings).unwrap();

    let player = world.player_position();
    assert!(player.distance_to(Position::new(32, 30)) >= 4, "still at {player}");
    assert_eq!(world.clicks().len(), 2);

    let steps = world.path_steps();
    let spot = steps[0];
    assert!(steps.iter().all(|step| *step == spot), "retreated twice: {steps:?}");
    for monster in [Position::new(32, 30), Position::new(33, 35)] {
        let clearance = spot.distance_to(monster);
        assert!(clearance >= 7, "{spot} is {clearance} from {monster}");
    }
}

#[test]
fn kiting_waits_out_the_cooldown_between_retreats() {
    let world = SandboxWorld::new(80, 80);
    world.place_player(Position::new(40, 40));
    world.spawn(zombie(1, 42, 40, 10_000));
    world.make_chaser(UnitId(1));
    world.set_walk_tiles(30);
    let mut config = EngineConfig::default();
    config.movement.walk_interval_min_ms = 10;
    config.movement.walk_interval_max_ms = 10;
    let h = harness_with(&world, config);

    let settings = AttackSettings::secondary(UnitId(1), SkillId::BLIZZARD, 10)
        .range(0, 15)
        .kite(4, 10);
    h.session.attacker().attack(&settings).unwrap();

    // Every retreat is a single step, and the chaser is back within the
    // danger distance right after it.
    let retreats = world.path_steps().len();
    let cooldown = EngineConfig::default().combat.reposition_cooldown();
    let allowed = (h.clock.elapsed().as_millis() / cooldown.as_millis()) as usize + 1;
    assert!(retreats >= 2, "only {retreats} retreats");
    assert!(retreats <= allowed, "{retreats} retreats in {:?}", h.clock.elapsed());
    assert_eq!(world.clicks().len(), 10);
}

#[test]
fn sessions_share_one_tracker_across_threads() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(20, 20));
    world.spawn(zombie(1, 24, 20, 10_000));
    world.spawn(zombie(2, 20, 25, 10_000));
    let tracker = Arc::new(MonsterStateTracker::default());
    let blizzard = |id| AttackSettings::secondary(UnitId(id), SkillId::BLIZZARD, 5).range(0, 10);

    let first = harness_sharing(&world, "first", tracker.clone());
    let second = harness_sharing(&world, "second", tracker.clone());
    let workers = [
        std::thread::spawn(move || {
            let attacker = first.session.attacker();
            attacker.attack(&blizzard(1))
        }),
        std::thread::spawn(move || {
            let attacker = second.session.attacker();
            attacker.attack(&blizzard(1))?;
            attacker.attack(&blizzard(2))
        }),
    ];
    for worker in workers {
        worker.join().unwrap().unwrap();
    }

    assert_eq!(tracker.len(), 2);
    assert!(tracker.get(UnitId(1)).is_some());
    assert!(tracker.get(UnitId(2)).is_some());
    assert_eq!(world.monster_life(UnitId(1)), Some(9_900));
    assert_eq!(world.monster_life(UnitId(2)), Some(9_950));
}
