mod common;

use common::{harness, harness_with};
use game_core::{AreaId, Exit, GameData, MouseButton, Position, ScreenPoint};
use game_sandbox::{InputEvent, SandboxWorld};
use runtime::{EngineConfig, EngineError, Route, TransitionSpec};

fn interactions(world: &SandboxWorld) -> usize {
    world
        .events()
        .iter()
        .filter(|event| matches!(event, InputEvent::Interact { .. }))
        .count()
}

#[test]
fn already_in_destination_is_a_no_op() {
    let world = SandboxWorld::new(60, 40);
    let h = harness(&world);
    h.session.mover().move_to_area(AreaId::BLOOD_MOOR).unwrap();
    assert!(world.events().is_empty());
}

#[test]
fn walkable_exit_changes_area() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::walkable(AreaId::COLD_PLAINS, Position::new(40, 20)),
    );
    let h = harness(&world);

    h.session.mover().move_to_area(AreaId::COLD_PLAINS).unwrap();

    assert_eq!(world.player_area(), AreaId::COLD_PLAINS);
    assert_eq!(world.player_position(), Position::new(40, 20));
}

#[test]
fn entrance_is_retried_until_it_works() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::entrance(AreaId::DEN_OF_EVIL, Position::new(40, 20)),
    );
    world.fail_next_interactions(2);
    let h = harness(&world);

    h.session.mover().move_to_area(AreaId::DEN_OF_EVIL).unwrap();

    assert_eq!(world.player_area(), AreaId::DEN_OF_EVIL);
    assert_eq!(interactions(&world), 3);
}

#[test]
fn entrance_gives_up_after_bounded_attempts() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::entrance(AreaId::DEN_OF_EVIL, Position::new(40, 20)),
    );
    world.fail_next_interactions(5);
    let h = harness(&world);

    let err = h
        .session
        .mover()
        .move_to_area(AreaId::DEN_OF_EVIL)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::EntranceInteraction {
            area: AreaId::DEN_OF_EVIL,
            attempts: 3
        }
    ));
    assert_eq!(interactions(&world), 3);
    assert_eq!(world.player_area(), AreaId::BLOOD_MOOR);
}

#[test]
fn mid_range_entrance_is_clicked() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.freeze_player(true);
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::entrance(AreaId::DEN_OF_EVIL, Position::new(40, 20)),
    );
    let h = harness(&world);

    h.session.mover().move_to_area(AreaId::DEN_OF_EVIL).unwrap();

    assert_eq!(world.player_area(), AreaId::DEN_OF_EVIL);
    assert!(world.events().contains(&InputEvent::Click {
        button: MouseButton::Left,
        at: ScreenPoint::new(40, 20),
    }));
    assert_eq!(interactions(&world), 0);
}

#[test]
fn missing_exit_is_reported() {
    let world = SandboxWorld::new(60, 40);
    let h = harness(&world);

    let err = h
        .session
        .mover()
        .move_to_area(AreaId::CAVE_LEVEL_1)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::NoExit {
            from: AreaId::BLOOD_MOOR,
            to: AreaId::CAVE_LEVEL_1
        }
    ));
}

#[test]
fn lagging_map_data_is_waited_for() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::walkable(AreaId::COLD_PLAINS, Position::new(40, 20)),
    );
    world.set_sync_lag(4);
    let h = harness(&world);

    h.session.mover().move_to_area(AreaId::COLD_PLAINS).unwrap();

    assert_eq!(world.loaded_area(), AreaId::COLD_PLAINS);
}

#[test]
fn configured_route_overrides_exit_lookup() {
    let world = SandboxWorld::new(60, 40);
    world.set_area(AreaId::TAMOE_HIGHLAND);
    world.place_player(Position::new(10, 20));
    let config = EngineConfig {
        transitions: vec![TransitionSpec {
            from: AreaId::TAMOE_HIGHLAND,
            to: AreaId::PIT_LEVEL_1,
            route: Route::Waypoints {
                steps: vec![Position::new(30, 10)],
                portal: Position::new(45, 20),
            },
        }],
        ..EngineConfig::default()
    };
    let h = harness_with(&world, config);

    h.session.mover().move_to_area(AreaId::PIT_LEVEL_1).unwrap();

    assert_eq!(world.player_area(), AreaId::PIT_LEVEL_1);
    let steps = world.path_steps();
    let first_portal_step = steps
        .iter()
        .position(|step| *step == Position::new(45, 20))
        .unwrap();
    assert!(steps[..first_portal_step].contains(&Position::new(30, 10)));
}

#[test]
fn map_data_that_never_syncs_gives_up_after_bounded_polls() {
    let world = SandboxWorld::new(60, 40);
    world.stall_map_data(AreaId::COLD_PLAINS);
    let h = harness(&world);

    let synced = h.session.mover().wait_for_area_sync().unwrap();

    let movement = EngineConfig::default().movement;
    assert!(!synced);
    assert_eq!(
        h.clock.elapsed(),
        movement.area_sync_interval() * movement.area_sync_attempts
    );
    assert!(world.events().is_empty());
}

#[test]
fn death_during_entrance_backoff_stops_all_input() {
    let world = SandboxWorld::new(60, 40);
    world.place_player(Position::new(30, 20));
    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::entrance(AreaId::DEN_OF_EVIL, Position::new(40, 20)),
    );
    world.fail_next_interactions(1);
    world.kill_player_on_interaction();
    let h = harness(&world);

    let err = h
        .session
        .mover()
        .move_to_area(AreaId::DEN_OF_EVIL)
        .unwrap_err();

    assert!(matches!(err, EngineError::PlayerDied));
    assert_eq!(interactions(&world), 1);
    assert!(matches!(
        world.events().last(),
        Some(InputEvent::Interact { to: AreaId::DEN_OF_EVIL })
    ));
    assert_eq!(world.player_area(), AreaId::BLOOD_MOOR);
}
