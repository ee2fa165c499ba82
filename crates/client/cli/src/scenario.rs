//! Demo worlds and the routine the demo characters fight with.
use std::time::Duration;

use game_core::{
    AreaId, Exit, Immunities, Monster, MonsterType, NpcId, Position, SkillId, UnitId,
};
use game_sandbox::SandboxWorld;
use rand::SeedableRng;
use rand::rngs::StdRng;
use runtime::{AttackSettings, CombatRoutine, Session};

/// Blizzard for trash, Blessed Hammer under Concentration for elites.
pub struct DemoRoutine;

impl CombatRoutine for DemoRoutine {
    fn attack_settings(&self, target: &Monster) -> AttackSettings {
        if target.is_elite() {
            AttackSettings::secondary(target.id, SkillId::BLESSED_HAMMER, 8)
                .range(0, 3)
                .with_aura(SkillId::CONCENTRATION)
                .stand_still()
        } else {
            AttackSettings::secondary(target.id, SkillId::BLIZZARD, 4)
                .range(0, 12)
                .kite(3, 8)
        }
    }

    fn should_skip(&self, target: &Monster) -> bool {
        !target.is_elite() && target.is_immune_to(Immunities::COLD)
    }
}

/// A field of fallen with one unique in the middle, a walk-through exit to
/// the Cold Plains and a cave entrance beyond it.
///
/// Monster ids are offset by `index` so sessions sharing one tracker never
/// collide.
pub fn build_world(index: usize) -> SandboxWorld {
    let mut rng = StdRng::seed_from_u64(index as u64);
    let world = SandboxWorld::new(120, 80);
    world.place_player(Position::new(10, 40));
    world.set_walk_tiles(6);
    for skill in [
        SkillId::BLIZZARD,
        SkillId::BLESSED_HAMMER,
        SkillId::CONCENTRATION,
        SkillId::VIGOR,
    ] {
        world.learn_skill(skill, 20);
    }
    if index % 2 == 1 {
        world.enable_teleport();
    }

    // Ridge with a gap at y = 40.
    world.add_walls((10..70).filter(|y| !(36..=44).contains(y)).map(|y| Position::new(55, y)));

    let base = (index as u32 + 1) * 1_000;
    world.spawn(
        Monster::new(UnitId(base), NpcId::COUNCIL_MEMBER, Position::new(70, 40), 120)
            .with_kind(MonsterType::Unique),
    );
    world.populate(&mut rng, NpcId::FALLEN, 12, Position::new(35, 40), 15, 40);
    world.populate(&mut rng, NpcId::ZOMBIE, 6, Position::new(85, 40), 10, 60);

    world.add_exit(
        AreaId::BLOOD_MOOR,
        Exit::walkable(AreaId::COLD_PLAINS, Position::new(110, 40)),
    );
    world.add_exit(
        AreaId::COLD_PLAINS,
        Exit::entrance(AreaId::CAVE_LEVEL_1, Position::new(100, 20)),
    );
    world
}

/// Clears the start, walks to the Cold Plains, bursts whatever followed and
/// enters the cave.
pub fn run(session: &Session) -> runtime::Result<()> {
    let start = session.data().player().position;
    session.attacker().clear_area_around(start, 20)?;

    let mut mover = session.mover();
    mover.move_to_area(AreaId::COLD_PLAINS)?;

    session.attacker().burst_attack(&AttackSettings::burst(
        SkillId::BLIZZARD,
        15,
        Duration::from_secs(5),
    ))?;

    mover.move_to_area(AreaId::CAVE_LEVEL_1)
}

#[cfg(test)]
mod tests {
    use game_core::GameData;

    use super::*;

    #[test]
    fn worlds_use_disjoint_monster_ids() {
        let first = build_world(0);
        let second = build_world(1);
        let ids: Vec<UnitId> = first.monsters().iter().map(|m| m.id).collect();
        assert!(second.monsters().iter().all(|m| !ids.contains(&m.id)));
    }

    #[test]
    fn elites_get_melee_with_aura() {
        let elite = Monster::new(UnitId(1), NpcId::COUNCIL_MEMBER, Position::new(0, 0), 10)
            .with_kind(MonsterType::Unique);
        let settings = DemoRoutine.attack_settings(&elite);
        assert_eq!(settings.aura, Some(SkillId::CONCENTRATION));
        assert_eq!(settings.max_distance, 3);
    }
}
