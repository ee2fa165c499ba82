//! Picking a spot to retreat to while keeping a target under fire.
use std::collections::BTreeSet;

use game_core::{GameData, Monster, PathFinder, Position};

const SWEEP_STEP_DEGREES: usize = 5;
const FAR_RING_BONUS: f64 = 5.0;

/// Scores candidate tiles around the player and returns the best one that
/// keeps every living enemy at least halfway between the danger and safe
/// distances while still seeing the threat.
pub struct SafePositionFinder<'a> {
    data: &'a dyn GameData,
    pather: &'a dyn PathFinder,
}

impl<'a> SafePositionFinder<'a> {
    pub fn new(data: &'a dyn GameData, pather: &'a dyn PathFinder) -> Self {
        Self { data, pather }
    }

    pub fn find(
        &self,
        threat: &Monster,
        danger: i32,
        safe: i32,
        min_attack: i32,
        max_attack: i32,
    ) -> Option<Position> {
        let origin = self.data.player().position;
        let enemies: Vec<Position> = self
            .data
            .monsters()
            .iter()
            .filter(|monster| monster.is_alive() && monster.id != threat.id)
            .map(|monster| monster.position)
            .chain(threat.is_alive().then_some(threat.position))
            .collect();
        let min_clearance = (danger + safe) / 2;

        candidates(origin, threat.position, danger, safe)
            .into_iter()
            .filter(|spot| *spot != origin && self.data.is_walkable(*spot))
            .filter(|spot| self.pather.line_of_sight(*spot, threat.position))
            .filter_map(|spot| {
                let clearance = nearest(spot, &enemies);
                (clearance >= min_clearance).then_some((spot, clearance))
            })
            .map(|(spot, clearance)| {
                let threat_distance = spot.distance_to(threat.position);
                let mut score = f64::from(clearance) * 3.0
                    + attack_fitness(threat_distance, min_attack, max_attack) * 2.0
                    - origin.precise_distance_to(spot) * 0.5;
                if threat_distance > danger + 3 {
                    score += FAR_RING_BONUS;
                }
                (spot, score)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(spot, _)| spot)
    }
}

/// 10 inside the attack band, otherwise minus the distance from its centre.
fn attack_fitness(distance: i32, min_attack: i32, max_attack: i32) -> f64 {
    if (min_attack..=max_attack).contains(&distance) {
        return 10.0;
    }
    let mid = f64::from(min_attack + max_attack) / 2.0;
    -(f64::from(distance) - mid).abs()
}

fn nearest(spot: Position, enemies: &[Position]) -> i32 {
    enemies
        .iter()
        .map(|enemy| spot.distance_to(*enemy))
        .min()
        .unwrap_or(i32::MAX)
}

/// Points straight away from the threat (with a one-tile jitter) plus a
/// radial sweep on four rings around the player.
fn candidates(origin: Position, threat: Position, danger: i32, safe: i32) -> BTreeSet<Position> {
    let mut spots = BTreeSet::new();
    let rings: BTreeSet<i32> = [danger, (danger + safe) / 2, safe, safe + 4]
        .into_iter()
        .filter(|radius| *radius > 0)
        .collect();

    let dx = f64::from(origin.x - threat.x);
    let dy = f64::from(origin.y - threat.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length > 0.0 {
        let (ux, uy) = (dx / length, dy / length);
        for radius in &rings {
            let r = f64::from(*radius);
            let base = origin.offset((ux * r).round() as i32, (uy * r).round() as i32);
            for jx in -1..=1 {
                for jy in -1..=1 {
                    spots.insert(base.offset(jx, jy));
                }
            }
        }
    }

    for degrees in (0..360_i32).step_by(SWEEP_STEP_DEGREES) {
        let (sin, cos) = f64::from(degrees).to_radians().sin_cos();
        for radius in &rings {
            let r = f64::from(*radius);
            spots.insert(origin.offset((cos * r).round() as i32, (sin * r).round() as i32));
        }
    }

    spots
}

#[cfg(test)]
mod tests {
    use game_core::{NpcId, UnitId};
    use game_sandbox::SandboxWorld;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn finder_result(world: &SandboxWorld, threat: &Monster) -> Option<Position> {
        SafePositionFinder::new(world, world).find(threat, 4, 10, 0, 10)
    }

    #[test]
    fn retreats_away_from_adjacent_threat() {
        let world = SandboxWorld::new(60, 60);
        world.place_player(Position::new(30, 30));
        let threat = Monster::new(UnitId(1), NpcId::ZOMBIE, Position::new(32, 30), 50);
        world.spawn(threat.clone());

        let spot = finder_result(&world, &threat).expect("open field has a safe spot");
        assert!(spot.distance_to(threat.position) >= 7);
        assert!(spot.x < 32, "should move away from the threat, got {spot}");
    }

    #[test]
    fn boxed_in_player_has_no_safe_spot() {
        let world = SandboxWorld::new(21, 21);
        let player = Position::new(10, 10);
        world.place_player(player);
        let walls = (0..21)
            .flat_map(|x| (0..21).map(move |y| Position::new(x, y)))
            .filter(|p| *p != player && p.distance_to(player) > 1);
        world.add_walls(walls);
        let threat = Monster::new(UnitId(1), NpcId::ZOMBIE, Position::new(11, 10), 50);
        world.spawn(threat.clone());

        assert_eq!(finder_result(&world, &threat), None);
    }

    #[test]
    fn chosen_spot_keeps_every_enemy_at_clearance() {
        let mut rng = StdRng::seed_from_u64(0x5afe);
        for round in 0..20 {
            let world = SandboxWorld::new(60, 60);
            let player = Position::new(30, 30);
            world.place_player(player);
            let threat = Monster::new(
                UnitId(1000),
                NpcId::FALLEN,
                player.offset(rng.gen_range(-3..=3), rng.gen_range(-3..=3)),
                20,
            );
            world.spawn(threat.clone());
            world.populate(&mut rng, NpcId::FALLEN, 6, player, 12, 20);
            for _ in 0..15 {
                world.add_wall(player.offset(rng.gen_range(-12..=12), rng.gen_range(-12..=12)));
            }

            let Some(spot) = finder_result(&world, &threat) else {
                continue;
            };
            assert!(world.is_walkable(spot), "round {round}: {spot} not walkable");
            assert!(world.line_of_sight(spot, threat.position), "round {round}");
            for monster in world.monsters().iter().filter(|m| m.is_alive()) {
                assert!(
                    spot.distance_to(monster.position) >= 7,
                    "round {round}: {spot} too close to {}",
                    monster.position
                );
            }
        }
    }

    #[test]
    fn dead_threat_does_not_count_toward_clearance() {
        let world = SandboxWorld::new(60, 60);
        world.place_player(Position::new(30, 30));
        let mut corpse = Monster::new(UnitId(1), NpcId::ZOMBIE, Position::new(36, 30), 50);
        corpse.life.current = 0;
        world.spawn(corpse.clone());

        // Band [0, 6] only peaks on spots close to the corpse.
        let spot = SafePositionFinder::new(&world, &world)
            .find(&corpse, 4, 10, 0, 6)
            .expect("nothing alive nearby");
        assert!(spot.distance_to(corpse.position) < 7, "kept away from a corpse: {spot}");
    }

    #[test]
    fn fitness_peaks_inside_attack_band() {
        assert_eq!(attack_fitness(8, 5, 10), 10.0);
        assert_eq!(attack_fitness(15, 5, 10), -7.5);
        assert_eq!(attack_fitness(0, 5, 10), -7.5);
    }
}
