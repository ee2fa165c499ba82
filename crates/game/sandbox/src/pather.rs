use std::time::Duration;

use game_core::{Path, PathFinder, Position, ScreenPoint, SkillId};
use pathfinding::prelude::astar;

use crate::world::{InputEvent, SandboxWorld};

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

impl PathFinder for SandboxWorld {
    fn get_path(&self, to: Position) -> Option<Path> {
        let world = self.world();
        let start = world.player.position;
        if !world.is_walkable(to) {
            return None;
        }

        let (mut points, _cost) = astar(
            &start,
            |current| {
                let current = *current;
                let mut next = Vec::with_capacity(8);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let neighbour = current.offset(dx, dy);
                        if world.is_walkable(neighbour) {
                            let cost = if dx != 0 && dy != 0 {
                                DIAGONAL_COST
                            } else {
                                STRAIGHT_COST
                            };
                            next.push((neighbour, cost));
                        }
                    }
                }
                next
            },
            |current| {
                let dx = (to.x - current.x).unsigned_abs();
                let dy = (to.y - current.y).unsigned_abs();
                STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
            },
            |current| *current == to,
        )?;

        // The player's own tile is not part of the path.
        points.remove(0);
        Some(Path::new(points))
    }

    fn distance_from_me(&self, to: Position) -> i32 {
        self.world().player.position.distance_to(to)
    }

    fn line_of_sight(&self, from: Position, to: Position) -> bool {
        self.world().line_of_sight(from, to)
    }

    fn move_through_path(&self, path: &Path, _step: Duration) {
        let mut world = self.world();
        let Some(destination) = path.destination() else {
            return;
        };
        world.record(InputEvent::PathStep { to: destination });
        if world.frozen {
            return;
        }

        let teleporting = world.teleport && world.player.right_skill == SkillId::TELEPORT;
        let reach = if teleporting {
            world.teleport_tiles
        } else {
            world.walk_tiles
        };
        let index = reach.max(1).min(path.len()) - 1;
        let landing = path.points()[index];
        world.place_player(landing);
        world.pull_chasers();
        world.count_step();
    }

    fn beyond_position(&self, start: Position, dest: Position, distance: i32) -> Position {
        let dx = f64::from(dest.x - start.x);
        let dy = f64::from(dest.y - start.y);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return dest;
        }
        let scale = f64::from(distance) / length;
        dest.offset((dx * scale).round() as i32, (dy * scale).round() as i32)
    }

    fn game_coords_to_screen(&self, position: Position) -> ScreenPoint {
        ScreenPoint::new(position.x, position.y)
    }

    fn random_movement(&self) {
        let mut world = self.world();
        world.record(InputEvent::Nudge);
        if world.frozen {
            return;
        }
        let current = world.player.position;
        let candidates = [(1, 0), (0, 1), (-1, 0), (0, -1)];
        if let Some(next) = candidates
            .iter()
            .map(|(dx, dy)| current.offset(*dx, *dy))
            .find(|p| world.is_walkable(*p))
        {
            world.place_player(next);
        }
    }
}
