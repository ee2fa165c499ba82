use game_core::{AreaId, Exit, GameData, KeyBindings, Monster, PlayerState, Position, SkillId};

use crate::world::SandboxWorld;

impl GameData for SandboxWorld {
    fn player(&self) -> PlayerState {
        self.world().player.clone()
    }

    fn monsters(&self) -> Vec<Monster> {
        self.world().monsters.clone()
    }

    fn loaded_area(&self) -> AreaId {
        let mut world = self.world();
        if world.sync_lag > 0 {
            world.sync_lag -= 1;
            if world.sync_lag == 0 {
                world.loaded_area = world.player.area;
            }
        }
        world.loaded_area
    }

    fn is_walkable(&self, position: Position) -> bool {
        self.world().is_walkable(position)
    }

    fn can_teleport(&self) -> bool {
        let world = self.world();
        world.teleport && world.player.has_skill(SkillId::TELEPORT)
    }

    fn key_bindings(&self) -> KeyBindings {
        self.world().bindings.clone()
    }

    fn exits(&self) -> Vec<Exit> {
        let world = self.world();
        world
            .exits
            .get(&world.loaded_area)
            .cloned()
            .unwrap_or_default()
    }
}
