use game_core::{CollaboratorError, Exit, Hid, Key, MouseButton, Position, ScreenPoint, WorldActions};

use crate::world::{InputEvent, SandboxWorld};

impl Hid for SandboxWorld {
    fn click(&self, button: MouseButton, at: ScreenPoint) {
        let mut world = self.world();
        world.record(InputEvent::Click { button, at });
        let target = Position::new(at.x, at.y);
        world.hit(target);

        // Clicking an entrance from mid range walks into it.
        let area = world.player.area;
        let reach = world.entrance_range * 3;
        let player = world.player.position;
        let entered = world
            .exits
            .get(&area)
            .and_then(|exits| exits.iter().find(|exit| exit.position == target))
            .filter(|exit| player.distance_to(exit.position) <= reach)
            .map(|exit| exit.to);
        if let Some(to) = entered {
            world.enter_area(to);
        }
    }

    fn key_down(&self, key: Key) {
        self.world().record(InputEvent::KeyDown(key));
    }

    fn key_up(&self, key: Key) {
        self.world().record(InputEvent::KeyUp(key));
    }

    fn press_binding(&self, key: Key) {
        let mut world = self.world();
        world.record(InputEvent::Press(key));
        let bound = world
            .bindings
            .skills
            .iter()
            .find(|(_, bound)| **bound == key)
            .map(|(skill, _)| *skill);
        if let Some(skill) = bound {
            world.player.right_skill = skill;
        }
    }
}

impl WorldActions for SandboxWorld {
    fn pickup_items(&self, radius: i32) -> Result<(), CollaboratorError> {
        self.world().record(InputEvent::Pickup { radius });
        Ok(())
    }

    fn interact_entrance(&self, exit: &Exit) -> Result<(), CollaboratorError> {
        let mut world = self.world();
        world.record(InputEvent::Interact { to: exit.to });
        if world.die_on_interaction {
            world.die_on_interaction = false;
            world.player.life.current = 0;
        }
        if world.failing_interactions > 0 {
            world.failing_interactions -= 1;
            return Err(CollaboratorError::failed(
                "interact_entrance",
                "entrance did not respond",
            ));
        }
        let distance = world.player.position.distance_to(exit.position);
        if distance > world.entrance_range {
            return Err(CollaboratorError::failed(
                "interact_entrance",
                format!("entrance is {distance} tiles away"),
            ));
        }
        world.enter_area(exit.to);
        Ok(())
    }
}
