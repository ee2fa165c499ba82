use std::collections::BTreeMap;

use super::Key;
use crate::skill::SkillId;
use crate::state::{AreaId, Exit, Monster, PlayerState, Position, UnitId};

/// Keyboard layout the character is configured with.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct KeyBindings {
    /// Held while clicking so the character attacks in place.
    pub stand_still: Key,
    pub skills: BTreeMap<SkillId, Key>,
}

impl KeyBindings {
    pub fn skill(&self, skill: SkillId) -> Option<Key> {
        self.skills.get(&skill).copied()
    }

    pub fn with_skill(mut self, skill: SkillId, key: Key) -> Self {
        self.skills.insert(skill, key);
        self
    }
}

/// Read access to the live game state of one character session.
pub trait GameData: Send + Sync {
    fn player(&self) -> PlayerState;

    /// Hostile units currently known to the client, dead ones included.
    fn monsters(&self) -> Vec<Monster>;

    fn monster(&self, id: UnitId) -> Option<Monster> {
        self.monsters().into_iter().find(|monster| monster.id == id)
    }

    /// Area the character is actually standing in.
    fn area(&self) -> AreaId {
        self.player().area
    }

    /// Area whose map data is currently loaded locally. Lags behind
    /// [`GameData::area`] for a short while after every level transition.
    fn loaded_area(&self) -> AreaId;

    fn is_walkable(&self, position: Position) -> bool;

    fn can_teleport(&self) -> bool;

    fn key_bindings(&self) -> KeyBindings;

    /// Known exits out of the loaded area.
    fn exits(&self) -> Vec<Exit>;
}
