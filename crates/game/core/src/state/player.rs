use std::collections::BTreeMap;
use std::time::Duration;

use super::{AreaId, Position, ResourceMeter};
use crate::skill::{CastProfile, SkillId};

/// Snapshot of the controlled character.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub position: Position,
    pub area: AreaId,
    pub life: ResourceMeter,
    pub mana: ResourceMeter,
    /// Skill bound to the left mouse button.
    pub left_skill: SkillId,
    /// Skill bound to the right mouse button.
    pub right_skill: SkillId,
    /// Learned skills and their levels.
    pub skills: BTreeMap<SkillId, u8>,
    pub cast: CastProfile,
}

impl PlayerState {
    pub fn is_dead(&self) -> bool {
        self.life.is_empty()
    }

    pub fn has_skill(&self, skill: SkillId) -> bool {
        self.skills.get(&skill).is_some_and(|level| *level > 0)
    }

    pub fn cast_duration(&self) -> Duration {
        self.cast.duration()
    }
}
