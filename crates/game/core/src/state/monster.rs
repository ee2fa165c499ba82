use bitflags::bitflags;
use strum::Display;

use super::{Position, ResourceMeter, UnitId};

/// Monster template identifier (which kind of creature a unit is).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcId(pub u32);

impl NpcId {
    pub const ZOMBIE: Self = Self(2);
    pub const FALLEN: Self = Self(19);
    pub const COUNCIL_MEMBER: Self = Self(345);
    /// Baal's throne-room form; stands on tiles the map marks unwalkable.
    pub const BAAL_CRAB: Self = Self(544);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MonsterType {
    #[default]
    Normal,
    Minion,
    Champion,
    Unique,
    SuperUnique,
}

bitflags! {
    /// Damage types a monster cannot be hurt by.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Immunities: u8 {
        const PHYSICAL = 1 << 0;
        const MAGIC = 1 << 1;
        const FIRE = 1 << 2;
        const COLD = 1 << 3;
        const LIGHTNING = 1 << 4;
        const POISON = 1 << 5;
    }
}

/// Snapshot of a hostile unit as read from the live game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monster {
    pub id: UnitId,
    pub npc: NpcId,
    pub kind: MonsterType,
    pub position: Position,
    pub life: ResourceMeter,
    pub immunities: Immunities,
}

impl Monster {
    pub fn new(id: UnitId, npc: NpcId, position: Position, life: u32) -> Self {
        Self {
            id,
            npc,
            kind: MonsterType::Normal,
            position,
            life: ResourceMeter::full(life),
            immunities: Immunities::empty(),
        }
    }

    pub fn with_kind(mut self, kind: MonsterType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_immunities(mut self, immunities: Immunities) -> Self {
        self.immunities = immunities;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.life.is_empty()
    }

    pub fn is_elite(&self) -> bool {
        matches!(
            self.kind,
            MonsterType::Champion | MonsterType::Unique | MonsterType::SuperUnique
        )
    }

    pub fn is_immune_to(&self, damage: Immunities) -> bool {
        self.immunities.contains(damage)
    }
}
