use std::fmt;

use super::Position;

/// Identifier of a game level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaId(pub u32);

impl AreaId {
    pub const ROGUE_ENCAMPMENT: Self = Self(1);
    pub const BLOOD_MOOR: Self = Self(2);
    pub const COLD_PLAINS: Self = Self(3);
    pub const BLACK_MARSH: Self = Self(6);
    pub const TAMOE_HIGHLAND: Self = Self(7);
    pub const DEN_OF_EVIL: Self = Self(8);
    pub const CAVE_LEVEL_1: Self = Self(9);
    pub const PIT_LEVEL_1: Self = Self(12);
    pub const FORGOTTEN_TOWER: Self = Self(20);
    pub const CANYON_OF_THE_MAGI: Self = Self(46);
    pub const ARCANE_SANCTUARY: Self = Self(74);
    pub const DURANCE_OF_HATE_LEVEL_2: Self = Self(101);
    pub const DURANCE_OF_HATE_LEVEL_3: Self = Self(102);
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area#{}", self.0)
    }
}

/// How an exit to a neighbouring level is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitKind {
    /// Stairs, cave mouths and doors that need an interaction.
    Entrance,
    /// Open level edges crossed by walking through them.
    Walkable,
}

/// A known way out of the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exit {
    pub to: AreaId,
    pub position: Position,
    pub kind: ExitKind,
}

impl Exit {
    pub const fn entrance(to: AreaId, position: Position) -> Self {
        Self {
            to,
            position,
            kind: ExitKind::Entrance,
        }
    }

    pub const fn walkable(to: AreaId, position: Position) -> Self {
        Self {
            to,
            position,
            kind: ExitKind::Walkable,
        }
    }
}
