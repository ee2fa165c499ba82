//! Snapshots of live game state handed out by [`crate::GameData`].
//!
//! Every type here is a plain value: the engine never holds a reference into
//! the game's memory, it re-reads a fresh snapshot on each tick.
mod area;
mod common;
mod monster;
mod player;

pub use area::{AreaId, Exit, ExitKind};
pub use common::{Position, ResourceMeter, ScreenPoint, UnitId};
pub use monster::{Immunities, Monster, MonsterType, NpcId};
pub use player::PlayerState;
