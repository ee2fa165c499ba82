//! Game-facing value types and collaborator contracts shared across crates.
//!
//! `game-core` describes what the engine can observe about a running game
//! (player, monsters, areas, key bindings) and the narrow interfaces it uses
//! to act on it. Nothing here performs I/O: implementations of [`GameData`],
//! [`PathFinder`], [`Hid`] and [`WorldActions`] live outside this crate,
//! either in a real game adapter or in the in-memory sandbox.
pub mod env;
pub mod error;
pub mod skill;
pub mod state;

pub use env::{
    GameData, Hid, Key, KeyBindings, MouseButton, Path, PathFinder, WorldActions,
};
pub use error::{CollaboratorError, ErrorSeverity};
pub use skill::{CastProfile, SkillId};
pub use state::{
    AreaId, Exit, ExitKind, Immunities, Monster, MonsterType, NpcId, PlayerState, Position,
    ResourceMeter, ScreenPoint, UnitId,
};
