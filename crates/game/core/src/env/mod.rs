//! Contracts for the collaborators the engine reads from and acts through.
//!
//! - [`GameData`] exposes live game state (player, monsters, area, bindings)
//! - [`PathFinder`] answers geometric questions and walks computed paths
//! - [`Hid`] synthesizes mouse and keyboard input
//! - [`WorldActions`] wraps higher-level actions owned by other subsystems
//!
//! Implementations must be cheap to call repeatedly: the engine re-reads state
//! on every tick instead of caching it.
mod actions;
mod data;
mod input;
mod pather;

pub use actions::WorldActions;
pub use data::{GameData, KeyBindings};
pub use input::{Hid, Key, MouseButton};
pub use pather::{Path, PathFinder};
