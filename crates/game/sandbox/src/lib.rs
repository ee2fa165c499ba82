//! In-memory stand-in for a running game client.
//!
//! [`SandboxWorld`] is a cheap, cloneable handle over one shared grid world.
//! It implements [`game_core::GameData`], [`game_core::PathFinder`],
//! [`game_core::Hid`] and [`game_core::WorldActions`] so the engine can be
//! exercised end to end without a game process. Every synthesized input is
//! recorded as an [`InputEvent`] for later inspection.
//!
//! Screen projection is the identity: a click at screen `(x, y)` lands on
//! world tile `(x, y)`.
mod data;
mod input;
mod pather;
mod world;

pub use world::{InputEvent, SandboxWorld, SightRule};
