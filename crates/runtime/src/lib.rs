//! Combat and movement coordination for a bot playing an action RPG.
//!
//! The engine never talks to the game directly. Everything it observes comes
//! from a [`game_core::GameData`] snapshot provider and every action goes out
//! through [`game_core::PathFinder`], [`game_core::Hid`] and
//! [`game_core::WorldActions`]. A [`Session`] bundles those collaborators with
//! a [`CombatRoutine`], a [`Clock`], a [`PauseGate`] and the shared
//! [`MonsterStateTracker`].
//!
//! Modules are organized by responsibility:
//! - [`combat`] runs attack sequences, keeps targets in range and clears areas
//! - [`movement`] follows paths, handles obstructions and changes areas
//! - [`session`] wires collaborators together and hosts the pause checkpoint
//! - [`config`] loads engine tuning from TOML
//! - [`clock`] and [`pause`] abstract time and supervisor control
pub mod clock;
pub mod combat;
pub mod config;
pub mod error;
pub mod movement;
pub mod pause;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use combat::{
    AttackCoordinator, AttackKind, AttackSettings, AttackState, CombatRoutine, KiteDistances,
    MonsterStateTracker, RangeOutcome, SafePositionFinder, TrackerLimits,
};
pub use config::{CombatConfig, ConfigError, EngineConfig, MovementConfig};
pub use error::{EngineError, Result};
pub use movement::{
    MoveOpts, MoveOutcome, MovementOrchestrator, PathFollower, Route, TransitionSpec,
    TransitionTable,
};
pub use pause::PauseGate;
pub use session::{Session, SessionBuilder};
