//! Target engagement: attack sequences, range keeping, stall detection and
//! area clearing.
mod attack;
mod clear;
mod range;
mod safe_position;
mod settings;
mod tracker;

pub use attack::AttackCoordinator;
pub use clear::CombatRoutine;
pub use range::RangeOutcome;
pub use safe_position::SafePositionFinder;
pub use settings::{AttackKind, AttackSettings, KiteDistances};
pub use tracker::{AttackState, MonsterStateTracker, TrackerLimits};
