//! Getting the player somewhere: single destinations, obstruction handling
//! and area transitions.
mod follower;
mod orchestrator;
mod state;
mod transitions;

pub use follower::PathFollower;
pub use orchestrator::MovementOrchestrator;
pub use transitions::{Route, TransitionSpec, TransitionTable};

/// Per-call movement options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOpts {
    /// Arrival distance; replaces the default and disables widening.
    pub distance: Option<i32>,
    /// Stop with [`MoveOutcome::MonstersInPath`] when a living monster is
    /// this close before a step.
    pub clear_path_radius: Option<i32>,
}

impl MoveOpts {
    pub fn with_distance(distance: i32) -> Self {
        Self {
            distance: Some(distance),
            ..Self::default()
        }
    }

    pub fn clear_path(mut self, radius: i32) -> Self {
        self.clear_path_radius = Some(radius);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Arrived,
    /// Gave up after the movement timeout; not an error.
    TimedOut,
    MonstersInPath,
}
