//! Pure decision core of the path follower.
//!
//! [`MoveState::decide`] looks at one observation of the player and says what
//! the follower should do next. It performs no I/O, so every timing rule is
//! testable with plain `Instant` arithmetic.
use std::time::{Duration, Instant};

use game_core::Position;

use super::MoveOpts;
use crate::config::MovementConfig;

/// One observation taken at the top of a follower tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Sample {
    pub now: Instant,
    pub position: Position,
    /// Distance from the player to the destination.
    pub remaining: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Arrived,
    TimedOut,
    /// Stuck in place for too long; jiggle the character.
    Nudge,
    /// The last movement input is still playing out.
    Wait,
    /// Issue the next movement input.
    Step,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MoveState {
    started_at: Instant,
    previous_position: Position,
    idle_since: Instant,
    previous_remaining: Option<i32>,
    tolerance: i32,
    next_step_at: Option<Instant>,
}

impl MoveState {
    pub fn new(now: Instant, position: Position, opts: &MoveOpts, config: &MovementConfig) -> Self {
        Self {
            started_at: now,
            previous_position: position,
            idle_since: now,
            previous_remaining: None,
            tolerance: opts.distance.unwrap_or(config.arrival_tolerance),
            next_step_at: None,
        }
    }

    pub fn tolerance(&self) -> i32 {
        self.tolerance
    }

    #[must_use]
    pub fn decide(
        mut self,
        sample: &Sample,
        opts: &MoveOpts,
        config: &MovementConfig,
    ) -> (Self, Decision) {
        if sample.now.saturating_duration_since(self.started_at) >= config.timeout() {
            return (self, Decision::TimedOut);
        }
        if sample.remaining <= self.tolerance {
            return (self, Decision::Arrived);
        }

        if sample.position != self.previous_position {
            self.previous_position = sample.position;
            self.idle_since = sample.now;
        } else if sample.now.saturating_duration_since(self.idle_since) >= config.idle_threshold() {
            self.idle_since = sample.now;
            return (self, Decision::Nudge);
        }

        if self.next_step_at.is_some_and(|at| sample.now < at) {
            return (self, Decision::Wait);
        }

        self.tolerance = tolerance_for(
            opts.distance,
            sample.remaining,
            self.previous_remaining,
            config,
        );
        self.previous_remaining = Some(sample.remaining);
        if sample.remaining <= self.tolerance {
            return (self, Decision::Arrived);
        }
        (self, Decision::Step)
    }

    /// Records that a movement input was just issued and will take `interval`.
    #[must_use]
    pub fn stepped(mut self, now: Instant, interval: Duration) -> Self {
        self.next_step_at = Some(now + interval);
        self
    }
}

/// Arrival tolerance for the next step.
///
/// An explicit distance always wins. Otherwise the tolerance widens near the
/// destination when the last step did not bring the player any closer, which
/// stops the follower orbiting a tile it cannot quite reach.
pub(crate) fn tolerance_for(
    requested: Option<i32>,
    remaining: i32,
    previous_remaining: Option<i32>,
    config: &MovementConfig,
) -> i32 {
    if let Some(distance) = requested {
        return distance;
    }
    let not_shrinking = previous_remaining.is_some_and(|previous| remaining >= previous);
    if remaining <= config.widen_within && not_shrinking {
        config.widened_tolerance
    } else {
        config.arrival_tolerance
    }
}
