//! Keeping a target within engagement range.
use game_core::{Monster, Path, Position};

use super::{AttackCoordinator, AttackSettings};
use crate::error::{EngineError, Result};
use crate::movement::MoveOpts;

/// Result of one [`AttackCoordinator::ensure_in_range`] tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Within range with line of sight; fire away.
    InRange,
    /// Nothing to do this tick (reposition cooldown, no usable approach point).
    Holding,
    /// Backed off from a stalled target.
    Repositioned,
    /// Moved closer to the target.
    Approached,
    /// Give up on this target; the caller picks another.
    Unreachable,
}

impl AttackCoordinator<'_> {
    /// One step of the range state machine for `monster`.
    ///
    /// `needs_repositioning` is true when the target's stall timer has run past
    /// the stall threshold. Only a missing path is an error.
    pub fn ensure_in_range(
        &self,
        monster: &Monster,
        settings: &AttackSettings,
        needs_repositioning: bool,
    ) -> Result<RangeOutcome> {
        let session = self.session;
        let combat = &session.config().combat;
        let player = session.data().player().position;
        let distance = player.distance_to(monster.position);
        let in_sight = session.pather().line_of_sight(player, monster.position);

        if !needs_repositioning && distance <= settings.max_distance && in_sight {
            // A spent attempt is only refunded once the stall that caused it ends.
            let stalled = session
                .tracker()
                .get(monster.id)
                .is_some_and(|state| state.is_stalled());
            if !stalled {
                session.tracker().reset_attempts(monster.id);
            }
            return Ok(RangeOutcome::InRange);
        }

        if needs_repositioning {
            return self.reposition(monster, player);
        }

        if settings.max_distance <= combat.melee_range {
            tracing::debug!(
                "[{}] closing to melee range of {} at {}",
                session.name(),
                monster.id,
                monster.position
            );
            session.follower().move_to(
                monster.position,
                MoveOpts::with_distance(combat.positioning_tolerance),
            )?;
            return Ok(RangeOutcome::Approached);
        }

        let path = session
            .pather()
            .get_path(monster.position)
            .ok_or(EngineError::NoPath {
                from: player,
                to: monster.position,
            })?;

        match self.approach_point(&path, monster.position, settings) {
            Some(point) => {
                tracing::debug!(
                    "[{}] moving to {} to engage {} ({} tiles away)",
                    session.name(),
                    point,
                    monster.id,
                    point.distance_to(monster.position)
                );
                session
                    .follower()
                    .move_to(point, MoveOpts::with_distance(combat.positioning_tolerance))?;
                Ok(RangeOutcome::Approached)
            }
            None => Ok(RangeOutcome::Holding),
        }
    }

    /// One reposition per stall episode, never twice within the cooldown.
    fn reposition(&self, monster: &Monster, player: Position) -> Result<RangeOutcome> {
        let session = self.session;
        let combat = &session.config().combat;
        let now = session.clock().now();
        let Some(state) = session.tracker().get(monster.id) else {
            return Ok(RangeOutcome::Holding);
        };

        if state.reposition_attempts >= 1 {
            tracing::info!(
                "[{}] {} still takes no damage after repositioning, giving up",
                session.name(),
                monster.id
            );
            return Ok(RangeOutcome::Unreachable);
        }
        if state.repositioned_within(now, combat.reposition_cooldown()) {
            return Ok(RangeOutcome::Holding);
        }

        let destination = session.pather().beyond_position(
            monster.position,
            player,
            combat.reposition_distance,
        );
        tracing::debug!(
            "[{}] {} stalled, repositioning to {}",
            session.name(),
            monster.id,
            destination
        );

        // A failed move still spends the attempt.
        match session.follower().move_to(destination, MoveOpts::default()) {
            Err(err) if err.is_terminal() => return Err(err),
            Err(err) => tracing::warn!("[{}] reposition move failed: {}", session.name(), err),
            Ok(_) => {}
        }

        session
            .tracker()
            .record_reposition(monster.id, session.clock().now());
        Ok(RangeOutcome::Repositioned)
    }

    /// First point on `path` within `[min, max]` of `target` with line of
    /// sight to it. Landing a little short of `min` is accepted.
    fn approach_point(
        &self,
        path: &Path,
        target: Position,
        settings: &AttackSettings,
    ) -> Option<Position> {
        let slack = self.session.config().combat.overshoot_tolerance;
        let pather = self.session.pather();

        for point in path.points() {
            let distance = point.distance_to(target);
            if distance > settings.max_distance {
                continue;
            }
            let within = distance >= settings.min_distance;
            let overshoot = !within && settings.min_distance - distance <= slack;
            if !within && !overshoot {
                break;
            }
            if pather.line_of_sight(*point, target) {
                return Some(*point);
            }
        }
        None
    }
}
