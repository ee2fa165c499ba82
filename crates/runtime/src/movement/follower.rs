use std::time::Duration;

use game_core::{PlayerState, Position, SkillId};
use rand::Rng;

use super::state::{Decision, MoveState, Sample};
use super::{MoveOpts, MoveOutcome};
use crate::config::MovementConfig;
use crate::error::{EngineError, Result};
use crate::session::Session;

/// Walks or teleports the player to a destination one path segment at a time.
pub struct PathFollower<'a> {
    session: &'a Session,
}

impl<'a> PathFollower<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Moves toward `destination` until within the arrival tolerance, the
    /// movement timeout passes, or (with `opts.clear_path_radius`) a monster
    /// the session would fight comes within that radius.
    ///
    /// Fails with [`EngineError::NoPath`] when the path finder has no route.
    pub fn move_to(&self, destination: Position, opts: MoveOpts) -> Result<MoveOutcome> {
        let session = self.session;
        let config = &session.config().movement;
        let clock = session.clock();
        let data = session.data();
        let pather = session.pather();

        let mut state = MoveState::new(clock.now(), data.player().position, &opts, config);
        loop {
            session.checkpoint()?;

            let player = data.player();
            let now = clock.now();
            let sample = Sample {
                now,
                position: player.position,
                remaining: player.position.distance_to(destination),
            };
            let (next, decision) = state.decide(&sample, &opts, config);
            state = next;

            match decision {
                Decision::Arrived => return Ok(MoveOutcome::Arrived),
                Decision::TimedOut => {
                    tracing::warn!(
                        "[{}] movement to {} timed out {} tiles short",
                        session.name(),
                        destination,
                        sample.remaining
                    );
                    return Ok(MoveOutcome::TimedOut);
                }
                Decision::Nudge => {
                    tracing::debug!("[{}] stuck at {}, nudging", session.name(), player.position);
                    pather.random_movement();
                }
                Decision::Wait => clock.sleep(config.poll_interval()),
                Decision::Step => {
                    if let Some(radius) = opts.clear_path_radius {
                        if self.monsters_within(player.position, radius) {
                            return Ok(MoveOutcome::MonstersInPath);
                        }
                    }

                    let teleporting = data.can_teleport();
                    self.select_locomotion(&player, teleporting, config);

                    let path = pather.get_path(destination).ok_or(EngineError::NoPath {
                        from: player.position,
                        to: destination,
                    })?;
                    let interval = if teleporting {
                        player.cast_duration()
                    } else {
                        walk_interval(config)
                    };
                    tracing::trace!(
                        "[{}] step toward {} ({} tiles, tolerance {})",
                        session.name(),
                        destination,
                        sample.remaining,
                        state.tolerance()
                    );
                    pather.move_through_path(&path, interval);
                    state = state.stepped(now, interval);
                }
            }
        }
    }

    /// Monsters the routine declines never block the way.
    fn monsters_within(&self, around: Position, radius: i32) -> bool {
        let attacker = self.session.attacker();
        self.session
            .data()
            .monsters()
            .iter()
            .filter(|monster| monster.position.distance_to(around) <= radius)
            .any(|monster| attacker.is_engageable(monster))
    }

    /// Teleport when available, otherwise the movement buff if learned.
    fn select_locomotion(&self, player: &PlayerState, teleporting: bool, config: &MovementConfig) {
        let wanted = if teleporting {
            Some(SkillId::TELEPORT)
        } else {
            config.movement_buff.filter(|skill| player.has_skill(*skill))
        };
        let Some(skill) = wanted else {
            return;
        };
        if player.right_skill == skill {
            return;
        }
        match self.session.data().key_bindings().skill(skill) {
            Some(key) => self.session.hid().press_binding(key),
            None => tracing::debug!("[{}] no key bound for {}", self.session.name(), skill),
        }
    }
}

fn walk_interval(config: &MovementConfig) -> Duration {
    let min = config.walk_interval_min_ms;
    let max = config.walk_interval_max_ms.max(min);
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}
