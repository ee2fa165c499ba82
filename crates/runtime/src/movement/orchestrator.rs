use std::time::Instant;

use game_core::{AreaId, Exit, ExitKind, GameData, MouseButton, Position};

use super::{MoveOpts, MoveOutcome, Route, TransitionTable};
use crate::error::{EngineError, Result};
use crate::session::Session;

/// High-level movement: destinations that may move, clearing monsters that
/// block the way, and changing areas.
pub struct MovementOrchestrator<'a> {
    session: &'a Session,
    transitions: TransitionTable,
    last_interrupt: Option<Instant>,
}

impl<'a> MovementOrchestrator<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            transitions: TransitionTable::with_overrides(&session.config().transitions),
            last_interrupt: None,
        }
    }

    /// Moves toward whatever position `target` yields, re-evaluating it after
    /// every interruption. Returns once arrived, timed out, or once `target`
    /// yields nothing.
    pub fn move_to<F>(&mut self, target: F) -> Result<()>
    where
        F: FnMut(&dyn GameData) -> Option<Position>,
    {
        self.move_with(target, None)
    }

    pub fn move_to_position(&mut self, destination: Position) -> Result<()> {
        self.move_with(|_| Some(destination), None)
    }

    fn move_with<F>(&mut self, mut target: F, distance: Option<i32>) -> Result<()>
    where
        F: FnMut(&dyn GameData) -> Option<Position>,
    {
        let session = self.session;
        let config = &session.config().movement;
        let mut clears = 0;

        loop {
            session.checkpoint()?;
            self.wait_for_area_sync()?;

            let Some(destination) = target(session.data()) else {
                tracing::debug!("[{}] movement target vanished", session.name());
                return Ok(());
            };

            let mut opts = MoveOpts {
                distance,
                clear_path_radius: None,
            };
            if clears < config.max_obstruction_clears {
                opts = opts.clear_path(config.clear_path_radius);
            }

            match session.follower().move_to(destination, opts)? {
                MoveOutcome::Arrived => return Ok(()),
                MoveOutcome::TimedOut => {
                    tracing::warn!("[{}] gave up moving to {}", session.name(), destination);
                    return Ok(());
                }
                MoveOutcome::MonstersInPath => {
                    let now = session.clock().now();
                    if self
                        .last_interrupt
                        .is_some_and(|at| now.saturating_duration_since(at) < config.interrupt_cooldown())
                    {
                        session.pause_for(config.poll_interval())?;
                        continue;
                    }
                    self.last_interrupt = Some(now);
                    clears += 1;

                    let center = session.data().player().position;
                    tracing::debug!(
                        "[{}] monsters in the way at {}, clearing (#{})",
                        session.name(),
                        center,
                        clears
                    );
                    session.attacker().clear_area_around(center, config.clear_radius)?;
                    if let Err(err) = session.actions().pickup_items(config.pickup_radius) {
                        tracing::warn!("[{}] pickup after clearing failed: {}", session.name(), err);
                    }
                }
            }
        }
    }

    /// Moves into `destination`, through a special route when one is known
    /// and otherwise through the matching exit of the current area.
    pub fn move_to_area(&mut self, destination: AreaId) -> Result<()> {
        let session = self.session;
        session.checkpoint()?;
        self.wait_for_area_sync()?;

        let origin = session.data().area();
        if origin == destination {
            return Ok(());
        }
        tracing::info!("[{}] moving from {} to {}", session.name(), origin, destination);

        if let Some(route) = self.transitions.lookup(origin, destination).cloned() {
            self.follow_route(destination, &route)?;
        } else {
            let exit = session
                .data()
                .exits()
                .into_iter()
                .find(|exit| exit.to == destination)
                .ok_or(EngineError::NoExit {
                    from: origin,
                    to: destination,
                })?;

            match exit.kind {
                ExitKind::Entrance => {
                    self.move_to_position(exit.position)?;
                    self.interact_with_entrance(&exit)?;
                }
                ExitKind::Walkable => {
                    self.move_with(|_| Some(exit.position), Some(0))?;
                    if !self.wait_for_area(destination)? {
                        tracing::warn!(
                            "[{}] walked onto exit at {} without leaving {}",
                            session.name(),
                            exit.position,
                            origin
                        );
                    }
                }
            }
        }

        self.wait_for_area_sync()?;
        let actual = session.data().area();
        if actual != destination {
            return Err(EngineError::AreaMismatch {
                expected: destination,
                actual,
            });
        }
        tracing::info!("[{}] arrived in {}", session.name(), destination);
        Ok(())
    }

    fn follow_route(&mut self, destination: AreaId, route: &Route) -> Result<()> {
        tracing::debug!("[{}] using special route {:?}", self.session.name(), route);
        let portal = match route {
            Route::FixedEntrance { position } => *position,
            Route::Waypoints { steps, portal } => {
                for step in steps {
                    self.move_to_position(*step)?;
                }
                *portal
            }
        };
        let exit = Exit::entrance(destination, portal);
        self.move_to_position(portal)?;
        self.interact_with_entrance(&exit)
    }

    /// Gets through an entrance, retrying with a backoff.
    ///
    /// Far away it walks closer first, at mid range it clicks the entrance on
    /// screen, and up close it asks the world to interact directly.
    pub fn interact_with_entrance(&mut self, exit: &Exit) -> Result<()> {
        let session = self.session;
        let config = &session.config().movement;

        for attempt in 1..=config.entrance_attempts {
            session.checkpoint()?;
            if session.data().area() == exit.to {
                return Ok(());
            }

            let distance = session.pather().distance_from_me(exit.position);
            let result = if distance > config.entrance_far_distance {
                self.move_to_position(exit.position)
            } else if distance > config.entrance_click_distance {
                let at = session.pather().game_coords_to_screen(exit.position);
                session.hid().click(MouseButton::Left, at);
                Ok(())
            } else {
                session
                    .actions()
                    .interact_entrance(exit)
                    .map_err(EngineError::from)
            };

            match result {
                Err(err) if err.is_terminal() => return Err(err),
                Err(err) => tracing::warn!(
                    "[{}] entrance to {} attempt {}/{} failed: {}",
                    session.name(),
                    exit.to,
                    attempt,
                    config.entrance_attempts,
                    err
                ),
                Ok(()) => {
                    if self.wait_for_area(exit.to)? {
                        return Ok(());
                    }
                    tracing::warn!(
                        "[{}] entrance to {} attempt {}/{} did not change area",
                        session.name(),
                        exit.to,
                        attempt,
                        config.entrance_attempts
                    );
                }
            }

            session.pause_for(config.entrance_backoff())?;
        }

        Err(EngineError::EntranceInteraction {
            area: exit.to,
            attempts: config.entrance_attempts,
        })
    }

    /// Polls until the loaded map data matches the player's area. A timeout
    /// is only logged; the caller carries on with possibly stale data.
    pub fn wait_for_area_sync(&self) -> Result<bool> {
        let session = self.session;
        let config = &session.config().movement;
        for _ in 0..config.area_sync_attempts {
            if session.data().loaded_area() == session.data().area() {
                return Ok(true);
            }
            session.pause_for(config.area_sync_interval())?;
        }
        tracing::warn!(
            "[{}] map data still out of sync with {}",
            session.name(),
            session.data().area()
        );
        Ok(false)
    }

    fn wait_for_area(&self, area: AreaId) -> Result<bool> {
        let session = self.session;
        let config = &session.config().movement;
        for _ in 0..config.area_sync_attempts {
            if session.data().area() == area {
                return Ok(true);
            }
            session.pause_for(config.area_sync_interval())?;
        }
        Ok(session.data().area() == area)
    }
}
