//! Attack sequences against a single target or whatever is nearest.
use std::collections::HashSet;
use std::time::{Duration, Instant};

use game_core::{Monster, MouseButton, PlayerState, Position, SkillId, UnitId};

use super::range::RangeOutcome;
use super::{AttackKind, AttackSettings, KiteDistances, SafePositionFinder};
use crate::error::Result;
use crate::movement::MoveOpts;
use crate::session::Session;

/// Drives attack sequences for one session.
///
/// Cheap to construct; all persistent per-monster state lives in the
/// session's [`super::MonsterStateTracker`].
pub struct AttackCoordinator<'a> {
    pub(super) session: &'a Session,
}

impl<'a> AttackCoordinator<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Runs one attack sequence to completion.
    ///
    /// Ends once `settings.count` attacks have been fired, the target dies or
    /// becomes invalid, it drifts out of range without `follow_enemy`, or it
    /// turns out to be unreachable. Burst settings are forwarded to
    /// [`Self::burst_attack`].
    pub fn attack(&self, settings: &AttackSettings) -> Result<()> {
        if settings.kind == AttackKind::Burst {
            return self.burst_attack(settings);
        }

        let session = self.session;
        let combat = &session.config().combat;
        let clock = session.clock();

        let mut remaining = settings.count;
        let mut first_tick = true;
        let mut last_attack: Option<Instant> = None;
        let mut last_kite: Option<Instant> = None;

        while remaining > 0 {
            session.checkpoint()?;

            let Some(monster) = self.valid_target(settings.target) else {
                tracing::debug!("[{}] target {} gone", session.name(), settings.target);
                return Ok(());
            };
            let player = session.data().player();
            let distance = player.position.distance_to(monster.position);
            if !settings.follow_enemy && !first_tick && distance > settings.max_distance {
                tracing::debug!(
                    "[{}] {} drifted out of range ({} > {})",
                    session.name(),
                    monster.id,
                    distance,
                    settings.max_distance
                );
                return Ok(());
            }

            let now = clock.now();
            let state = session.tracker().observe(&monster, now);
            let needs_repositioning = state.needs_repositioning(now, combat.stall_threshold());
            if self.ensure_in_range(&monster, settings, needs_repositioning)?
                == RangeOutcome::Unreachable
            {
                session.tracker().forget(monster.id);
                return Ok(());
            }

            if first_tick {
                if let Some(aura) = settings.aura {
                    self.select_skill(aura, MouseButton::Right, &player);
                }
                first_tick = false;
            }

            if let Some(kite) = settings.kite {
                self.keep_distance(&monster, settings, kite, &mut last_kite)?;
            }

            let player = session.data().player();
            if !self.cadence_ready(last_attack, &player) {
                clock.sleep(combat.attack_poll());
                continue;
            }

            if self.fire(&monster, settings, &player) {
                remaining -= 1;
                last_attack = Some(clock.now());
            } else {
                clock.sleep(combat.attack_poll());
            }
        }

        Ok(())
    }

    /// Fires `settings.skill` at the nearest valid enemy within
    /// `settings.max_distance` until `settings.timeout` elapses or no enemy
    /// is left. Targets found unreachable are skipped for the rest of the
    /// burst.
    pub fn burst_attack(&self, settings: &AttackSettings) -> Result<()> {
        let session = self.session;
        let combat = &session.config().combat;
        let clock = session.clock();
        let timeout = settings.timeout.unwrap_or(Duration::ZERO);
        let started = clock.now();

        let mut abandoned: HashSet<UnitId> = HashSet::new();
        let mut first_tick = true;
        let mut last_attack: Option<Instant> = None;

        loop {
            session.checkpoint()?;
            if clock.elapsed_since(started) >= timeout {
                return Ok(());
            }

            let player = session.data().player();
            let Some(target) =
                self.nearest_valid_target(player.position, settings.max_distance, &abandoned)
            else {
                tracing::debug!("[{}] burst found no target", session.name());
                return Ok(());
            };

            let now = clock.now();
            let state = session.tracker().observe(&target, now);
            let stalled = state.needs_repositioning(now, combat.stall_threshold());
            let in_sight = session
                .pather()
                .line_of_sight(player.position, target.position);

            if !in_sight || stalled {
                let aimed = settings.aimed_at(target.id);
                match self.ensure_in_range(&target, &aimed, stalled)? {
                    RangeOutcome::Unreachable => {
                        session.tracker().forget(target.id);
                        abandoned.insert(target.id);
                    }
                    RangeOutcome::Holding => clock.sleep(combat.attack_poll()),
                    _ => {}
                }
                continue;
            }

            if first_tick {
                if let Some(aura) = settings.aura {
                    self.select_skill(aura, MouseButton::Right, &player);
                }
                first_tick = false;
            }

            if !self.cadence_ready(last_attack, &player) {
                clock.sleep(combat.attack_poll());
                continue;
            }

            if self.fire(&target, settings, &player) {
                last_attack = Some(clock.now());
            } else {
                clock.sleep(combat.attack_poll());
            }
        }
    }

    /// Present, alive, and standing somewhere walkable. Monsters listed in
    /// `unwalkable_exempt` may stand anywhere.
    pub fn is_valid_target(&self, monster: &Monster) -> bool {
        monster.is_alive()
            && (self.session.data().is_walkable(monster.position)
                || self
                    .session
                    .config()
                    .combat
                    .unwalkable_exempt
                    .contains(&monster.npc))
    }

    fn valid_target(&self, id: UnitId) -> Option<Monster> {
        self.session
            .data()
            .monster(id)
            .filter(|monster| self.is_valid_target(monster))
    }

    fn nearest_valid_target(
        &self,
        from: Position,
        max_distance: i32,
        skip: &HashSet<UnitId>,
    ) -> Option<Monster> {
        self.session
            .data()
            .monsters()
            .into_iter()
            .filter(|monster| !skip.contains(&monster.id))
            .filter(|monster| from.distance_to(monster.position) <= max_distance)
            .filter(|monster| self.is_valid_target(monster))
            .min_by_key(|monster| from.distance_to(monster.position))
    }

    /// The previous attack's cast animation has (nearly) finished.
    fn cadence_ready(&self, last_attack: Option<Instant>, player: &PlayerState) -> bool {
        let slack = self.session.config().combat.attack_cycle_slack();
        let cycle = player.cast_duration().saturating_sub(slack);
        last_attack.is_none_or(|at| self.session.clock().elapsed_since(at) > cycle)
    }

    /// Clicks at `monster` with the configured skill. Returns whether an
    /// attack was actually issued.
    fn fire(&self, monster: &Monster, settings: &AttackSettings, player: &PlayerState) -> bool {
        let session = self.session;
        let in_sight = session
            .pather()
            .line_of_sight(player.position, monster.position);
        if !in_sight && !session.config().combat.force_attack {
            tracing::trace!("[{}] no line of sight to {}", session.name(), monster.id);
            return false;
        }

        let button = settings.kind.button();
        self.select_skill(settings.skill, button, player);

        let at = session.pather().game_coords_to_screen(monster.position);
        if settings.stand_still {
            let modifier = session.data().key_bindings().stand_still;
            session.hid().click_with_modifier(button, at, modifier);
        } else {
            session.hid().click(button, at);
        }
        true
    }

    /// Presses the binding for `skill` unless it is already active on `button`.
    pub(crate) fn select_skill(
        &self,
        skill: SkillId,
        button: MouseButton,
        player: &PlayerState,
    ) {
        let active = match button {
            MouseButton::Left => player.left_skill,
            MouseButton::Right => player.right_skill,
        };
        if active == skill {
            return;
        }
        match self.session.data().key_bindings().skill(skill) {
            Some(key) => self.session.hid().press_binding(key),
            None => tracing::debug!("[{}] no key bound for {}", self.session.name(), skill),
        }
    }

    /// Retreats to a safe spot when an enemy is inside the danger radius, at
    /// most once per reposition cooldown.
    fn keep_distance(
        &self,
        target: &Monster,
        settings: &AttackSettings,
        kite: KiteDistances,
        last_kite: &mut Option<Instant>,
    ) -> Result<()> {
        let session = self.session;
        let combat = &session.config().combat;
        let now = session.clock().now();
        if last_kite.is_some_and(|at| now.saturating_duration_since(at) < combat.reposition_cooldown())
        {
            return Ok(());
        }

        let player = session.data().player().position;
        let threatened = session
            .data()
            .monsters()
            .iter()
            .filter(|monster| monster.is_alive())
            .any(|monster| player.distance_to(monster.position) < kite.danger);
        if !threatened {
            return Ok(());
        }

        let finder = SafePositionFinder::new(session.data(), session.pather());
        let Some(spot) = finder.find(
            target,
            kite.danger,
            kite.safe,
            settings.min_distance,
            settings.max_distance,
        ) else {
            tracing::debug!("[{}] no safe spot away from {}", session.name(), target.id);
            return Ok(());
        };

        *last_kite = Some(now);
        tracing::debug!("[{}] kiting to {}", session.name(), spot);
        match session
            .follower()
            .move_to(spot, MoveOpts::with_distance(combat.positioning_tolerance))
        {
            Err(err) if err.is_terminal() => Err(err),
            Err(err) => {
                tracing::warn!("[{}] kite move failed: {}", session.name(), err);
                Ok(())
            }
            Ok(_) => Ok(()),
        }
    }
}
