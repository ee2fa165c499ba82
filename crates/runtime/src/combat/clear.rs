use std::collections::HashMap;

use game_core::{Monster, Position, UnitId};

use super::{AttackCoordinator, AttackSettings};
use crate::error::Result;

/// Character-specific choice of how to fight each monster.
///
/// The engine never decides which skill to use; it asks the routine and then
/// runs the returned sequence.
pub trait CombatRoutine: Send + Sync {
    fn attack_settings(&self, target: &Monster) -> AttackSettings;

    /// Monsters the routine refuses to engage (immunities, bosses, ...).
    fn should_skip(&self, _target: &Monster) -> bool {
        false
    }
}

impl AttackCoordinator<'_> {
    /// A valid target the session's routine is willing to fight.
    pub fn is_engageable(&self, monster: &Monster) -> bool {
        self.is_valid_target(monster) && !self.session.routine().should_skip(monster)
    }

    /// Engages valid monsters within `radius` of `center`, nearest first,
    /// until none are left.
    ///
    /// A monster that survives `max_engagements` sequences is left alone.
    /// Non-terminal errors while fighting one monster only drop that monster.
    pub fn clear_area_around(&self, center: Position, radius: i32) -> Result<()> {
        let session = self.session;
        let limit = session.config().combat.max_engagements;
        let mut engagements: HashMap<UnitId, u32> = HashMap::new();

        loop {
            session.checkpoint()?;

            let player = session.data().player().position;
            let routine = session.routine();
            let Some(target) = session
                .data()
                .monsters()
                .into_iter()
                .filter(|monster| monster.position.distance_to(center) <= radius)
                .filter(|monster| self.is_engageable(monster))
                .filter(|monster| engagements.get(&monster.id).copied().unwrap_or(0) < limit)
                .min_by_key(|monster| player.distance_to(monster.position))
            else {
                return Ok(());
            };

            *engagements.entry(target.id).or_default() += 1;
            let settings = routine.attack_settings(&target);
            tracing::debug!(
                "[{}] clearing {} ({}) with {} {}",
                session.name(),
                target.id,
                target.kind,
                settings.kind,
                settings.skill
            );

            match self.attack(&settings) {
                Err(err) if err.is_terminal() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        "[{}] giving up on {} while clearing: {}",
                        session.name(),
                        target.id,
                        err
                    );
                    engagements.insert(target.id, limit);
                }
                Ok(()) => {}
            }
        }
    }
}
