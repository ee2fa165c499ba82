use std::time::Duration;

use game_core::{MouseButton, SkillId, UnitId};
use strum::Display;

/// Which input an attack sequence fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    /// Left-click skill.
    Primary,
    /// Right-click skill.
    Secondary,
    /// Channelled or area skill fired at whatever is nearest.
    Burst,
}

impl AttackKind {
    pub fn button(self) -> MouseButton {
        match self {
            AttackKind::Primary => MouseButton::Left,
            AttackKind::Secondary | AttackKind::Burst => MouseButton::Right,
        }
    }
}

/// Distances used when keeping away from enemies between attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KiteDistances {
    /// Enemies closer than this trigger a retreat.
    pub danger: i32,
    /// Preferred distance to the nearest enemy after retreating.
    pub safe: i32,
}

/// Parameters of one attack sequence. Immutable while the sequence runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackSettings {
    /// Ignored by [`AttackKind::Burst`], which picks targets itself.
    pub target: UnitId,
    pub kind: AttackKind,
    pub skill: SkillId,
    pub min_distance: i32,
    pub max_distance: i32,
    pub follow_enemy: bool,
    pub stand_still: bool,
    pub aura: Option<SkillId>,
    pub count: u32,
    /// Only used by burst sequences.
    pub timeout: Option<Duration>,
    pub kite: Option<KiteDistances>,
}

impl AttackSettings {
    fn new(kind: AttackKind, target: UnitId, skill: SkillId, count: u32) -> Self {
        Self {
            target,
            kind,
            skill,
            min_distance: 0,
            max_distance: 3,
            follow_enemy: false,
            stand_still: false,
            aura: None,
            count,
            timeout: None,
            kite: None,
        }
    }

    pub fn primary(target: UnitId, skill: SkillId, count: u32) -> Self {
        Self::new(AttackKind::Primary, target, skill, count)
    }

    pub fn secondary(target: UnitId, skill: SkillId, count: u32) -> Self {
        Self::new(AttackKind::Secondary, target, skill, count)
    }

    /// Fires `skill` at the nearest enemy within `max_distance` until
    /// `timeout` elapses.
    pub fn burst(skill: SkillId, max_distance: i32, timeout: Duration) -> Self {
        let mut settings = Self::new(AttackKind::Burst, UnitId::default(), skill, u32::MAX);
        settings.max_distance = max_distance;
        settings.timeout = Some(timeout);
        settings
    }

    pub fn range(mut self, min_distance: i32, max_distance: i32) -> Self {
        self.min_distance = min_distance.max(0);
        self.max_distance = max_distance.max(self.min_distance);
        self
    }

    pub fn follow_enemy(mut self) -> Self {
        self.follow_enemy = true;
        self
    }

    pub fn stand_still(mut self) -> Self {
        self.stand_still = true;
        self
    }

    pub fn with_aura(mut self, aura: SkillId) -> Self {
        self.aura = Some(aura);
        self
    }

    pub fn kite(mut self, danger: i32, safe: i32) -> Self {
        self.kite = Some(KiteDistances { danger, safe });
        self
    }

    /// Copy aimed at a different unit, used when burst re-targets.
    pub(crate) fn aimed_at(&self, target: UnitId) -> Self {
        let mut settings = self.clone();
        settings.target = target;
        settings
    }
}
