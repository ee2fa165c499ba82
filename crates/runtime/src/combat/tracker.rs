//! Per-monster combat bookkeeping: health history, stall timers and the
//! reposition budget.
//!
//! One [`AttackState`] exists per monster id. It is created the first time
//! the monster is observed and removed when the coordinator gives up on the
//! monster, or by garbage collection once the table grows past its limit.
//! All access goes through a single mutex, and no method calls back into the
//! tracker while holding it.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use game_core::{Monster, Position, UnitId};

use crate::config::CombatConfig;

/// Ephemeral combat state for one monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackState {
    pub last_health: u32,
    pub last_sample_at: Instant,
    /// When the current stall episode began; `None` while damage lands.
    pub stall_started_at: Option<Instant>,
    pub last_reposition_at: Option<Instant>,
    pub reposition_attempts: u32,
    pub last_position: Position,
}

impl AttackState {
    fn new(monster: &Monster, now: Instant) -> Self {
        Self {
            last_health: monster.life.current,
            last_sample_at: now,
            stall_started_at: None,
            last_reposition_at: None,
            reposition_attempts: 0,
            last_position: monster.position,
        }
    }

    pub fn is_stalled(&self) -> bool {
        self.stall_started_at.is_some()
    }

    /// A stall has been running for longer than `threshold`.
    pub fn needs_repositioning(&self, now: Instant, threshold: Duration) -> bool {
        self.stall_started_at
            .is_some_and(|started| now.saturating_duration_since(started) > threshold)
    }

    /// Still inside the cooldown that follows a reposition.
    pub fn repositioned_within(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_reposition_at
            .is_some_and(|at| now.saturating_duration_since(at) < cooldown)
    }

    /// Damage/stall detector. Samples closer together than `interval` are
    /// ignored.
    fn sample(&mut self, monster: &Monster, now: Instant, interval: Duration) {
        if now.saturating_duration_since(self.last_sample_at) < interval {
            return;
        }

        let health = monster.life.current;
        if health < self.last_health {
            self.stall_started_at = None;
            self.reposition_attempts = 0;
        } else if health == self.last_health
            && monster.position == self.last_position
            && self.stall_started_at.is_none()
        {
            self.stall_started_at = Some(now);
        }

        self.last_health = health;
        self.last_sample_at = now;
        self.last_position = monster.position;
    }
}

/// Limits applied by a [`MonsterStateTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerLimits {
    pub sample_interval: Duration,
    /// Garbage collection runs once the table holds more entries than this.
    pub gc_threshold: usize,
    pub idle_ttl: Duration,
}

impl Default for TrackerLimits {
    fn default() -> Self {
        Self::from(&CombatConfig::default())
    }
}

impl From<&CombatConfig> for TrackerLimits {
    fn from(config: &CombatConfig) -> Self {
        Self {
            sample_interval: config.damage_sample(),
            gc_threshold: config.tracker_gc_threshold,
            idle_ttl: config.tracker_idle_ttl(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MonsterStateTracker {
    states: Mutex<HashMap<UnitId, AttackState>>,
    limits: TrackerLimits,
}

impl MonsterStateTracker {
    pub fn new(limits: TrackerLimits) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            limits,
        }
    }

    pub fn from_config(config: &CombatConfig) -> Self {
        Self::new(TrackerLimits::from(config))
    }

    fn table(&self) -> MutexGuard<'_, HashMap<UnitId, AttackState>> {
        // Entries are plain values, a panic elsewhere cannot leave one half-written.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get-or-create the state for `monster` and feed it a health sample.
    pub fn observe(&self, monster: &Monster, now: Instant) -> AttackState {
        let mut states = self.table();

        if let Some(state) = states.get_mut(&monster.id) {
            state.sample(monster, now, self.limits.sample_interval);
            return *state;
        }

        if states.len() > self.limits.gc_threshold {
            let purged = purge_idle(&mut states, now, self.limits.idle_ttl);
            if purged > 0 {
                tracing::debug!("purged {} idle monster states", purged);
            }
        }

        let state = AttackState::new(monster, now);
        states.insert(monster.id, state);
        state
    }

    pub fn get(&self, id: UnitId) -> Option<AttackState> {
        self.table().get(&id).copied()
    }

    pub fn reset_attempts(&self, id: UnitId) {
        if let Some(state) = self.table().get_mut(&id) {
            state.reposition_attempts = 0;
        }
    }

    /// Spends one reposition attempt, stamps the time it happened and
    /// restarts the stall window from there. The spent attempt survives until
    /// damage lands, so a second full stall reports the target unreachable.
    pub fn record_reposition(&self, id: UnitId, now: Instant) {
        if let Some(state) = self.table().get_mut(&id) {
            state.reposition_attempts += 1;
            state.last_reposition_at = Some(now);
            if state.stall_started_at.is_some() {
                state.stall_started_at = Some(now);
            }
        }
    }

    pub fn forget(&self, id: UnitId) {
        self.table().remove(&id);
    }

    /// Drops every entry idle for longer than the configured TTL, regardless
    /// of table size. Returns how many were removed.
    pub fn collect_garbage(&self, now: Instant) -> usize {
        purge_idle(&mut self.table(), now, self.limits.idle_ttl)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

fn purge_idle(states: &mut HashMap<UnitId, AttackState>, now: Instant, ttl: Duration) -> usize {
    let before = states.len();
    states.retain(|_, state| now.saturating_duration_since(state.last_sample_at) <= ttl);
    before - states.len()
}

#[cfg(test)]
mod tests {
    use game_core::NpcId;

    use super::*;

    const STEP: Duration = Duration::from_millis(150);

    fn zombie(life: u32) -> Monster {
        Monster::new(UnitId(7), NpcId::ZOMBIE, Position::new(10, 10), 100).with_life(life)
    }

    trait WithLife {
        fn with_life(self, life: u32) -> Self;
    }

    impl WithLife for Monster {
        fn with_life(mut self, life: u32) -> Self {
            self.life.current = life;
            self
        }
    }

    #[test]
    fn first_observation_creates_unstalled_state() {
        let tracker = MonsterStateTracker::default();
        let now = Instant::now();
        let state = tracker.observe(&zombie(100), now);
        assert!(!state.is_stalled());
        assert_eq!(state.reposition_attempts, 0);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn decreasing_health_never_stalls() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        for (i, life) in (0..10).map(|i| (i, 100 - i * 5)) {
            let state = tracker.observe(&zombie(life), start + STEP * i);
            assert!(!state.is_stalled(), "stalled at sample {i}");
        }
    }

    #[test]
    fn flat_health_on_still_monster_starts_stall_on_next_sample() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        tracker.observe(&zombie(90), start + STEP);
        let state = tracker.observe(&zombie(80), start + STEP * 2);
        assert!(!state.is_stalled());

        let state = tracker.observe(&zombie(80), start + STEP * 3);
        assert_eq!(state.stall_started_at, Some(start + STEP * 3));

        // The timer keeps its original start while the stall continues.
        let state = tracker.observe(&zombie(80), start + STEP * 4);
        assert_eq!(state.stall_started_at, Some(start + STEP * 3));
    }

    #[test]
    fn samples_closer_than_interval_are_ignored() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        let state = tracker.observe(&zombie(100), start + Duration::from_millis(40));
        assert!(!state.is_stalled());
        assert_eq!(state.last_sample_at, start);
    }

    #[test]
    fn moving_without_damage_does_not_start_stall() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        let mut moved = zombie(100);
        moved.position = Position::new(11, 10);
        let state = tracker.observe(&moved, start + STEP);
        assert!(!state.is_stalled());
        assert_eq!(state.last_position, Position::new(11, 10));
    }

    #[test]
    fn damage_resets_attempts_and_stall() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        tracker.observe(&zombie(100), start + STEP);
        tracker.record_reposition(UnitId(7), start + STEP);
        assert_eq!(tracker.get(UnitId(7)).unwrap().reposition_attempts, 1);

        let state = tracker.observe(&zombie(95), start + STEP * 2);
        assert_eq!(state.reposition_attempts, 0);
        assert!(!state.is_stalled());
        // The reposition timestamp survives; only the budget is refunded.
        assert_eq!(state.last_reposition_at, Some(start + STEP));
    }

    #[test]
    fn reposition_restarts_stall_window_and_keeps_attempt() {
        let tracker = MonsterStateTracker::default();
        let threshold = Duration::from_secs(3);
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        tracker.observe(&zombie(100), start + STEP);

        let moved_at = start + STEP + threshold + STEP * 3;
        tracker.record_reposition(UnitId(7), moved_at);
        let state = tracker.observe(&zombie(100), moved_at + STEP);
        assert_eq!(state.stall_started_at, Some(moved_at));
        assert_eq!(state.reposition_attempts, 1);
        assert!(!state.needs_repositioning(moved_at + STEP, threshold));
        assert!(state.needs_repositioning(moved_at + threshold + STEP, threshold));
    }

    #[test]
    fn needs_repositioning_after_threshold() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        let state = tracker.observe(&zombie(100), start + STEP);
        let threshold = Duration::from_secs(3);
        assert!(!state.needs_repositioning(start + STEP + threshold, threshold));
        assert!(state.needs_repositioning(start + STEP + threshold + STEP, threshold));
    }

    #[test]
    fn table_is_collected_once_over_threshold() {
        let limits = TrackerLimits {
            sample_interval: Duration::from_millis(100),
            gc_threshold: 100,
            idle_ttl: Duration::from_secs(300),
        };
        let tracker = MonsterStateTracker::new(limits);
        let start = Instant::now();
        for id in 0..101 {
            let monster = Monster::new(UnitId(id), NpcId::FALLEN, Position::new(1, 1), 10);
            tracker.observe(&monster, start);
        }
        assert_eq!(tracker.len(), 101);

        let later = start + Duration::from_secs(301);
        let fresh = Monster::new(UnitId(500), NpcId::FALLEN, Position::new(2, 2), 10);
        tracker.observe(&fresh, later);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get(UnitId(500)).is_some());
    }

    #[test]
    fn small_table_is_not_collected_implicitly() {
        let tracker = MonsterStateTracker::default();
        let start = Instant::now();
        tracker.observe(&zombie(100), start);
        let later = start + Duration::from_secs(600);
        let other = Monster::new(UnitId(8), NpcId::FALLEN, Position::new(2, 2), 10);
        tracker.observe(&other, later);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.collect_garbage(later), 1);
        assert!(tracker.get(UnitId(7)).is_none());
    }

    #[test]
    fn forget_removes_state() {
        let tracker = MonsterStateTracker::default();
        tracker.observe(&zombie(100), Instant::now());
        tracker.forget(UnitId(7));
        assert!(tracker.is_empty());
    }
}
