//! Per-character session: collaborators, shared combat bookkeeping, config.
//!
//! A [`Session`] is what every engine component borrows. It owns nothing
//! mutable of its own apart from the shared [`MonsterStateTracker`], so the
//! coordinator, follower and orchestrator are cheap views created per call.
use std::sync::Arc;
use std::time::Duration;

use game_core::{GameData, Hid, PathFinder, WorldActions};

use crate::clock::{Clock, SystemClock};
use crate::combat::{AttackCoordinator, CombatRoutine, MonsterStateTracker};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::movement::{MovementOrchestrator, PathFollower};
use crate::pause::PauseGate;

pub struct Session {
    name: String,
    data: Arc<dyn GameData>,
    pather: Arc<dyn PathFinder>,
    hid: Arc<dyn Hid>,
    actions: Arc<dyn WorldActions>,
    routine: Arc<dyn CombatRoutine>,
    clock: Arc<dyn Clock>,
    gate: PauseGate,
    tracker: Arc<MonsterStateTracker>,
    config: EngineConfig,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &dyn GameData {
        self.data.as_ref()
    }

    pub fn pather(&self) -> &dyn PathFinder {
        self.pather.as_ref()
    }

    pub fn hid(&self) -> &dyn Hid {
        self.hid.as_ref()
    }

    pub fn actions(&self) -> &dyn WorldActions {
        self.actions.as_ref()
    }

    pub fn routine(&self) -> &dyn CombatRoutine {
        self.routine.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn gate(&self) -> &PauseGate {
        &self.gate
    }

    pub fn tracker(&self) -> &MonsterStateTracker {
        &self.tracker
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cooperative pause point.
    ///
    /// Blocks while the supervisor holds the session paused, then fails with
    /// [`EngineError::Cancelled`] if it was stopped or
    /// [`EngineError::PlayerDied`] if the character is dead.
    pub fn checkpoint(&self) -> Result<()> {
        if !self.gate.wait() {
            tracing::debug!("[{}] stop requested at checkpoint", self.name);
            return Err(EngineError::Cancelled);
        }
        if self.data.player().is_dead() {
            tracing::debug!("[{}] player dead at checkpoint", self.name);
            return Err(EngineError::PlayerDied);
        }
        Ok(())
    }

    /// Blocking wait bracketed by checkpoints on both sides.
    pub fn pause_for(&self, duration: Duration) -> Result<()> {
        self.checkpoint()?;
        self.clock.sleep(duration);
        self.checkpoint()
    }

    pub fn attacker(&self) -> AttackCoordinator<'_> {
        AttackCoordinator::new(self)
    }

    pub fn follower(&self) -> PathFollower<'_> {
        PathFollower::new(self)
    }

    pub fn mover(&self) -> MovementOrchestrator<'_> {
        MovementOrchestrator::new(self)
    }
}

/// Builder for [`Session`].
///
/// Game data, path finder, input, world actions and the combat routine are
/// required; clock, pause gate, tracker and config have defaults.
#[derive(Default)]
pub struct SessionBuilder {
    name: Option<String>,
    data: Option<Arc<dyn GameData>>,
    pather: Option<Arc<dyn PathFinder>>,
    hid: Option<Arc<dyn Hid>>,
    actions: Option<Arc<dyn WorldActions>>,
    routine: Option<Arc<dyn CombatRoutine>>,
    clock: Option<Arc<dyn Clock>>,
    gate: Option<PauseGate>,
    tracker: Option<Arc<MonsterStateTracker>>,
    config: EngineConfig,
}

impl SessionBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Uses one object for every game-facing collaborator.
    pub fn world<W>(self, world: W) -> Self
    where
        W: GameData + PathFinder + Hid + WorldActions + 'static,
    {
        let world = Arc::new(world);
        self.data(world.clone())
            .pather(world.clone())
            .hid(world.clone())
            .actions(world)
    }

    pub fn data(mut self, data: Arc<dyn GameData>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn pather(mut self, pather: Arc<dyn PathFinder>) -> Self {
        self.pather = Some(pather);
        self
    }

    pub fn hid(mut self, hid: Arc<dyn Hid>) -> Self {
        self.hid = Some(hid);
        self
    }

    pub fn actions(mut self, actions: Arc<dyn WorldActions>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn routine(mut self, routine: impl CombatRoutine + 'static) -> Self {
        self.routine = Some(Arc::new(routine));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn gate(mut self, gate: PauseGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Shares monster bookkeeping with other sessions.
    pub fn tracker(mut self, tracker: Arc<MonsterStateTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Session> {
        let data = self.data.ok_or(EngineError::MissingCollaborator("game data"))?;
        let pather = self
            .pather
            .ok_or(EngineError::MissingCollaborator("a path finder"))?;
        let hid = self.hid.ok_or(EngineError::MissingCollaborator("an input device"))?;
        let actions = self
            .actions
            .ok_or(EngineError::MissingCollaborator("world actions"))?;
        let routine = self
            .routine
            .ok_or(EngineError::MissingCollaborator("a combat routine"))?;
        let tracker = self
            .tracker
            .unwrap_or_else(|| Arc::new(MonsterStateTracker::from_config(&self.config.combat)));

        Ok(Session {
            name: self.name.unwrap_or_else(|| "session".to_string()),
            data,
            pather,
            hid,
            actions,
            routine,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            gate: self.gate.unwrap_or_default(),
            tracker,
            config: self.config,
        })
    }
}
