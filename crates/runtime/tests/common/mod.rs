#![allow(dead_code)]

use std::sync::Arc;

use game_core::{Immunities, Monster, SkillId};
use game_sandbox::SandboxWorld;
use runtime::{
    AttackSettings, CombatRoutine, EngineConfig, ManualClock, MonsterStateTracker, PauseGate,
    Session, SessionBuilder,
};

/// Blizzard at anything within 20 tiles; refuses cold-immune monsters.
pub struct BlizzardRoutine;

impl CombatRoutine for BlizzardRoutine {
    fn attack_settings(&self, target: &Monster) -> AttackSettings {
        AttackSettings::secondary(target.id, SkillId::BLIZZARD, 10).range(0, 20)
    }

    fn should_skip(&self, target: &Monster) -> bool {
        target.is_immune_to(Immunities::COLD)
    }
}

pub struct Harness {
    pub world: SandboxWorld,
    pub clock: Arc<ManualClock>,
    pub gate: PauseGate,
    pub session: Session,
}

pub fn harness(world: &SandboxWorld) -> Harness {
    harness_with(world, EngineConfig::default())
}

pub fn harness_with(world: &SandboxWorld, config: EngineConfig) -> Harness {
    build(world, Session::builder().config(config))
}

/// Session on its own clock that shares `tracker` with other sessions.
pub fn harness_sharing(
    world: &SandboxWorld,
    name: &str,
    tracker: Arc<MonsterStateTracker>,
) -> Harness {
    build(world, Session::builder().name(name).tracker(tracker))
}

fn build(world: &SandboxWorld, builder: SessionBuilder) -> Harness {
    let clock = Arc::new(ManualClock::new());
    let gate = PauseGate::new();
    let session = builder
        .world(world.clone())
        .routine(BlizzardRoutine)
        .clock(clock.clone())
        .gate(gate.clone())
        .build()
        .expect("all collaborators provided");
    Harness {
        world: world.clone(),
        clock,
        gate,
        session,
    }
}
