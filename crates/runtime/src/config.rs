//! Engine tuning loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock timings. Durations are expressed in milliseconds.
//!
//! ```toml
//! [combat]
//! stall_threshold_ms = 4000
//! force_attack = true
//!
//! [movement]
//! timeout_ms = 20000
//!
//! [[transitions]]
//! from = 7
//! to = 12
//! route = { kind = "fixed_entrance", position = { x = 110, y = 42 } }
//! ```
use std::path::{Path, PathBuf};
use std::time::Duration;

use game_core::{NpcId, SkillId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::TransitionSpec;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete engine configuration shared by every component of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub combat: CombatConfig,
    pub movement: MovementConfig,
    /// Extra (origin, destination) routes; replace built-in ones for the same pair.
    pub transitions: Vec<TransitionSpec>,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub reposition_cooldown_ms: u64,
    /// How long a target may go without damage before it counts as stalled.
    pub stall_threshold_ms: u64,
    pub damage_sample_ms: u64,
    /// Subtracted from the cast duration when pacing attacks.
    pub attack_cycle_slack_ms: u64,
    pub attack_poll_ms: u64,
    /// Tiles to back off from a stalled target.
    pub reposition_distance: i32,
    /// Skills whose max range is at or below this walk onto the target tile.
    pub melee_range: i32,
    /// How far below the minimum range an approach point may land.
    pub overshoot_tolerance: i32,
    pub positioning_tolerance: i32,
    /// Click even without line of sight.
    pub force_attack: bool,
    /// Monster types that may be attacked while standing on unwalkable tiles.
    pub unwalkable_exempt: Vec<NpcId>,
    pub tracker_gc_threshold: usize,
    pub tracker_idle_ttl_ms: u64,
    /// Attack sequences started per monster while clearing an area.
    pub max_engagements: u32,
}

impl CombatConfig {
    pub fn reposition_cooldown(&self) -> Duration {
        Duration::from_millis(self.reposition_cooldown_ms)
    }

    pub fn stall_threshold(&self) -> Duration {
        Duration::from_millis(self.stall_threshold_ms)
    }

    pub fn damage_sample(&self) -> Duration {
        Duration::from_millis(self.damage_sample_ms)
    }

    pub fn attack_cycle_slack(&self) -> Duration {
        Duration::from_millis(self.attack_cycle_slack_ms)
    }

    pub fn attack_poll(&self) -> Duration {
        Duration::from_millis(self.attack_poll_ms)
    }

    pub fn tracker_idle_ttl(&self) -> Duration {
        Duration::from_millis(self.tracker_idle_ttl_ms)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            reposition_cooldown_ms: 2_000,
            stall_threshold_ms: 3_000,
            damage_sample_ms: 100,
            attack_cycle_slack_ms: 120,
            attack_poll_ms: 20,
            reposition_distance: 4,
            melee_range: 3,
            overshoot_tolerance: 2,
            positioning_tolerance: 1,
            force_attack: false,
            unwalkable_exempt: vec![NpcId::BAAL_CRAB],
            tracker_gc_threshold: 100,
            tracker_idle_ttl_ms: 5 * 60 * 1_000,
            max_engagements: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub timeout_ms: u64,
    pub arrival_tolerance: i32,
    /// Tolerance used once progress near the destination stops.
    pub widened_tolerance: i32,
    /// Remaining distance at or below which widening may kick in.
    pub widen_within: i32,
    pub idle_threshold_ms: u64,
    pub poll_interval_ms: u64,
    pub walk_interval_min_ms: u64,
    pub walk_interval_max_ms: u64,
    pub area_sync_attempts: u32,
    pub area_sync_interval_ms: u64,
    pub interrupt_cooldown_ms: u64,
    /// Living monsters this close to the player obstruct movement.
    pub clear_path_radius: i32,
    /// Radius cleared around the player when movement is obstructed.
    pub clear_radius: i32,
    pub pickup_radius: i32,
    /// Obstruction clears per movement call before monsters are ignored.
    pub max_obstruction_clears: u32,
    pub entrance_attempts: u32,
    pub entrance_backoff_ms: u64,
    /// Beyond this distance the entrance is approached with full movement.
    pub entrance_far_distance: i32,
    /// Beyond this distance (and within far) the entrance is clicked.
    pub entrance_click_distance: i32,
    /// Buff kept active while walking when teleport is unavailable.
    pub movement_buff: Option<SkillId>,
}

impl MovementConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn area_sync_interval(&self) -> Duration {
        Duration::from_millis(self.area_sync_interval_ms)
    }

    pub fn interrupt_cooldown(&self) -> Duration {
        Duration::from_millis(self.interrupt_cooldown_ms)
    }

    pub fn entrance_backoff(&self) -> Duration {
        Duration::from_millis(self.entrance_backoff_ms)
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            arrival_tolerance: 2,
            widened_tolerance: 4,
            widen_within: 7,
            idle_threshold_ms: 1_500,
            poll_interval_ms: 100,
            walk_interval_min_ms: 600,
            walk_interval_max_ms: 1_200,
            area_sync_attempts: 10,
            area_sync_interval_ms: 100,
            interrupt_cooldown_ms: 500,
            clear_path_radius: 7,
            clear_radius: 10,
            pickup_radius: 8,
            max_obstruction_clears: 10,
            entrance_attempts: 3,
            entrance_backoff_ms: 500,
            entrance_far_distance: 15,
            entrance_click_distance: 5,
            movement_buff: Some(SkillId::VIGOR),
        }
    }
}
