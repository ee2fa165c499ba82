//! Skill identifiers and the frame-based cast timing model.
use std::fmt;
use std::time::Duration;

/// Identifier of a character skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

impl SkillId {
    pub const ATTACK: Self = Self(0);
    pub const FIRE_BOLT: Self = Self(36);
    pub const GLACIAL_SPIKE: Self = Self(55);
    pub const TELEPORT: Self = Self(54);
    pub const BLIZZARD: Self = Self(59);
    pub const CONCENTRATION: Self = Self(113);
    pub const VIGOR: Self = Self(115);
    pub const BLESSED_HAMMER: Self = Self(112);
    pub const FANATICISM: Self = Self(122);
    pub const WHIRLWIND: Self = Self(151);
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

/// Inputs to the casting-frame formula.
///
/// `base_frames` is the class animation length at zero faster-cast-rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastProfile {
    pub base_frames: u32,
    pub faster_cast_rate: u32,
}

impl CastProfile {
    /// Frames are 25 per second; every cast pays one extra 10 ms tick.
    const FRAME_MS: u64 = 40;
    const TICK_MS: u64 = 10;
    const FLOOR_MS: u64 = 300;
    const MAX_EFFECTIVE_FCR: u32 = 75;

    pub const fn new(base_frames: u32, faster_cast_rate: u32) -> Self {
        Self {
            base_frames,
            faster_cast_rate,
        }
    }

    /// Faster-cast-rate after diminishing returns.
    pub fn effective_fcr(&self) -> u32 {
        let fcr = self.faster_cast_rate;
        (120 * fcr / (120 + fcr)).min(Self::MAX_EFFECTIVE_FCR)
    }

    /// Number of animation frames a cast occupies.
    pub fn frames(&self) -> u32 {
        let speed = 256 * (100 + self.effective_fcr()) / 100;
        (256 * self.base_frames).div_ceil(speed).saturating_sub(1)
    }

    /// Wall-clock duration of a cast, never shorter than 300 ms.
    pub fn duration(&self) -> Duration {
        let millis = u64::from(self.frames()) * Self::FRAME_MS + Self::TICK_MS;
        Duration::from_millis(millis.max(Self::FLOOR_MS))
    }
}

impl Default for CastProfile {
    fn default() -> Self {
        Self::new(13, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fcr_uses_base_frames() {
        let profile = CastProfile::new(13, 0);
        assert_eq!(profile.frames(), 12);
        assert_eq!(profile.duration(), Duration::from_millis(490));
    }

    #[test]
    fn fcr_has_diminishing_returns() {
        assert_eq!(CastProfile::new(13, 105).effective_fcr(), 56);
        assert_eq!(CastProfile::new(13, 10_000).effective_fcr(), 75);
    }

    #[test]
    fn duration_is_floored() {
        let fast = CastProfile::new(8, 200);
        assert!(fast.frames() < 7);
        assert_eq!(fast.duration(), Duration::from_millis(300));
    }
}
