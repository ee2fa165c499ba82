use std::fmt;

use crate::state::ScreenPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Virtual key code as understood by the input backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(pub u16);

impl Key {
    pub const SHIFT: Self = Self(0x10);
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{:#04x}", self.0)
    }
}

/// Synthesized input. These are the only side-effecting primitives the
/// engine uses directly.
pub trait Hid: Send + Sync {
    fn click(&self, button: MouseButton, at: ScreenPoint);

    /// Click while `modifier` is held down.
    fn click_with_modifier(&self, button: MouseButton, at: ScreenPoint, modifier: Key) {
        self.key_down(modifier);
        self.click(button, at);
        self.key_up(modifier);
    }

    fn key_down(&self, key: Key);

    fn key_up(&self, key: Key);

    fn press_binding(&self, key: Key);
}
