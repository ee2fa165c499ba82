use std::time::Duration;

use crate::state::{Position, ScreenPoint};

/// Ordered list of tiles from the player towards a destination.
///
/// The first element is the first tile to step on; the player's own tile is
/// not included.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Path(pub Vec<Position>);

impl Path {
    pub fn new(points: Vec<Position>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Position] {
        &self.0
    }

    pub fn destination(&self) -> Option<Position> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Geometry and locomotion primitives over the loaded map.
pub trait PathFinder: Send + Sync {
    /// Path from the player to `to`, or `None` when the tile cannot be reached.
    fn get_path(&self, to: Position) -> Option<Path>;

    fn distance_from_me(&self, to: Position) -> i32;

    fn line_of_sight(&self, from: Position, to: Position) -> bool;

    /// Issues the next locomotion input along `path`. `step` is how long the
    /// caller will wait before issuing another one.
    fn move_through_path(&self, path: &Path, step: Duration);

    /// Point `distance` tiles past `dest` on the ray from `start` through `dest`.
    fn beyond_position(&self, start: Position, dest: Position, distance: i32) -> Position;

    fn game_coords_to_screen(&self, position: Position) -> ScreenPoint;

    /// Small random step used to shake the character loose when stuck.
    fn random_movement(&self);
}
