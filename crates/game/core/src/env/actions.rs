use crate::error::CollaboratorError;
use crate::state::Exit;

/// Higher-level actions owned by other subsystems (item pickup, level
/// interaction). The engine only observes success or failure.
pub trait WorldActions: Send + Sync {
    /// Picks up worthwhile ground items within `radius` tiles of the player.
    fn pickup_items(&self, radius: i32) -> Result<(), CollaboratorError>;

    /// Interacts with the entrance object of `exit` from close range.
    fn interact_entrance(&self, exit: &Exit) -> Result<(), CollaboratorError>;
}
