//! Errors surfaced by the engine.
//!
//! Only hard failures are errors. An unreachable target or a movement that
//! ran out of time is reported through return values instead, so callers can
//! move on to the next target or destination.
use game_core::{AreaId, CollaboratorError, ErrorSeverity, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The character died. Every layer forwards this without further action.
    #[error("player died")]
    PlayerDied,

    /// The supervisor stopped the session.
    #[error("session cancelled by supervisor")]
    Cancelled,

    #[error("no path from {from} to {to}")]
    NoPath { from: Position, to: Position },

    #[error("no known exit from {from} to {to}")]
    NoExit { from: AreaId, to: AreaId },

    #[error("could not enter {area} after {attempts} attempts")]
    EntranceInteraction { area: AreaId, attempts: u32 },

    #[error("expected to be in {expected}, still in {actual}")]
    AreaMismatch { expected: AreaId, actual: AreaId },

    #[error("session requires {0} to be configured before building")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl EngineError {
    /// True for the conditions that end the whole session rather than the
    /// current action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PlayerDied | Self::Cancelled)
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PlayerDied | Self::Cancelled => ErrorSeverity::Fatal,
            Self::NoPath { .. }
            | Self::EntranceInteraction { .. }
            | Self::AreaMismatch { .. }
            | Self::Collaborator(_) => ErrorSeverity::Recoverable,
            Self::NoExit { .. } => ErrorSeverity::Validation,
            Self::MissingCollaborator(_) => ErrorSeverity::Internal,
        }
    }
}
