//! Common error infrastructure for game-core.
//!
//! Collaborators report failures through [`CollaboratorError`]; callers decide
//! how loudly to report them through [`ErrorSeverity`].
use thiserror::Error;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the control loop moves on to the next target or destination
/// - **Validation**: the request itself was wrong and should not be retried as-is
/// - **Internal**: unexpected inconsistency between collaborators
/// - **Fatal**: the session cannot continue (character died, supervisor stopped it)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if the session must stop.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Failure reported by an opaque collaborator action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("{action} failed: {reason}")]
    Failed {
        action: &'static str,
        reason: String,
    },

    #[error("{action} is not available in the current game state")]
    Unavailable { action: &'static str },
}

impl CollaboratorError {
    pub fn failed(action: &'static str, reason: impl Into<String>) -> Self {
        Self::Failed {
            action,
            reason: reason.into(),
        }
    }
}
