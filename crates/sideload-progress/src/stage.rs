use std::fmt;

use serde::{Deserialize, Serialize};

/// Stages of an install session.
///
/// Sessions progress through these stages in order:
/// Transferring → Installing → Completed
///
/// A stage is never revisited once left. Byte-level signals exist only
/// during Transferring; the flip to Installing happens the instant the
/// final payload byte has been handed to the target, and Completed is
/// reached only on an explicit completion signal from the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Payload bytes are being streamed to the target.
    #[default]
    Transferring,

    /// All bytes delivered; the target is performing the installation.
    ///
    /// No finer-grained signal exists in this stage, so the completion
    /// fraction holds at the transfer weight until the session completes.
    Installing,

    /// Terminal state; the install finished and the log is frozen.
    Completed,
}

impl Stage {
    /// Returns `true` once the session has reached its terminal stage.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Transferring => write!(f, "Transferring"),
            Stage::Installing => write!(f, "Installing"),
            Stage::Completed => write!(f, "Completed"),
        }
    }
}
