//! Error types for the install pipeline.

use thiserror::Error;

/// Boxed error carried from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by [`InstallPipeline`](crate::InstallPipeline).
///
/// The variant records the phase the failure belongs to; the last
/// published progress always reflects that same phase. Decode problems
/// in the log stream are not represented here — log text is diagnostic,
/// so decoding degrades to replacement characters instead of failing.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The payload source was unreachable or returned an unusable
    /// payload. No session was started.
    #[error("payload acquisition failed: {0}")]
    Acquisition(#[source] BoxError),

    /// The payload byte stream failed mid-flight. The last published
    /// progress remains in Transferring.
    #[error("payload stream failed after {transferred} of {total} bytes: {message}")]
    Transfer {
        transferred: u64,
        total: u64,
        message: String,
    },

    /// The remote install operation rejected the package, carrying
    /// whatever message the remote provided.
    #[error("install rejected by target: {0}")]
    Rejected(#[source] BoxError),

    /// The log stream failed after the install was accepted.
    #[error("install log stream failed: {0}")]
    LogStream(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, InstallError>;
