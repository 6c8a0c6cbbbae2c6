//! Streaming install pipeline.
//!
//! Pushes a binary payload to a remote install agent over a byte-stream
//! transport, observing staged progress, accumulating the agent's install
//! log, and closing the report with end-to-end throughput.
//!
//! # Architecture
//!
//! The pipeline composes three concerns around two external-collaborator
//! traits:
//!
//! - [`PayloadSource`] resolves a locator into a read-once [`Payload`]
//!   with a size known up front
//! - [`sideload_stream::ProgressTap`] observes the payload bytes on the
//!   way to the target while [`sideload_progress::StageModel`] maps the
//!   counts into staged [`Progress`] values
//! - [`PackageInstaller`] performs the actual installation and hands back
//!   the log stream, drained into the frozen [`LogReport`]
//!
//! One `install` call is one session: a sequential asynchronous task that
//! suspends only while awaiting bytes, acceptance, or log fragments.
//! Cancellation is dropping the future.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use sideload_install::{InstallOptions, InstallPipeline, MockInstaller, Payload};
//!
//! # async fn demo() -> Result<(), sideload_install::InstallError> {
//! let pipeline = InstallPipeline::new(MockInstaller::new().log("Success\n"));
//! let payload = Payload::from_bytes("app.pkg", Bytes::from_static(b"binary"));
//!
//! let report = pipeline.install(payload, InstallOptions::default()).await?;
//! assert!(report.text().starts_with("Success\n"));
//! # Ok(())
//! # }
//! ```

pub use self::error::{BoxError, InstallError, Result};
pub use self::installer::{LogStream, MockInstaller, MockRejection, PackageInstaller};
pub use self::options::InstallOptions;
pub use self::payload::{ByteStream, Payload, PayloadSource};
pub use self::pipeline::InstallPipeline;
pub use self::report::LogReport;

#[cfg(feature = "reqwest")]
pub use self::payload::{HttpPayloadSource, HttpSourceError};

pub use sideload_progress::{Progress, Stage, StageModel, TRANSFER_WEIGHT};

mod error;
mod installer;
mod options;
mod payload;
mod pipeline;
mod report;
