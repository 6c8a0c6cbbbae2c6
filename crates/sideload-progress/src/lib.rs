//! Staged progress model for streaming package installs.
//!
//! An install session moves through three ordered stages: the payload is
//! streamed to the target (Transferring), the target performs the actual
//! installation (Installing), and the session reaches its terminal state
//! (Completed). Byte counts only exist during the transfer, so the model
//! maps them into a sub-range of the overall completion fraction and holds
//! the fraction at a fixed freeze point while the remote install runs.
//!
//! # Key Features
//!
//! - **Pure**: no I/O, no clocks; every `Progress` is recomputed from inputs
//! - **Mechanism-only**: rendering and publication are the caller's concern
//! - **Configurable split**: the transfer/install weighting is a plain field
//!
//! # Example
//!
//! ```
//! use sideload_progress::{Stage, StageModel};
//!
//! let model = StageModel::default();
//! let progress = model.transfer("app.pkg", 512, 1024);
//! assert_eq!(progress.stage, Stage::Transferring);
//! assert_eq!(progress.fraction, Some(0.4));
//! ```

pub use self::progress::{Progress, StageModel, TRANSFER_WEIGHT};
pub use self::stage::Stage;

pub mod rate;

mod progress;
mod stage;
