//! The streaming install pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use sideload_progress::{Progress, StageModel, rate};
use sideload_stream::{LogSink, ProgressTap};

use crate::error::{InstallError, Result};
use crate::installer::PackageInstaller;
use crate::options::InstallOptions;
use crate::payload::{Payload, PayloadSource};
use crate::report::LogReport;

/// One install session's mutable state: identity, timing, and the
/// accumulating log. Created per [`InstallPipeline::install`] call and
/// discarded with it; sessions are never reused.
struct InstallSession {
    name: String,
    total_size: u64,
    started: Instant,
    sink: LogSink,
}

/// Orchestrates a streaming install end to end.
///
/// One `install` call runs one sequential session: open the payload
/// stream, wrap it in a progress tap, hand it to the remote install
/// operation, drain the returned log stream, then close the report with a
/// throughput line and a terminal progress value.
///
/// Concurrent sessions against different targets are independent; the
/// pipeline holds no shared mutable state. Running two sessions against
/// the *same* target at once is the caller's responsibility to prevent.
/// Cancellation is dropping the returned future — both streams are
/// released and no further observer callbacks run.
pub struct InstallPipeline<I> {
    installer: I,
    model: StageModel,
}

impl<I: PackageInstaller> InstallPipeline<I> {
    /// Create a pipeline around a remote install operation.
    pub fn new(installer: I) -> Self {
        Self {
            installer,
            model: StageModel::default(),
        }
    }

    /// Override the transfer/install progress weighting.
    #[must_use]
    pub fn with_transfer_weight(mut self, transfer_weight: f64) -> Self {
        self.model = StageModel::new(transfer_weight);
        self
    }

    /// Acquire a payload from `source` and install it.
    ///
    /// Acquisition failures surface as [`InstallError::Acquisition`]
    /// before any session state exists.
    pub async fn install_from<S: PayloadSource>(
        &self,
        source: &S,
        locator: &str,
        options: InstallOptions,
    ) -> Result<LogReport> {
        let payload = source
            .fetch(locator)
            .await
            .map_err(|e| InstallError::Acquisition(Box::new(e)))?;
        self.install(payload, options).await
    }

    /// Run one install session to completion.
    ///
    /// Progress is derived and published on every forwarded payload
    /// chunk, freezes at the transfer weight while the target installs,
    /// and reaches 1.0 exactly when the session completes. On failure the
    /// last published progress reflects the phase the failure occurred
    /// in; no terminal value is published.
    pub async fn install(&self, payload: Payload, options: InstallOptions) -> Result<LogReport> {
        let (name, total_size, stream) = payload.into_parts();
        debug!(name = %name, total_size, "starting streamed install");

        let mut session = InstallSession {
            name,
            total_size,
            started: Instant::now(),
            sink: LogSink::new(),
        };

        // A failure before the first chunk still leaves a phase-correct
        // last progress behind.
        publish(&options, self.model.transfer(&session.name, 0, total_size));

        // Record an upstream stream failure out-of-band so it can be told
        // apart from the installer's own rejection, which is all that
        // surfaces once the stream has been handed over.
        let transfer_failure: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let observed = Arc::new(AtomicU64::new(0));

        let failure_slot = Arc::clone(&transfer_failure);
        let stream = stream.inspect(move |chunk| {
            if let Err(e) = chunk {
                if let Ok(mut slot) = failure_slot.lock() {
                    *slot = Some(e.to_string());
                }
            }
        });

        let model = self.model;
        let tap_name = session.name.clone();
        let tap_observed = Arc::clone(&observed);
        let on_progress = options.on_progress.clone();
        let tapped = ProgressTap::new(stream, move |transferred| {
            tap_observed.store(transferred, Ordering::Relaxed);
            if let Some(callback) = &on_progress {
                callback(&model.transfer(&tap_name, transferred, total_size));
            }
        });

        let log_stream = self
            .installer
            .install_stream(total_size, Box::pin(tapped), &options)
            .await
            .map_err(|e| {
                let transferred = observed.load(Ordering::Relaxed);
                let upstream = transfer_failure
                    .lock()
                    .map(|mut slot| slot.take())
                    .unwrap_or(None);
                match upstream {
                    Some(message) => {
                        warn!(name = %session.name, transferred, message = %message, "payload stream failed");
                        InstallError::Transfer {
                            transferred,
                            total: total_size,
                            message,
                        }
                    }
                    None => {
                        warn!(name = %session.name, transferred, error = %e, "install rejected");
                        InstallError::Rejected(Box::new(e))
                    }
                }
            })?;

        let on_log = options.on_log.clone();
        session
            .sink
            .consume(log_stream, |fragment| {
                if let Some(callback) = &on_log {
                    callback(fragment);
                }
            })
            .await
            .map_err(InstallError::LogStream)?;

        let elapsed = session.started.elapsed();
        let line = format!(
            "Install finished in {}ms at {}MiB/s",
            elapsed.as_millis(),
            rate::format_rate(session.total_size, elapsed),
        );
        session.sink.push_fragment(&line);
        if let Some(callback) = &on_log {
            callback(&line);
        }

        publish(&options, self.model.completed(&session.name, total_size));
        info!(
            name = %session.name,
            total_size,
            elapsed_ms = elapsed.as_millis() as u64,
            "install completed"
        );

        Ok(LogReport::new(session.sink.finish(), total_size, elapsed))
    }
}

fn publish(options: &InstallOptions, progress: Progress) {
    if let Some(callback) = &options.on_progress {
        callback(&progress);
    }
}
