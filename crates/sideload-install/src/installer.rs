//! Remote install operation abstraction.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use thiserror::Error;

use crate::error::BoxError;
use crate::options::InstallOptions;
use crate::payload::ByteStream;

/// A boxed stream of encoded install-log output.
pub type LogStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, BoxError>> + Send>>;

/// External collaborator performing the actual installation on a target.
///
/// The connection or target handle lives inside the implementation and
/// must already be established when an install is invoked; the pipeline
/// only consumes the operation.
///
/// # Contract
///
/// - The implementation may reject before consuming the full byte stream
///   (size, policy, version).
/// - Once it accepts, it consumes the entire byte stream and eventually
///   closes the returned log stream.
pub trait PackageInstaller: Send + Sync {
    /// Error type for rejected or failed installs.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stream `payload` to the target and start the installation,
    /// returning the target's log output stream.
    fn install_stream(
        &self,
        total_size: u64,
        payload: ByteStream,
        options: &InstallOptions,
    ) -> impl Future<Output = std::result::Result<LogStream, Self::Error>> + Send;
}

/// Rejection raised by [`MockInstaller`].
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MockRejection(pub String);

/// Scripted in-memory installer for tests and demos.
///
/// Drains the payload stream, optionally rejecting once a configured
/// number of bytes has been consumed, then replays the scripted log
/// chunks. Received bytes are recorded for assertions; clones share the
/// same record, so a clone kept outside the pipeline can observe what
/// the pipeline's copy consumed.
#[derive(Clone)]
pub struct MockInstaller {
    log_chunks: Vec<Bytes>,
    reject_after: Option<u64>,
    reject_message: String,
    received: Arc<Mutex<Vec<u8>>>,
}

impl MockInstaller {
    pub fn new() -> Self {
        Self {
            log_chunks: Vec::new(),
            reject_after: None,
            reject_message: String::new(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a scripted log chunk emitted after the stream is consumed.
    #[must_use]
    pub fn log(mut self, chunk: impl Into<Bytes>) -> Self {
        self.log_chunks.push(chunk.into());
        self
    }

    /// Reject with `message` once `bytes` payload bytes have arrived.
    #[must_use]
    pub fn reject_after(mut self, bytes: u64, message: impl Into<String>) -> Self {
        self.reject_after = Some(bytes);
        self.reject_message = message.into();
        self
    }

    /// Bytes received so far across installs.
    pub fn received(&self) -> Vec<u8> {
        self.received.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Default for MockInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageInstaller for MockInstaller {
    type Error = MockRejection;

    async fn install_stream(
        &self,
        total_size: u64,
        mut payload: ByteStream,
        _options: &InstallOptions,
    ) -> std::result::Result<LogStream, MockRejection> {
        let mut consumed = 0u64;

        while let Some(chunk) = payload.next().await {
            let chunk = chunk.map_err(|e| MockRejection(e.to_string()))?;
            consumed += chunk.len() as u64;
            if let Ok(mut received) = self.received.lock() {
                received.extend_from_slice(&chunk);
            }
            if let Some(limit) = self.reject_after {
                if consumed >= limit {
                    return Err(MockRejection(self.reject_message.clone()));
                }
            }
        }

        if consumed != total_size {
            return Err(MockRejection(format!(
                "declared {total_size} bytes but received {consumed}"
            )));
        }

        let chunks: Vec<std::result::Result<Bytes, BoxError>> =
            self.log_chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}
