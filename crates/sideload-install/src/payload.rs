//! Payload acquisition.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, stream};

use crate::error::BoxError;

/// A boxed byte stream, the transport-neutral shape payloads move in.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, BoxError>> + Send>>;

/// A binary package ready for streaming to a target.
///
/// The total size is known before streaming begins, and the stream can be
/// read exactly once. A payload is owned by a single install session and
/// discarded after it.
pub struct Payload {
    name: String,
    total_size: u64,
    stream: ByteStream,
}

impl Payload {
    /// Build a payload from its parts. `total_size` must equal the number
    /// of bytes the stream will yield; targets reject mismatches.
    pub fn new(name: impl Into<String>, total_size: u64, stream: ByteStream) -> Self {
        Self {
            name: name.into(),
            total_size,
            stream,
        }
    }

    /// Build a payload from an in-memory blob. Mostly useful for tests
    /// and for packages already held in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: Bytes) -> Self {
        let total_size = bytes.len() as u64;
        let chunk: std::result::Result<Bytes, BoxError> = Ok(bytes);
        Self::new(name, total_size, Box::pin(stream::iter([chunk])))
    }

    /// Display name of the package.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total payload size in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub(crate) fn into_parts(self) -> (String, u64, ByteStream) {
        (self.name, self.total_size, self.stream)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("name", &self.name)
            .field("total_size", &self.total_size)
            .field("stream", &"{ ... }")
            .finish()
    }
}

/// External collaborator that resolves a locator into a [`Payload`].
///
/// Implementations guarantee the total size is known before the stream is
/// read and that the stream yields the payload bytes exactly once.
pub trait PayloadSource: Send + Sync {
    /// Error type for acquisition failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve `locator` (a path, URL, or other address) into a payload.
    fn fetch(
        &self,
        locator: &str,
    ) -> impl Future<Output = std::result::Result<Payload, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::TryStreamExt;
    use thiserror::Error;

    /// Acquisition errors for [`HttpPayloadSource`].
    #[derive(Debug, Error)]
    pub enum HttpSourceError {
        #[error("request failed: {0}")]
        Request(#[from] reqwest::Error),

        /// The response carried no usable Content-Length. Streaming
        /// installs need the total size up front, so this is fatal.
        #[error("missing or invalid Content-Length for {0}")]
        UnknownSize(String),
    }

    /// Production payload source fetching over HTTP with `reqwest`.
    pub struct HttpPayloadSource {
        client: reqwest::Client,
    }

    impl HttpPayloadSource {
        pub fn new() -> Self {
            Self {
                client: reqwest::Client::new(),
            }
        }

        /// Reuse an existing client (connection pools, proxies, TLS
        /// configuration).
        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl Default for HttpPayloadSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PayloadSource for HttpPayloadSource {
        type Error = HttpSourceError;

        async fn fetch(&self, locator: &str) -> std::result::Result<Payload, Self::Error> {
            let response = self.client.get(locator).send().await?.error_for_status()?;

            let total_size = response
                .content_length()
                .ok_or_else(|| HttpSourceError::UnknownSize(locator.to_string()))?;

            let name = locator
                .rsplit('/')
                .next()
                .filter(|tail| !tail.is_empty())
                .unwrap_or(locator)
                .to_string();

            let stream = response
                .bytes_stream()
                .map_err(|e| Box::new(e) as BoxError);

            Ok(Payload::new(name, total_size, Box::pin(stream)))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{HttpPayloadSource, HttpSourceError};

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn from_bytes_knows_its_size() {
        let payload = Payload::from_bytes("app.pkg", Bytes::from_static(b"binary"));
        assert_eq!(payload.name(), "app.pkg");
        assert_eq!(payload.total_size(), 6);

        let (_, _, mut stream) = payload.into_parts();
        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"binary");
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn debug_elides_the_stream() {
        let payload = Payload::from_bytes("app.pkg", Bytes::new());
        let rendered = format!("{payload:?}");
        assert!(rendered.contains("app.pkg"));
        assert!(rendered.contains("{ ... }"));
    }
}
