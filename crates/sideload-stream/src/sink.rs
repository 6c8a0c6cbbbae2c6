//! Accumulation of remote install log output.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::decode::Utf8Decoder;

/// Accumulates decoded log fragments into one report string.
///
/// Fragments are appended in strict arrival order; nothing is dropped,
/// reordered, or merged across encoding boundaries. The growing text is
/// readable at any point, and [`LogSink::finish`] freezes it into the
/// final report.
#[derive(Debug, Default)]
pub struct LogSink {
    text: String,
    decoder: Utf8Decoder,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The log accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decode and append one chunk of encoded log bytes.
    ///
    /// Returns the newly appended text, which may be empty while the
    /// decoder waits for the rest of a split multi-byte sequence.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> &str {
        let start = self.text.len();
        let fragment = self.decoder.decode(chunk);
        self.text.push_str(&fragment);
        &self.text[start..]
    }

    /// Append an already-decoded fragment, e.g. a line produced locally.
    pub fn push_fragment(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Drain a log stream to its end, appending every chunk.
    ///
    /// `on_fragment` observes each non-empty decoded fragment as it
    /// arrives. A transport error ends consumption and is returned as-is;
    /// everything accumulated before it is kept.
    pub async fn consume<S, E, F>(&mut self, mut stream: S, mut on_fragment: F) -> Result<(), E>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        F: FnMut(&str),
    {
        while let Some(chunk) = stream.next().await {
            let fragment = self.push_chunk(&chunk?);
            if !fragment.is_empty() {
                on_fragment(fragment);
            }
        }

        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.text.push_str(&tail);
            on_fragment(&tail);
        }

        Ok(())
    }

    /// Freeze the sink into the final report text.
    pub fn finish(mut self) -> String {
        let tail = self.decoder.finish();
        self.text.push_str(&tail);
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use futures_util::stream;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> impl Stream<Item = Result<Bytes, Infallible>> + Unpin {
        stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c))))
    }

    #[tokio::test]
    async fn preserves_arrival_order() {
        let mut sink = LogSink::new();
        sink.consume(
            byte_stream(vec![b"Performing Streamed Install\n", b"Success\n"]),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(sink.finish(), "Performing Streamed Install\nSuccess\n");
    }

    #[tokio::test]
    async fn chunking_invariance() {
        let text = "Streamed install of päckage ✓\nSuccess\n";
        let bytes = text.as_bytes();

        for chunk_size in [1, 2, 3, 5, 7, 64] {
            let chunks: Vec<Result<Bytes, Infallible>> = bytes
                .chunks(chunk_size)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();

            let mut sink = LogSink::new();
            sink.consume(stream::iter(chunks), |_| {}).await.unwrap();
            assert_eq!(sink.finish(), text, "chunk size {chunk_size}");
        }
    }

    #[tokio::test]
    async fn fragments_are_observable_in_order() {
        let mut seen = Vec::new();
        let mut sink = LogSink::new();
        sink.consume(byte_stream(vec![b"one ", b"two ", b"three"]), |f| {
            seen.push(f.to_string());
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["one ", "two ", "three"]);
        assert_eq!(sink.text(), "one two three");
    }

    #[tokio::test]
    async fn transport_error_keeps_partial_log() {
        let chunks = vec![
            Ok(Bytes::from_static(b"partial ")),
            Err("connection reset"),
        ];
        let mut sink = LogSink::new();
        let err = sink.consume(stream::iter(chunks), |_| {}).await.unwrap_err();

        assert_eq!(err, "connection reset");
        assert_eq!(sink.text(), "partial ");
    }

    #[tokio::test]
    async fn local_fragments_interleave() {
        let mut sink = LogSink::new();
        sink.consume(byte_stream(vec![b"Success\n"]), |_| {})
            .await
            .unwrap();
        sink.push_fragment("Install finished in 1000ms at 10.00MiB/s");

        assert_eq!(
            sink.finish(),
            "Success\nInstall finished in 1000ms at 10.00MiB/s"
        );
    }
}
