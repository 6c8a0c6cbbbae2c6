//! Pass-through stream transform that observes cumulative byte counts.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;

/// A stream wrapper that counts the bytes flowing through it.
///
/// Chunks are forwarded unchanged — same `Bytes`, same boundaries — and
/// after each successful chunk the callback is invoked synchronously with
/// the new cumulative count, in delivery order, never coalesced. The tap
/// holds no state beyond the running counter.
///
/// Errors and end-of-stream pass through untouched; once either is seen
/// from the inner stream, the tap is fused and no further callback
/// invocations happen.
pub struct ProgressTap<S, F> {
    inner: S,
    observed: u64,
    done: bool,
    on_chunk: F,
}

impl<S, F> ProgressTap<S, F> {
    /// Wrap `inner`, invoking `on_chunk` with the cumulative byte count
    /// after every forwarded chunk.
    ///
    /// The callback runs inline at the stream's suspension point and must
    /// not block.
    pub fn new(inner: S, on_chunk: F) -> Self {
        Self {
            inner,
            observed: 0,
            done: false,
            on_chunk,
        }
    }

    /// Bytes observed so far.
    pub fn observed(&self) -> u64 {
        self.observed
    }
}

impl<S, E, F> Stream for ProgressTap<S, F>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    F: FnMut(u64) + Unpin,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.observed += chunk.len() as u64;
                (this.on_chunk)(this.observed);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
