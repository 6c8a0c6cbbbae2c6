//! Byte-stream plumbing for streaming installs.
//!
//! # Architecture
//!
//! Three small pieces that compose around any `Stream` of `Bytes` chunks:
//!
//! - [`ProgressTap`] - pass-through transform observing cumulative bytes
//! - [`Utf8Decoder`] - stateful incremental text decoding
//! - [`LogSink`] - arrival-order accumulation of decoded log fragments
//!
//! # Key Features
//!
//! - **Zero-copy forwarding**: the tap hands chunks through untouched
//! - **Boundary-safe decode**: multi-byte sequences split across chunks
//!   survive; malformed input degrades to U+FFFD, never to an error
//! - **Runtime-agnostic**: nothing here spawns or sleeps

pub use self::decode::Utf8Decoder;
pub use self::sink::LogSink;
pub use self::tap::ProgressTap;

mod decode;
mod sink;
mod tap;
