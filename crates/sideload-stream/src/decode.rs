//! Incremental UTF-8 decoding across chunk boundaries.

/// Stateful UTF-8 decoder for text arriving in arbitrary byte chunks.
///
/// A multi-byte sequence split across two chunks is held back until its
/// remaining bytes arrive, so chunking never corrupts the decoded text.
/// Genuinely malformed sequences decode to U+FFFD — log text is
/// diagnostic, so decoding degrades instead of failing.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    ///
    /// An incomplete trailing sequence is carried over to the next call;
    /// the returned string may therefore be empty even for non-empty
    /// input.
    pub fn decode(&mut self, input: &[u8]) -> String {
        self.carry.extend_from_slice(input);
        let data = std::mem::take(&mut self.carry);

        let mut out = String::with_capacity(data.len());
        let mut rest = data.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        out.push_str(s);
                    }
                    match e.error_len() {
                        // Malformed sequence: substitute and move past it.
                        Some(len) => {
                            out.push('\u{FFFD}');
                            rest = &after[len..];
                        }
                        // Incomplete trailing sequence: keep for next chunk.
                        None => {
                            self.carry.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush the decoder at end-of-stream.
    ///
    /// Any held-back incomplete sequence is decoded lossily, since no
    /// continuation bytes can arrive anymore.
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            return String::new();
        }
        let tail = std::mem::take(&mut self.carry);
        String::from_utf8_lossy(&tail).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.decode(b" world"), " world");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn multibyte_split_across_chunks() {
        // "é" is 0xC3 0xA9
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"caf\xC3"), "caf");
        assert_eq!(decoder.decode(b"\xA9!"), "é!");
    }

    #[test]
    fn four_byte_sequence_split_at_every_boundary() {
        // U+1F980, 0xF0 0x9F 0xA6 0x80
        let crab = "🦀".as_bytes();
        for split in 1..crab.len() {
            let mut decoder = Utf8Decoder::new();
            let mut out = decoder.decode(&crab[..split]);
            out.push_str(&decoder.decode(&crab[split..]));
            assert_eq!(out, "🦀", "split at {split}");
            assert_eq!(decoder.finish(), "");
        }
    }

    #[test]
    fn malformed_bytes_become_replacement_chars() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        // A continuation byte with no lead byte.
        assert_eq!(decoder.decode(b"\xA9c"), "\u{FFFD}c");
    }

    #[test]
    fn finish_flushes_incomplete_tail() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"ok\xF0\x9F"), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        // Decoder is reusable after a flush.
        assert_eq!(decoder.decode(b"next"), "next");
    }

    #[test]
    fn chunking_is_irrelevant_to_output() {
        let text = "päckage → installed ✓ 🦀";
        let bytes = text.as_bytes();

        for chunk_size in 1..=bytes.len() {
            let mut decoder = Utf8Decoder::new();
            let mut out = String::new();
            for chunk in bytes.chunks(chunk_size) {
                out.push_str(&decoder.decode(chunk));
            }
            out.push_str(&decoder.finish());
            assert_eq!(out, text, "chunk size {chunk_size}");
        }
    }
}
