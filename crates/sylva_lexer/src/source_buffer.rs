//! Sentinel-terminated source buffer.
//!
//! The buffer appends a `0x00` sentinel plus a few zero bytes of padding
//! after the source content, so the scanner's one- and two-byte lookahead
//! never needs a bounds check: reads past the end always see `0x00`, which
//! no token class accepts.

use crate::Cursor;

/// Zero padding after the source: one sentinel byte plus lookahead room.
const PADDING: usize = 8;

/// Sentinel-terminated copy of the source bytes.
///
/// Layout: `[source_bytes..., 0x00 x PADDING]`. The byte at `len()` is the
/// sentinel; everything after it is zero as well.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    buf: Vec<u8>,
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a padded buffer.
    ///
    /// Sources longer than `u32::MAX` bytes saturate `len()`; the scanner
    /// stops at the saturated length.
    pub fn new(source: &str) -> Self {
        let mut buf = Vec::with_capacity(source.len() + PADDING);
        buf.extend_from_slice(source.as_bytes());
        buf.resize(source.len() + PADDING, 0);
        SourceBuffer {
            buf,
            source_len: u32::try_from(source.len()).unwrap_or(u32::MAX),
        }
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes (excludes sentinel padding).
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// The source bytes without sentinel padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_source_has_sentinel() {
        let buf = SourceBuffer::new("");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.as_bytes().is_empty());
        assert!(buf.cursor().is_eof());
    }

    #[test]
    fn content_then_zero_padding() {
        let buf = SourceBuffer::new("abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_bytes(), b"abc");
        let mut cursor = buf.cursor();
        cursor.advance_n(3);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.peek2(), 0);
        assert!(cursor.is_eof());
    }

    #[test]
    fn multibyte_source_is_copied_verbatim() {
        let source = "a\u{1F600}b";
        let buf = SourceBuffer::new(source);
        assert_eq!(buf.len() as usize, source.len());
        assert_eq!(buf.as_bytes(), source.as_bytes());
    }
}
