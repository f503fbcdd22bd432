//! Fatal scan errors.
//!
//! Only structural failures abort a parse: an unbalanced closing delimiter
//! or blown nesting cap. Everything else (malformed numbers, unterminated
//! strings) degrades softly inside the tree and never reaches this type.

use thiserror::Error;

/// Fatal tokenizer error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A `)` or `}` appeared with no matching open group.
    #[error("mismatched closing delimiter at byte {offset}")]
    MismatchedCloser {
        /// Byte offset of the stray delimiter.
        offset: u32,
    },

    /// Group nesting exceeded the configured cap.
    #[error("nesting exceeds maximum depth {max_depth} at byte {offset}")]
    TooDeep {
        /// The configured `max_depth`.
        max_depth: usize,
        /// Byte offset of the group that would exceed it.
        offset: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_name_the_offset() {
        let err = ScanError::MismatchedCloser { offset: 12 };
        assert_eq!(err.to_string(), "mismatched closing delimiter at byte 12");
        let err = ScanError::TooDeep {
            max_depth: 64,
            offset: 3,
        };
        assert_eq!(err.to_string(), "nesting exceeds maximum depth 64 at byte 3");
    }
}
