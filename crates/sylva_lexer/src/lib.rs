//! sylva_lexer - single-pass structural tokenizer.
//!
//! [`parse`] converts raw text into a [`sylva_tree::Tree`] of
//! block/expression/token/literal nodes: numbers, quoted strings with
//! escapes, operators, comments, namespace-dotted identifiers, and
//! `@name(...)` annotations. Grouping is whitespace- and paren-sensitive:
//! every source line directly inside a block becomes one expression node.
//!
//! The scanner is configurable at runtime via [`ScanSettings`] (operator
//! character set, comment markers, nesting cap).

mod cursor;
mod error;
mod scanner;
mod settings;
mod source_buffer;

pub use cursor::Cursor;
pub use error::ScanError;
pub use scanner::{parse, parse_with};
pub use settings::{ScanSettings, DEFAULT_MAX_DEPTH, DEFAULT_OPERATOR_CHARS};
pub use source_buffer::SourceBuffer;
