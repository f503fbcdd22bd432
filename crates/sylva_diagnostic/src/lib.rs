//! sylva_diagnostic - source positions and diagnostic rendering.
//!
//! [`SourceText`] answers line/column questions about a source string for
//! error messages; [`syntax_error_at`] renders the advisory
//! `"syntax error at ..."` excerpt. Everything here fails soft: out-of-range
//! lookups return `-1` or an empty string, never a panic.

mod render;
mod source_text;

pub use render::syntax_error_at;
pub use source_text::SourceText;
