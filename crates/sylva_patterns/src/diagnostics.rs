//! Match-failure rendering.

use sylva_diagnostic::syntax_error_at;
use sylva_tree::Span;

use crate::Cursor;

/// Render an advisory `"syntax error at ..."` message for the cursor's
/// position, excerpting the source around the head unit. At end of input
/// the message says so instead.
pub fn syntax_error(cursor: &Cursor<'_>, detail: &str) -> String {
    match cursor.head() {
        Some(node) => syntax_error_at(cursor.tree().source(), node.span, detail),
        // No head unit: an empty excerpt renders as "end of input".
        None => syntax_error_at("", Span::DUMMY, detail),
    }
}
