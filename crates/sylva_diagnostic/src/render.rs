//! Advisory diagnostic rendering.

use sylva_tree::{context_window, Span};

/// Radius of the excerpt window, in bytes on either side of the span.
const EXCERPT_RADIUS: usize = 50;

/// Render a `"syntax error at ..."` message for consumer-level errors.
///
/// This is advisory display text, not a structured error: match failures are
/// ordinary control flow, and callers decide whether a failed match is worth
/// reporting at all.
pub fn syntax_error_at(source: &str, span: Span, detail: &str) -> String {
    let excerpt = context_window(source, span, EXCERPT_RADIUS);
    let location = if excerpt.is_empty() {
        "end of input"
    } else {
        excerpt
    };
    if detail.is_empty() {
        format!("syntax error at {location}")
    } else {
        format!("syntax error at {location}\n  {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_excerpt_and_detail() {
        let msg = syntax_error_at("SELECT oops FROM t", Span::new(7, 11), "expected a column list");
        assert_eq!(
            msg,
            "syntax error at SELECT oops FROM t\n  expected a column list"
        );
    }

    #[test]
    fn empty_excerpt_names_end_of_input() {
        let msg = syntax_error_at("", Span::new(0, 0), "");
        assert_eq!(msg, "syntax error at end of input");
    }

    #[test]
    fn detail_is_optional() {
        let msg = syntax_error_at("x", Span::new(0, 1), "");
        assert_eq!(msg, "syntax error at x");
    }
}
