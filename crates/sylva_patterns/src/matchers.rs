//! Primitive matchers.
//!
//! Each constructor returns a closure from cursor position to
//! [`MatchOutcome`]. Plain matchers report the input cursor itself (it
//! points at the matched unit, so callers can read its value); the unwrap
//! matchers report a cursor scoped one tree level down. All of them
//! consume exactly one unit of the outer stream.

use sylva_tree::{Literal, LiteralKind};

use crate::{Cursor, MatchOutcome};

/// Matches any single unit.
pub fn any_unit<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    |cur: &Cursor<'t>| match cur.peek_one() {
        Some(_) => MatchOutcome::matched(*cur, 1),
        None => MatchOutcome::NoMatch,
    }
}

fn literal_of<'t>(kind: LiteralKind) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    move |cur: &Cursor<'t>| match cur.head() {
        Some(node) if node.value.as_ref().map(Literal::kind) == Some(kind) => {
            MatchOutcome::matched(*cur, 1)
        }
        _ => MatchOutcome::NoMatch,
    }
}

/// Matches an integer literal unit (value present or not).
pub fn int_literal<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    literal_of(LiteralKind::Int)
}

/// Matches a double literal unit.
pub fn double_literal<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    literal_of(LiteralKind::Double)
}

/// Matches a boolean literal unit.
pub fn bool_literal<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    literal_of(LiteralKind::Bool)
}

/// Matches any string literal unit.
pub fn string_literal<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    literal_of(LiteralKind::Str)
}

/// Matches a string literal with exactly this decoded text.
pub fn string_literal_eq<'t>(expected: &str) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    let expected = expected.to_string();
    move |cur: &Cursor<'t>| match cur.head() {
        Some(node) if node.value.as_ref().and_then(Literal::as_str) == Some(expected.as_str()) => {
            MatchOutcome::matched(*cur, 1)
        }
        _ => MatchOutcome::NoMatch,
    }
}

fn token_matching<'t>(
    expected: Vec<String>,
    ignore_case: bool,
) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    move |cur: &Cursor<'t>| {
        let Some(text) = cur.head().and_then(|n| n.token_text()) else {
            return MatchOutcome::NoMatch;
        };
        let hit = expected.is_empty()
            || expected.iter().any(|e| {
                if ignore_case {
                    text.eq_ignore_ascii_case(e)
                } else {
                    text == e
                }
            });
        if hit {
            MatchOutcome::matched(*cur, 1)
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// Matches any token unit (identifier or operator).
pub fn any_token<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    token_matching(Vec::new(), false)
}

/// Matches a token with exactly this text.
pub fn token<'t>(expected: &str) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    token_matching(vec![expected.to_string()], false)
}

/// Matches a token with this text, ignoring ASCII case.
pub fn token_ci<'t>(expected: &str) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    token_matching(vec![expected.to_string()], true)
}

/// Matches a token equal to any of the alternatives.
pub fn token_in<'t>(expected: &[&str]) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    token_matching(expected.iter().map(|s| s.to_string()).collect(), false)
}

/// Matches a token equal to any of the alternatives, ignoring case.
pub fn token_in_ci<'t>(expected: &[&str]) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    token_matching(expected.iter().map(|s| s.to_string()).collect(), true)
}

/// Matches an expression unit, descending into it: the result cursor
/// yields the expression's children. Consumes one outer unit.
pub fn expression<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    |cur: &Cursor<'t>| match cur.peek_one() {
        Some(id) if cur.tree()[id].is_expression => {
            MatchOutcome::matched(Cursor::single(cur.tree(), id), 1)
        }
        _ => MatchOutcome::NoMatch,
    }
}

/// Matches a block unit, descending into it: the result cursor runs over
/// the block's rows (one expression per line). Consumes one outer unit.
pub fn block<'t>() -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    |cur: &Cursor<'t>| match cur.peek_one() {
        Some(id) if cur.tree()[id].is_block => {
            MatchOutcome::matched(Cursor::over(cur.tree(), id), 1)
        }
        _ => MatchOutcome::NoMatch,
    }
}

/// Matches an expression whose first child is a token with this text,
/// descending like [`expression`]. Useful for head-tagged forms.
pub fn expression_headed<'t>(head: &str) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> {
    let head = head.to_string();
    move |cur: &Cursor<'t>| {
        let Some(id) = cur.peek_one() else {
            return MatchOutcome::NoMatch;
        };
        let node = &cur.tree()[id];
        if !node.is_expression {
            return MatchOutcome::NoMatch;
        }
        let first_is_head = node
            .children
            .first()
            .and_then(|&c| cur.tree()[c].token_text())
            .is_some_and(|t| t == head);
        if first_is_head {
            MatchOutcome::matched(Cursor::single(cur.tree(), id), 1)
        } else {
            MatchOutcome::NoMatch
        }
    }
}
