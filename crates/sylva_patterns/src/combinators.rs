//! Higher-order matchers.

use crate::{Cursor, MatchFn, MatchOutcome};

/// Always matches: delegates to `inner` and substitutes a zero-width
/// success when it fails.
pub fn optional<'t, M>(inner: M) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t>
where
    M: Fn(&Cursor<'t>) -> MatchOutcome<'t>,
{
    move |cur: &Cursor<'t>| match inner(cur) {
        MatchOutcome::NoMatch => MatchOutcome::matched(*cur, 0),
        matched => matched,
    }
}

/// Tries each alternative on the unmodified position, returning the first
/// success.
pub fn one_of<'a, 't>(
    alternatives: &'a [&'a MatchFn<'t>],
) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> + 'a {
    move |cur: &Cursor<'t>| {
        for alternative in alternatives {
            let outcome = alternative(cur);
            if outcome.is_match() {
                return outcome;
            }
        }
        MatchOutcome::NoMatch
    }
}

/// Zero-width lookahead: matches (consuming nothing) when any alternative
/// would match here. Handy as a stop marker in `case` arms.
pub fn test_one_of<'a, 't>(
    alternatives: &'a [&'a MatchFn<'t>],
) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> + 'a {
    move |cur: &Cursor<'t>| {
        for alternative in alternatives {
            if alternative(cur).is_match() {
                return MatchOutcome::matched(*cur, 0);
            }
        }
        MatchOutcome::NoMatch
    }
}

/// Applies `steps` in order against a single advancing copy; fails
/// atomically if any step fails.
///
/// On success the reported cursor is the *first* step's result paired
/// with the *total* consumed count - a quirk preserved for compatibility
/// with the historical matcher set, where sequences are captured by their
/// head.
pub fn sequence<'a, 't>(
    steps: &'a [&'a MatchFn<'t>],
) -> impl Fn(&Cursor<'t>) -> MatchOutcome<'t> + 'a {
    move |cur: &Cursor<'t>| {
        let mut probe = *cur;
        let mut first: Option<Cursor<'t>> = None;
        let mut total = 0;
        for step in steps {
            match step(&probe) {
                MatchOutcome::NoMatch => return MatchOutcome::NoMatch,
                MatchOutcome::Matched { cursor, consumed } => {
                    if first.is_none() {
                        first = Some(cursor);
                    }
                    probe.skip_units(consumed);
                    total += consumed;
                }
            }
        }
        MatchOutcome::matched(first.unwrap_or(*cur), total)
    }
}
