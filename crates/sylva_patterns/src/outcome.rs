//! Two-way match outcome.
//!
//! An explicit sum type instead of an "empty result means no match"
//! sentinel, so a successful zero-width match (`optional`, `test_one_of`)
//! stays distinguishable from failure.

use crate::Cursor;

/// Result of applying a matcher to a cursor position.
#[derive(Clone, Copy, Debug)]
pub enum MatchOutcome<'t> {
    /// The unit at the cursor does not fit; nothing was decided.
    NoMatch,
    /// The matcher fits, consuming `consumed` units of the outer cursor.
    ///
    /// `cursor` is the matcher's result position: for plain matchers the
    /// input cursor itself (pointing at the matched unit), for the unwrap
    /// matchers a new cursor scoped one tree level down.
    Matched {
        cursor: Cursor<'t>,
        consumed: usize,
    },
}

impl<'t> MatchOutcome<'t> {
    /// Success constructor.
    #[inline]
    pub fn matched(cursor: Cursor<'t>, consumed: usize) -> Self {
        MatchOutcome::Matched { cursor, consumed }
    }

    /// Returns `true` on any match, including zero-width ones.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// Units the outer cursor should advance by; 0 for `NoMatch`.
    #[inline]
    pub fn consumed(&self) -> usize {
        match self {
            MatchOutcome::Matched { consumed, .. } => *consumed,
            MatchOutcome::NoMatch => 0,
        }
    }

    /// The result cursor, if this is a match.
    #[inline]
    pub fn cursor(&self) -> Option<Cursor<'t>> {
        match self {
            MatchOutcome::Matched { cursor, .. } => Some(*cursor),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// A matcher: any function from a cursor position to a [`MatchOutcome`].
///
/// Matchers never mutate the cursor they are given; combinators work on
/// copies and commit state explicitly.
pub type MatchFn<'t> = dyn Fn(&Cursor<'t>) -> MatchOutcome<'t> + 't;
