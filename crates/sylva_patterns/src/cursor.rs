//! Dual-index cursor over a node tree.
//!
//! The cursor tracks `(i, c)`: `i` indexes the current row of a sibling
//! list, `c` how far it has descended into that row's children when the
//! row is an expression with content. Expression rows are transparently
//! spliced into the unit stream one level deep; block rows and empty
//! expressions stay opaque until a matcher unwraps them. This is what
//! lets a flat pattern match across a nested tree.
//!
//! Cursors are [`Copy`]: cloning copies two integers, which makes
//! speculative matching and backtracking essentially free.

use sylva_tree::{Literal, Node, NodeId, Tree};
use tracing::trace;

use crate::{MatchFn, MatchOutcome};

/// Cursor over the root's children of a tree.
pub fn iterator(tree: &Tree) -> Cursor<'_> {
    Cursor::over(tree, tree.root())
}

/// The sibling list a cursor walks.
#[derive(Clone, Copy, Debug)]
enum Rows<'t> {
    /// A borrowed slice of sibling rows.
    Many(&'t [NodeId]),
    /// A single node whose children are yielded verbatim (the view an
    /// expression unwrap produces).
    One(NodeId),
}

impl<'t> Rows<'t> {
    fn get(self, i: usize) -> Option<NodeId> {
        match self {
            Rows::Many(slice) => slice.get(i).copied(),
            Rows::One(id) if i == 0 => Some(id),
            Rows::One(_) => None,
        }
    }
}

/// One arm of [`Cursor::case`]: a test list and the handler invoked after
/// the tests commit.
pub struct CaseArm<'a, 't, T> {
    /// Pattern applied with all-or-nothing semantics.
    pub tests: &'a [&'a MatchFn<'t>],
    /// Receives the per-test capture cursors and the advanced cursor.
    pub handler: &'a dyn Fn(&[Cursor<'t>], &mut Cursor<'t>) -> Option<T>,
}

/// Dual-index traversal position over a sibling list.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'t> {
    tree: &'t Tree,
    rows: Rows<'t>,
    i: usize,
    c: usize,
}

impl<'t> Cursor<'t> {
    /// Cursor over `node`'s children.
    pub fn over(tree: &'t Tree, node: NodeId) -> Self {
        Cursor {
            tree,
            rows: Rows::Many(&tree[node].children),
            i: 0,
            c: 0,
        }
    }

    /// Cursor yielding `node`'s children verbatim (or `node` itself when
    /// it has none). Used by the expression unwrap matcher.
    pub(crate) fn single(tree: &'t Tree, node: NodeId) -> Self {
        Cursor {
            tree,
            rows: Rows::One(node),
            i: 0,
            c: 0,
        }
    }

    /// The tree this cursor reads from.
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Advance to and return the next unit under the splicing rule.
    fn step(&mut self) -> Option<NodeId> {
        loop {
            let (row_id, transparent) = match self.rows {
                Rows::Many(slice) => (slice.get(self.i).copied()?, false),
                Rows::One(id) => {
                    if self.i > 0 {
                        return None;
                    }
                    (id, true)
                }
            };
            let row = &self.tree[row_id];
            let splice = if transparent {
                !row.children.is_empty()
            } else {
                row.is_expression && !row.is_block && !row.children.is_empty()
            };
            if !splice {
                // Leaves, blocks, and empty expressions are single units.
                self.i += 1;
                self.c = 0;
                return Some(row_id);
            }
            if self.c >= row.children.len() {
                self.i += 1;
                self.c = 0;
                continue;
            }
            let unit = row.children[self.c];
            self.c += 1;
            return Some(unit);
        }
    }

    /// Take up to `n` units, advancing the cursor.
    pub fn take(&mut self, n: usize) -> Vec<NodeId> {
        let mut units = Vec::with_capacity(n);
        for _ in 0..n {
            match self.step() {
                Some(id) => units.push(id),
                None => break,
            }
        }
        units
    }

    /// Peek up to `n` units without advancing.
    pub fn peek(&self, n: usize) -> Vec<NodeId> {
        let mut probe = *self;
        probe.take(n)
    }

    /// The next unit, without advancing.
    pub fn peek_one(&self) -> Option<NodeId> {
        let mut probe = *self;
        probe.step()
    }

    /// The node of the next unit, without advancing.
    pub fn head(&self) -> Option<&'t Node> {
        self.peek_one().map(|id| &self.tree[id])
    }

    /// Advance past up to `n` units, returning how many were consumed.
    pub fn skip_units(&mut self, n: usize) -> usize {
        let mut consumed = 0;
        while consumed < n && self.step().is_some() {
            consumed += 1;
        }
        consumed
    }

    /// True when no units remain.
    pub fn at_end(&self) -> bool {
        self.peek_one().is_none()
    }

    // --- head accessors (soft defaults, like the unit stream itself) ---

    /// Token text of the head unit, or `""`.
    pub fn token_text(&self) -> &'t str {
        self.head().and_then(Node::token_text).unwrap_or("")
    }

    /// Decoded string value of the head unit, or `""`.
    pub fn str_value(&self) -> &'t str {
        self.head()
            .and_then(|n| n.value.as_ref()?.as_str())
            .unwrap_or("")
    }

    /// Integer value of the head unit, or 0.
    pub fn int_value(&self) -> i64 {
        self.head()
            .and_then(|n| n.value.as_ref()?.as_int())
            .unwrap_or(0)
    }

    /// Double value of the head unit, or 0.0.
    pub fn double_value(&self) -> f64 {
        self.head()
            .and_then(|n| n.value.as_ref()?.as_double())
            .unwrap_or(0.0)
    }

    /// Boolean value of the head unit, or `false`.
    pub fn bool_value(&self) -> bool {
        self.head()
            .and_then(|n| n.value.as_ref()?.as_bool())
            .unwrap_or(false)
    }

    /// Display form of the head unit for messages: quoted strings, plain
    /// numbers and tokens, `""` at end of input.
    pub fn head_summary(&self) -> String {
        let Some(node) = self.head() else {
            return String::new();
        };
        match &node.value {
            Some(Literal::Str(Some(s))) => format!("\"{s}\""),
            Some(Literal::Int(Some(v))) => v.to_string(),
            Some(Literal::Double(Some(v))) => v.to_string(),
            Some(Literal::Bool(v)) => v.to_string(),
            Some(Literal::Token(t)) => t.clone(),
            _ => String::new(),
        }
    }

    // --- word helpers -------------------------------------------------

    /// True when the head unit is a token equal to `word`, ignoring case.
    pub fn next_is(&self, word: &str) -> bool {
        self.head()
            .and_then(Node::token_text)
            .is_some_and(|t| t.eq_ignore_ascii_case(word))
    }

    /// Consume the head unit when it is the given word (ignoring case).
    pub fn skip_word(&mut self, word: &str) -> bool {
        if self.next_is(word) {
            self.skip_units(1);
            true
        } else {
            false
        }
    }

    // --- line-oriented traversal --------------------------------------

    /// Jump to the start of the next row.
    pub fn to_next_line(&mut self) {
        self.i += 1;
        self.c = 0;
    }

    /// True while the current row still has unread children.
    pub fn line_has_more(&self) -> bool {
        self.rows
            .get(self.i)
            .is_some_and(|row| self.tree[row].children.len() > self.c)
    }

    /// Apply `f` to each remaining unit of the current row, then move to
    /// the next row.
    pub fn until_next_line(&mut self, mut f: impl FnMut(&mut Cursor<'t>)) {
        let start_i = self.i;
        while self.line_has_more() {
            f(self);
            self.skip_units(1);
        }
        self.i = start_i + 1;
        self.c = 0;
    }

    // --- bulk traversal -----------------------------------------------

    /// Take units while `pred` holds for the upcoming node.
    pub fn take_until(&mut self, mut pred: impl FnMut(&'t Node) -> bool) -> Vec<NodeId> {
        let tree = self.tree;
        let mut taken = Vec::new();
        while let Some(id) = self.peek_one() {
            if !pred(&tree[id]) {
                break;
            }
            self.skip_units(1);
            taken.push(id);
        }
        taken
    }

    /// [`take_until`](Self::take_until) on a copy; the cursor stays put.
    pub fn peek_until(&self, pred: impl FnMut(&'t Node) -> bool) -> Vec<NodeId> {
        let mut probe = *self;
        probe.take_until(pred)
    }

    /// Take units up to (not including) any of the given token words,
    /// compared ignoring case.
    pub fn take_until_token(&mut self, words: &[&str]) -> Vec<NodeId> {
        self.take_until(|node| {
            !node
                .token_text()
                .is_some_and(|t| words.iter().any(|w| t.eq_ignore_ascii_case(w)))
        })
    }

    /// True when `word` occurs as a token before any of the delimiter
    /// words (all compared ignoring case).
    pub fn has_token(&self, word: &str, delimiters: &[&str]) -> bool {
        let mut found = false;
        let mut probe = *self;
        probe.take_until(|node| {
            if let Some(t) = node.token_text() {
                if delimiters.iter().any(|d| t.eq_ignore_ascii_case(d)) {
                    return false;
                }
                if t.eq_ignore_ascii_case(word) {
                    found = true;
                    return false;
                }
            }
            true
        });
        found
    }

    // --- progress-guarded loops ---------------------------------------

    /// Run `f` once, reporting whether it advanced the cursor.
    pub fn did_proceed(&mut self, f: impl FnOnce(&mut Cursor<'t>)) -> bool {
        let before = (self.i, self.c);
        f(self);
        (self.i, self.c) != before
    }

    /// Repeatedly invoke `body` over the stream. An invocation that makes
    /// no progress force-advances one unit; the loop ends at end of input.
    pub fn while_did_proceed(&mut self, mut body: impl FnMut(&mut Cursor<'t>)) {
        loop {
            let before = (self.i, self.c);
            body(self);
            if (self.i, self.c) == before {
                self.skip_units(1);
                if self.at_end() {
                    return;
                }
            }
        }
    }

    /// Advance while `pred` holds, with the same anti-stall guarantee: a
    /// predicate pass that moves nothing costs one unit.
    pub fn iterate_until(&mut self, mut pred: impl FnMut(&mut Cursor<'t>) -> bool) {
        let mut last = (self.i, self.c);
        while pred(self) {
            if (self.i, self.c) == last {
                self.skip_units(1);
                if self.at_end() {
                    return;
                }
                last = (self.i, self.c);
                continue;
            }
            if self.at_end() {
                return;
            }
            last = (self.i, self.c);
        }
    }

    // --- atomic pattern application -----------------------------------

    /// Apply `tests` in order against an advancing copy and commit the new
    /// position only if every test matches. The original position is
    /// untouched on failure.
    pub fn match_all(&mut self, tests: &[&MatchFn<'t>]) -> bool {
        self.match_all_with(tests, |_| {})
    }

    /// [`match_all`](Self::match_all) with a callback receiving the
    /// per-test result cursors for value extraction.
    pub fn match_all_with(
        &mut self,
        tests: &[&MatchFn<'t>],
        on_match: impl FnOnce(&[Cursor<'t>]),
    ) -> bool {
        let mut progress = *self;
        let mut captures = Vec::with_capacity(tests.len());
        for (index, test) in tests.iter().enumerate() {
            match test(&progress) {
                MatchOutcome::NoMatch => {
                    trace!(failed_at = index, "pattern backtracked");
                    return false;
                }
                MatchOutcome::Matched { cursor, consumed } => {
                    progress.skip_units(consumed);
                    captures.push(cursor);
                }
            }
        }
        on_match(&captures);
        self.i = progress.i;
        self.c = progress.c;
        trace!(tests = tests.len(), "pattern committed");
        true
    }

    /// Lookahead-only variant of [`match_all`](Self::match_all): reports
    /// whether the pattern would match, never mutating this cursor.
    pub fn probe(&self, tests: &[&MatchFn<'t>]) -> bool {
        let mut scratch = *self;
        scratch.match_all(tests)
    }

    /// Ordered dispatch: the first arm whose tests commit has its handler
    /// invoked with the captures and the advanced cursor. `None` when no
    /// arm applies (or the matching arm's handler declines).
    pub fn case<T>(&mut self, arms: &[CaseArm<'_, 't, T>]) -> Option<T> {
        for arm in arms {
            let mut captured: Vec<Cursor<'t>> = Vec::new();
            if self.match_all_with(arm.tests, |caps| captured.extend_from_slice(caps)) {
                return (arm.handler)(&captured, self);
            }
        }
        None
    }
}
