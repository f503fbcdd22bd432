//! sylva_patterns - cursor and match engine over sylva trees.
//!
//! A [`Cursor`] walks a node's children with a dual index `(row, offset)`,
//! transparently splicing one level of nested expression structure into a
//! flat unit stream. Matchers are plain functions from cursor position to
//! [`MatchOutcome`]; combinators compose them, and
//! [`Cursor::match_all`] applies a pattern atomically - all units commit
//! or none do. Backtracking is free because cursors are `Copy`.
//!
//! ```
//! use sylva_patterns::{iterator, token, expression, block};
//!
//! let tree = sylva_lexer::parse("if() {\n\n} else {\n\n}")?;
//! let mut cur = iterator(&tree);
//! let hit = cur.match_all(&[
//!     &token("if"),
//!     &expression(),
//!     &block(),
//!     &token("else"),
//!     &block(),
//! ]);
//! assert!(hit);
//! # Ok::<(), sylva_lexer::ScanError>(())
//! ```

mod combinators;
mod cursor;
mod diagnostics;
mod matchers;
mod outcome;

pub use combinators::{one_of, optional, sequence, test_one_of};
pub use cursor::{iterator, CaseArm, Cursor};
pub use diagnostics::syntax_error;
pub use matchers::{
    any_token, any_unit, block, bool_literal, double_literal, expression, expression_headed,
    int_literal, string_literal, string_literal_eq, token, token_ci, token_in, token_in_ci,
};
pub use outcome::{MatchFn, MatchOutcome};
