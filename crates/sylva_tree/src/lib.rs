//! sylva_tree - the node tree at the center of sylva.
//!
//! A [`Tree`] is an arena of [`Node`]s built in a single tokenizer pass and
//! never mutated afterwards. Ownership runs strictly top-down through
//! `children`; parent links are plain arena indices, so the tree can be
//! dropped without any cycle breaking.

mod literal;
mod node;
mod span;

pub use literal::{Literal, LiteralKind};
pub use node::{context_window, Node, NodeId, NodeKind, Tree};
pub use span::Span;
