//! Arena-backed node tree.
//!
//! Nodes are created during a single tokenizer pass and never mutated
//! afterwards. The [`Tree`] owns every node; `children` express ownership
//! top-down, `parent` is a non-owning arena index used only for contextual
//! queries ("is my parent a block").

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::ops::Index;

use crate::{Literal, Span};

/// Arena index of a node inside a [`Tree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Coarse role of a node, derived from its flags and value.
///
/// A node may be both block and expression at once (the root and every
/// `{...}` node); `kind()` reports `Block` for those.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Block,
    Expression,
    Token,
    Literal,
}

/// One node of the structural tree.
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Byte span in the source; stamped with the true end once closed.
    pub span: Span,
    /// `{...}` node or the root.
    pub is_block: bool,
    /// `(...)` node, `{...}` node, implicit line expression, or the root.
    pub is_expression: bool,
    /// Literal payload for token/literal nodes. Absent inner values mark
    /// soft-degraded literals (malformed number, unterminated string).
    pub value: Option<Literal>,
    /// Owned children in source order.
    pub children: Vec<NodeId>,
    /// Non-owning back-reference to the enclosing node.
    pub parent: Option<NodeId>,
    /// `@name(...)` attributes by name.
    pub attrs: FxHashMap<String, NodeId>,
    /// Attribute names in attachment order.
    pub attr_order: Vec<String>,
    /// Dot-separated segments of a namespaced identifier (`a.b.c`).
    pub name_path: SmallVec<[String; 2]>,
    /// `name: Type` suffix, when present.
    pub type_name: Option<String>,
    /// Parenthesized value following a type suffix (`name: Type(...)`).
    pub type_annotation: Option<NodeId>,
    /// `name@(...)` trailing annotation.
    pub value_annotation: Option<NodeId>,
}

impl Node {
    /// A plain expression node (opened by `(` or synthesized per line).
    pub fn expression(span: Span) -> Self {
        Node {
            span,
            is_expression: true,
            ..Node::default()
        }
    }

    /// A block node. Blocks are simultaneously expressions, like the root.
    pub fn block(span: Span) -> Self {
        Node {
            span,
            is_block: true,
            is_expression: true,
            ..Node::default()
        }
    }

    /// A literal leaf node.
    pub fn literal(span: Span, value: Literal) -> Self {
        Node {
            span,
            value: Some(value),
            ..Node::default()
        }
    }

    /// A token leaf node.
    pub fn token(span: Span, text: impl Into<String>) -> Self {
        Node {
            span,
            value: Some(Literal::Token(text.into())),
            ..Node::default()
        }
    }

    /// Coarse role of this node.
    pub fn kind(&self) -> NodeKind {
        match &self.value {
            Some(Literal::Token(_)) => NodeKind::Token,
            Some(_) => NodeKind::Literal,
            None if self.is_block => NodeKind::Block,
            None => NodeKind::Expression,
        }
    }

    /// True for token/literal leaves.
    pub fn is_leaf(&self) -> bool {
        !self.is_block && !self.is_expression
    }

    /// Token text, when this node is a token.
    pub fn token_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Literal::token_text)
    }

    /// Attribute node attached under `name`, if any.
    pub fn attr(&self, name: &str) -> Option<NodeId> {
        self.attrs.get(name).copied()
    }
}

/// Owning arena for one parsed source.
#[derive(Clone, Debug)]
pub struct Tree {
    source: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding `source`, with a root node that is both block
    /// and expression spanning the whole text.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        let root_node = Node::block(Span::new(0, len));
        Tree {
            source,
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The raw source text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes in the arena (including the root).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // there is always a root
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node (builder use only; trees are immutable once
    /// the tokenizer pass completes).
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Allocate a detached node (used for attribute/annotation bodies).
    /// The caller is responsible for setting its parent.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    /// Allocate a node as the last child of `parent`.
    pub fn alloc_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.alloc(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Attach `value` as attribute `name` of `owner`, preserving key order.
    pub fn attach_attribute(&mut self, owner: NodeId, name: impl Into<String>, value: NodeId) {
        let name = name.into();
        self.nodes[value.index()].parent = Some(owner);
        let owner_node = &mut self.nodes[owner.index()];
        if !owner_node.attrs.contains_key(&name) {
            owner_node.attr_order.push(name.clone());
        }
        owner_node.attrs.insert(name, value);
    }

    /// True when `id`'s parent exists and is a block.
    pub fn parent_is_block(&self, id: NodeId) -> bool {
        self.node(id)
            .parent
            .map(|p| self.node(p).is_block)
            .unwrap_or(false)
    }

    /// Maximum child-edge depth below the root, following `children` only.
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for &child in &self.node(id).children {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// A window of source text centered on `id`'s span, clipped silently to
    /// the text bounds and to UTF-8 character boundaries.
    pub fn positional_context(&self, id: NodeId, radius: usize) -> &str {
        let span = self.node(id).span;
        context_window(&self.source, span, radius)
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

/// Span-centered excerpt of `source`, clipped to bounds and char boundaries.
/// Never panics; degenerate spans yield a best-effort (possibly empty) window.
pub fn context_window(source: &str, span: Span, radius: usize) -> &str {
    let start = (span.start as usize).saturating_sub(radius);
    let end = (span.end as usize).saturating_add(radius);
    let start = floor_char_boundary(source, start);
    let end = floor_char_boundary(source, end.max(start));
    &source[start..end]
}

fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_level_tree() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new("aa (bb)");
        let row = tree.alloc_child(tree.root(), Node::expression(Span::new(0, 7)));
        let tok = tree.alloc_child(row, Node::token(Span::new(0, 2), "aa"));
        (tree, row, tok)
    }

    #[test]
    fn root_is_block_and_expression() {
        let tree = Tree::new("x");
        let root = &tree[tree.root()];
        assert!(root.is_block);
        assert!(root.is_expression);
        assert_eq!(root.kind(), NodeKind::Block);
        assert!(root.parent.is_none());
    }

    #[test]
    fn alloc_child_sets_parent_once() {
        let (tree, row, tok) = two_level_tree();
        assert_eq!(tree[tok].parent, Some(row));
        assert_eq!(tree[row].parent, Some(tree.root()));
        assert_eq!(tree[tree.root()].children, vec![row]);
        assert_eq!(tree[row].children, vec![tok]);
    }

    #[test]
    fn parent_is_block_checks_one_level() {
        let (tree, row, tok) = two_level_tree();
        assert!(tree.parent_is_block(row));
        assert!(!tree.parent_is_block(tok));
        assert!(!tree.parent_is_block(tree.root()));
    }

    #[test]
    fn node_kinds() {
        let mut tree = Tree::new("");
        let b = tree.alloc(Node::block(Span::DUMMY));
        let e = tree.alloc(Node::expression(Span::DUMMY));
        let t = tree.alloc(Node::token(Span::DUMMY, "+"));
        let l = tree.alloc(Node::literal(Span::DUMMY, Literal::Int(Some(1))));
        assert_eq!(tree[b].kind(), NodeKind::Block);
        assert_eq!(tree[e].kind(), NodeKind::Expression);
        assert_eq!(tree[t].kind(), NodeKind::Token);
        assert_eq!(tree[l].kind(), NodeKind::Literal);
        assert!(tree[t].is_leaf());
        assert!(!tree[b].is_leaf());
    }

    #[test]
    fn attributes_preserve_key_order() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let a = tree.alloc(Node::literal(Span::DUMMY, Literal::Int(Some(1))));
        let b = tree.alloc(Node::literal(Span::DUMMY, Literal::Int(Some(2))));
        tree.attach_attribute(root, "zz", a);
        tree.attach_attribute(root, "aa", b);
        assert_eq!(tree[root].attr_order, vec!["zz", "aa"]);
        assert_eq!(tree[root].attr("zz"), Some(a));
        assert_eq!(tree[root].attr("aa"), Some(b));
        assert_eq!(tree[a].parent, Some(root));
    }

    #[test]
    fn reattaching_attribute_keeps_single_order_entry() {
        let mut tree = Tree::new("");
        let root = tree.root();
        let a = tree.alloc(Node::literal(Span::DUMMY, Literal::Int(Some(1))));
        let b = tree.alloc(Node::literal(Span::DUMMY, Literal::Int(Some(2))));
        tree.attach_attribute(root, "x", a);
        tree.attach_attribute(root, "x", b);
        assert_eq!(tree[root].attr_order, vec!["x"]);
        assert_eq!(tree[root].attr("x"), Some(b));
    }

    #[test]
    fn max_depth_counts_child_edges() {
        let mut tree = Tree::new("((()))");
        let a = tree.alloc_child(tree.root(), Node::expression(Span::DUMMY));
        let b = tree.alloc_child(a, Node::expression(Span::DUMMY));
        tree.alloc_child(b, Node::expression(Span::DUMMY));
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn positional_context_clips_to_bounds() {
        let mut tree = Tree::new("0123456789");
        let tok = tree.alloc_child(tree.root(), Node::token(Span::new(4, 5), "4"));
        assert_eq!(tree.positional_context(tok, 2), "23456");
        assert_eq!(tree.positional_context(tok, 100), "0123456789");
    }

    #[test]
    fn positional_context_survives_bad_spans() {
        let mut tree = Tree::new("short");
        let tok = tree.alloc_child(tree.root(), Node::token(Span::new(400, 500), "x"));
        assert_eq!(tree.positional_context(tok, 10), "");
    }

    #[test]
    fn positional_context_respects_utf8_boundaries() {
        // Snowman is 3 bytes; a naive byte clip would split it.
        let mut tree = Tree::new("a\u{2603}b");
        let tok = tree.alloc_child(tree.root(), Node::token(Span::new(4, 5), "b"));
        let window = tree.positional_context(tok, 2);
        assert!(window.ends_with('b'));
    }
}
