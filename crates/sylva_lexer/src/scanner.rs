//! Single-pass tree-building scanner.
//!
//! One loop dispatches on the current byte and hands off to a focused
//! method per token class. Group nesting is an explicit stack of frames
//! (no host-stack recursion), so deeply nested input fails with
//! [`ScanError::TooDeep`] instead of overflowing.
//!
//! Implicit line expressions: the first leaf on a line directly under a
//! block opens a synthetic expression frame, and a newline closes it again.
//! Only those frames are newline-sensitive; explicit `(`/`{` groups run
//! across lines freely.

use sylva_tree::{Literal, Node, NodeId, Span, Tree};
use tracing::{debug, trace};

use crate::{Cursor, ScanError, ScanSettings, SourceBuffer};

/// Parse `text` with default [`ScanSettings`].
pub fn parse(text: &str) -> Result<Tree, ScanError> {
    parse_with(text, &ScanSettings::default())
}

/// Parse `text` into a node tree.
///
/// The returned tree's root is both block and expression. Fatal errors are
/// limited to unbalanced closers and the nesting cap; malformed literals
/// degrade into value-less nodes instead.
pub fn parse_with(text: &str, settings: &ScanSettings) -> Result<Tree, ScanError> {
    let buffer = SourceBuffer::new(text);
    let scanner = Scanner::new(text, buffer.cursor(), settings);
    scanner.run()
}

/// One open group on the scan stack.
struct Frame {
    node: NodeId,
    /// Synthetic per-line expression, closed by the next newline.
    implicit: bool,
}

/// Where a detached annotation body lands once its group closes.
enum Slot {
    /// `@name(...)` - named attribute of the owner.
    Attribute(String),
    /// `name: Type(...)` - type annotation value of the owner.
    TypeValue,
    /// `name@(...)` - value annotation of the owner.
    ValueAnnotation,
}

/// A detached annotation body waiting for its closing `)`.
struct Pending {
    node: NodeId,
    owner: NodeId,
    slot: Slot,
}

struct Scanner<'s> {
    cur: Cursor<'s>,
    settings: &'s ScanSettings,
    tree: Tree,
    parents: Vec<Frame>,
    pending: Vec<Pending>,
    line: u32,
}

impl<'s> Scanner<'s> {
    fn new(text: &str, cursor: Cursor<'s>, settings: &'s ScanSettings) -> Self {
        let tree = Tree::new(text);
        let root = tree.root();
        Scanner {
            cur: cursor,
            settings,
            tree,
            parents: vec![Frame {
                node: root,
                implicit: false,
            }],
            pending: Vec::new(),
            line: 0,
        }
    }

    fn run(mut self) -> Result<Tree, ScanError> {
        debug!(bytes = self.cur.source_len(), "scan start");
        loop {
            let before = self.cur.pos();
            if self.skip_blanks() {
                break;
            }
            if self.skip_comment() {
                continue;
            }
            match self.cur.current() {
                b'(' => self.open_group(false)?,
                b'{' => self.open_group(true)?,
                b')' | b'}' => self.close_group()?,
                b'@' => {
                    self.cur.advance();
                    let owner = self.current_node();
                    self.annotation(owner)?;
                }
                _ => {
                    self.ensure_line_expression()?;
                    if !self.number() && !self.operator() && !self.string() && !self.boolean() {
                        self.bare_token()?;
                    }
                }
            }
            // Progress guarantee: an iteration that consumed nothing
            // force-advances one character.
            if self.cur.pos() == before && !self.cur.is_eof() {
                self.cur.advance_char();
            }
        }
        Ok(self.finish())
    }

    // --- whitespace, newlines, comments -------------------------------

    /// Skip space-class bytes. Returns `true` when scanning should stop:
    /// EOF, or a control byte below 8 (form-feed-class EOF marker).
    fn skip_blanks(&mut self) -> bool {
        loop {
            let b = self.cur.current();
            if b > b' ' {
                return false;
            }
            if self.cur.is_eof() || b < 8 {
                return true;
            }
            if b == b'\n' || b == b'\r' {
                if self.top_is_implicit() {
                    self.end_expression();
                }
                if b == b'\n' {
                    self.line += 1;
                }
            }
            self.cur.advance();
        }
    }

    /// Skip a line or block comment at the cursor, if configured.
    fn skip_comment(&mut self) -> bool {
        let settings = self.settings;
        if let Some(prefix) = &settings.line_comment {
            if self.cur.starts_with(prefix) {
                self.cur.eat_until_newline_or_eof();
                return true;
            }
        }
        if let Some((start, end)) = &settings.block_comment {
            if self.cur.starts_with(start) {
                let from = self.cur.pos();
                self.cur.advance_n(u32::try_from(start.len()).unwrap_or(0));
                match self.cur.find_forward(end.as_bytes()) {
                    Some(at) => self
                        .cur
                        .advance_to(at + u32::try_from(end.len()).unwrap_or(0)),
                    None => self.cur.advance_to(self.cur.source_len()),
                }
                self.count_skipped_lines(from);
                return true;
            }
        }
        false
    }

    fn count_skipped_lines(&mut self, from: u32) {
        let skipped = self.cur.slice(from, self.cur.pos());
        let newlines = memchr::memchr_iter(b'\n', skipped.as_bytes()).count();
        self.line += u32::try_from(newlines).unwrap_or(0);
    }

    // --- groups -------------------------------------------------------

    fn open_group(&mut self, brace: bool) -> Result<(), ScanError> {
        // A parenthesized group on a block line is the line's content and
        // gets the same implicit wrapper a leaf would; a `{` block stands
        // alone as a direct block child.
        if !brace {
            self.ensure_line_expression()?;
        }
        self.check_depth()?;
        let pos = self.cur.pos();
        let node = if brace {
            Node::block(Span::at(pos))
        } else {
            Node::expression(Span::at(pos))
        };
        let id = self.tree.alloc_child(self.current_node(), node);
        self.parents.push(Frame {
            node: id,
            implicit: false,
        });
        self.cur.advance();
        trace!(offset = pos, brace, line = self.line, "group opened");
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), ScanError> {
        // A closer inside a line first ends the open trailing expression.
        if self.top_is_implicit() {
            self.end_expression();
        }
        if self.parents.len() <= 1 {
            return Err(ScanError::MismatchedCloser {
                offset: self.cur.pos(),
            });
        }
        self.cur.advance();
        if let Some(frame) = self.parents.pop() {
            self.tree.node_mut(frame.node).span.end = self.cur.pos();
            self.attach_if_pending(frame.node);
            trace!(offset = self.cur.pos(), line = self.line, "group closed");
        }
        Ok(())
    }

    /// Close the current implicit line expression.
    fn end_expression(&mut self) {
        if let Some(frame) = self.parents.pop() {
            self.tree.node_mut(frame.node).span.end = self.cur.pos();
        }
    }

    /// Synthesize the per-line expression when a leaf lands directly in
    /// block scope.
    fn ensure_line_expression(&mut self) -> Result<(), ScanError> {
        if !self.tree[self.current_node()].is_block {
            return Ok(());
        }
        self.check_depth()?;
        let id = self
            .tree
            .alloc_child(self.current_node(), Node::expression(Span::at(self.cur.pos())));
        self.parents.push(Frame {
            node: id,
            implicit: true,
        });
        Ok(())
    }

    fn check_depth(&self) -> Result<(), ScanError> {
        if self.parents.len() >= self.settings.max_depth {
            return Err(ScanError::TooDeep {
                max_depth: self.settings.max_depth,
                offset: self.cur.pos(),
            });
        }
        Ok(())
    }

    fn top_is_implicit(&self) -> bool {
        self.parents.last().is_some_and(|f| f.implicit)
    }

    fn current_node(&self) -> NodeId {
        self.parents
            .last()
            .map(|f| f.node)
            .unwrap_or(self.tree.root())
    }

    // --- leaves -------------------------------------------------------

    /// Numeric literal lookahead and scan. `-4`, `.4`, `-.4`, exponents.
    fn number(&mut self) -> bool {
        let b = self.cur.current();
        let p = self.cur.peek();
        let starts = b.is_ascii_digit()
            || ((b == b'-' || b == b'.') && p.is_ascii_digit())
            || (b == b'-' && p == b'.' && self.cur.peek2().is_ascii_digit());
        if !starts {
            return false;
        }
        let sp = self.cur.pos();
        let mut is_double = b == b'.';
        let mut exponent_seen = false;
        self.cur.advance();
        loop {
            let c = self.cur.current();
            if c.is_ascii_digit() {
                self.cur.advance();
                continue;
            }
            if c == b'.' {
                is_double = true;
                self.cur.advance();
                continue;
            }
            if c == b'e' && !exponent_seen {
                let n = self.cur.peek();
                if n == b'+' || n == b'-' {
                    is_double = true;
                    exponent_seen = true;
                    self.cur.advance_n(2);
                    continue;
                }
                if n.is_ascii_digit() {
                    is_double = true;
                    exponent_seen = true;
                    self.cur.advance();
                    continue;
                }
            }
            break;
        }
        let text = self.cur.slice(sp, self.cur.pos());
        // A failed parse (e.g. `1.2.3`) keeps the node, drops the value.
        let value = if is_double {
            Literal::Double(text.parse().ok())
        } else {
            Literal::Int(text.parse().ok())
        };
        let span = Span::new(sp, self.cur.pos());
        self.tree
            .alloc_child(self.current_node(), Node::literal(span, value));
        true
    }

    /// Operator token: one character, or two when the pair is confirmed.
    fn operator(&mut self) -> bool {
        let b = self.cur.current();
        if !self.settings.is_operator(b) {
            return false;
        }
        let sp = self.cur.pos();
        let p = self.cur.peek();
        let len = if self.settings.is_operator(p) && is_operator_pair(b, p) {
            2
        } else {
            1
        };
        self.cur.advance_n(len);
        let span = Span::new(sp, self.cur.pos());
        let text = self.cur.slice(sp, self.cur.pos()).to_string();
        self.tree
            .alloc_child(self.current_node(), Node::token(span, text));
        true
    }

    /// String literal with any of the three delimiters.
    fn string(&mut self) -> bool {
        if !matches!(self.cur.current(), b'"' | b'`' | b'\'') {
            return false;
        }
        let (span, value) = self.scan_string();
        self.tree
            .alloc_child(self.current_node(), Node::literal(span, value));
        true
    }

    /// Scan a string literal starting at its opening delimiter.
    ///
    /// The span covers the content between the delimiters. Reaching EOF
    /// first yields `Str(None)` spanning to the end of input.
    fn scan_string(&mut self) -> (Span, Literal) {
        let delim = self.cur.current();
        self.cur.advance();
        let start = self.cur.pos();
        let mut must_decode = false;
        loop {
            let b = self.cur.current();
            if self.cur.is_eof() {
                return (Span::new(start, self.cur.pos()), Literal::Str(None));
            }
            if b == delim {
                break;
            }
            if b == b'\\' {
                must_decode = true;
                self.cur.advance();
                if self.cur.is_eof() {
                    return (Span::new(start, self.cur.pos()), Literal::Str(None));
                }
            }
            self.cur.advance_char();
        }
        let end = self.cur.pos();
        self.cur.advance();
        let raw = self.cur.slice(start, end);
        let value = if must_decode {
            decode_escapes(raw)
        } else {
            raw.to_string()
        };
        (Span::new(start, end), Literal::Str(Some(value)))
    }

    /// Whole-word `true` / `false`.
    fn boolean(&mut self) -> bool {
        for (word, value) in [("true", true), ("false", false)] {
            if self.cur.starts_with(word) {
                let len = u32::try_from(word.len()).unwrap_or(0);
                let next = self.cur.byte_at(self.cur.pos() + len);
                if !is_token_continue(next, self.settings) {
                    let sp = self.cur.pos();
                    self.cur.advance_n(len);
                    let span = Span::new(sp, self.cur.pos());
                    self.tree
                        .alloc_child(self.current_node(), Node::literal(span, Literal::Bool(value)));
                    return true;
                }
            }
        }
        false
    }

    /// Bare identifier/token run, with namespace dots and the `: Type` /
    /// trailing `@` suffixes.
    fn bare_token(&mut self) -> Result<(), ScanError> {
        let settings = self.settings;
        let sp = self.cur.pos();
        self.cur.advance_char();
        let mut dotted = false;
        loop {
            let b = self.cur.current();
            // A dot joining two token runs is a namespace separator.
            if b == b'.' && settings.is_operator(b'.') && is_token_continue(self.cur.peek(), settings)
            {
                dotted = true;
                self.cur.advance();
                continue;
            }
            if !is_token_continue(b, settings) {
                break;
            }
            self.cur.advance_char();
        }
        let text = self.cur.slice(sp, self.cur.pos()).to_string();
        let span = Span::new(sp, self.cur.pos());
        let mut node = Node::token(span, text.clone());
        if dotted {
            node.name_path = text.split('.').map(str::to_string).collect();
        }
        let id = self.tree.alloc_child(self.current_node(), node);
        if self.cur.current() == b':' {
            self.type_suffix(id)?;
        } else if self.cur.current() == b'@' {
            self.cur.advance();
            self.annotation(id)?;
        }
        Ok(())
    }

    /// `: TypeName` suffix on a bare token, optionally followed by a
    /// parenthesized value or another annotation.
    ///
    /// The colon must sit directly against the token; whitespace may
    /// separate it from the type name. A suffix colon followed by neither
    /// an identifier nor `(` falls back to a plain `:` token, so
    /// free-standing colons keep their place in the unit stream.
    fn type_suffix(&mut self, owner: NodeId) -> Result<(), ScanError> {
        let colon = self.cur.pos();
        self.cur.advance();
        self.cur.eat_whitespace();
        let sp = self.cur.pos();
        self.cur.eat_while(is_ident_byte);
        let name = self.cur.slice(sp, self.cur.pos());
        if name.is_empty() && self.cur.current() != b'(' {
            let span = Span::new(colon, colon + 1);
            self.tree
                .alloc_child(self.current_node(), Node::token(span, ":"));
            return Ok(());
        }
        if !name.is_empty() {
            self.tree.node_mut(owner).type_name = Some(name.to_string());
        }
        match self.cur.current() {
            b'(' => self.open_annotation_group(owner, Slot::TypeValue),
            b'@' => {
                self.cur.advance();
                self.annotation(owner)
            }
            _ => Ok(()),
        }
    }

    /// Annotation with the cursor just past `@`: `name(...)`, `name "str"`,
    /// or a bare `(...)` value annotation.
    fn annotation(&mut self, owner: NodeId) -> Result<(), ScanError> {
        let sp = self.cur.pos();
        self.cur.eat_while(is_ident_byte);
        let name = self.cur.slice(sp, self.cur.pos()).to_string();
        self.cur.eat_whitespace();
        let slot = if name.is_empty() {
            Slot::ValueAnnotation
        } else {
            Slot::Attribute(name)
        };
        match self.cur.current() {
            b'(' => self.open_annotation_group(owner, slot),
            b'"' | b'`' | b'\'' => {
                let (span, value) = self.scan_string();
                let id = self.tree.alloc(Node::literal(span, value));
                self.attach(owner, slot, id);
                Ok(())
            }
            _ => {
                // Bodyless annotation: attach an empty expression marker.
                let id = self.tree.alloc(Node::expression(Span::at(self.cur.pos())));
                self.attach(owner, slot, id);
                Ok(())
            }
        }
    }

    /// Open a detached expression scanned like any group but attached to
    /// `owner` when its `)` arrives.
    fn open_annotation_group(&mut self, owner: NodeId, slot: Slot) -> Result<(), ScanError> {
        self.check_depth()?;
        let pos = self.cur.pos();
        let mut node = Node::expression(Span::at(pos));
        node.parent = Some(owner);
        let id = self.tree.alloc(node);
        self.pending.push(Pending {
            node: id,
            owner,
            slot,
        });
        self.parents.push(Frame {
            node: id,
            implicit: false,
        });
        self.cur.advance();
        trace!(offset = pos, "annotation body opened");
        Ok(())
    }

    fn attach_if_pending(&mut self, closed: NodeId) {
        if self.pending.last().map(|p| p.node) == Some(closed) {
            if let Some(p) = self.pending.pop() {
                self.attach(p.owner, p.slot, p.node);
            }
        }
    }

    fn attach(&mut self, owner: NodeId, slot: Slot, body: NodeId) {
        match slot {
            Slot::Attribute(name) => {
                // A body holding exactly one primitive literal is stored
                // unwrapped.
                let target = self.unwrap_single_literal(body);
                self.tree.attach_attribute(owner, name, target);
            }
            Slot::TypeValue => {
                self.tree.node_mut(body).parent = Some(owner);
                self.tree.node_mut(owner).type_annotation = Some(body);
            }
            Slot::ValueAnnotation => {
                self.tree.node_mut(body).parent = Some(owner);
                self.tree.node_mut(owner).value_annotation = Some(body);
            }
        }
    }

    fn unwrap_single_literal(&self, body: NodeId) -> NodeId {
        let node = &self.tree[body];
        if let [only] = node.children.as_slice() {
            let primitive = matches!(
                self.tree[*only].value,
                Some(Literal::Int(_) | Literal::Double(_) | Literal::Str(_) | Literal::Bool(_))
            );
            if primitive {
                return *only;
            }
        }
        body
    }

    // --- completion ---------------------------------------------------

    fn finish(mut self) -> Tree {
        let end = self.cur.pos();
        while let Some(frame) = self.parents.pop() {
            if self.tree[frame.node].span.end < end {
                self.tree.node_mut(frame.node).span.end = end;
            }
            self.attach_if_pending(frame.node);
        }
        debug!(nodes = self.tree.len(), lines = self.line + 1, "scan complete");
        self.tree
    }
}

/// Two-character operator confirmations.
fn is_operator_pair(a: u8, b: u8) -> bool {
    matches!(
        (a, b),
        (b'<', b'=') | (b'>', b'=') | (b'=', b'=') | (b'!', b'=') | (b'&', b'&') | (b'|', b'|')
    )
}

/// Bytes that keep a bare token run going.
fn is_token_continue(b: u8, settings: &ScanSettings) -> bool {
    b > b' '
        && !matches!(
            b,
            b'(' | b')' | b'{' | b'}' | b'"' | b'`' | b'\'' | b':' | b'@'
        )
        && !settings.is_operator(b)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Decode backslash escapes inside a raw string body.
///
/// Unknown escapes are dropped; `\uXXXX` is consumed but not decoded.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                for _ in 0..4 {
                    chars.next();
                }
            }
            _ => {}
        }
    }
    out
}
