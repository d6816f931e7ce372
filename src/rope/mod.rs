//! Balanced rope over immutable UTF-8 leaves
//!
//! The rope is an AVL tree whose leaves own chunks of text in
//! `[MIN_LEAF, MAX_LEAF]` bytes and whose interior nodes cache
//! aggregate metrics (bytes, scalars, line breaks) so every edit and
//! every index conversion is a metric-directed descent.
//!
//! ## rope/ Invariants
//!
//! - Leaves contain only well-formed UTF-8; splits never cut a scalar.
//! - Height difference between siblings is at most 1 after any
//!   mutation returns.
//! - Metrics are exact and recomputed from children on every
//!   concatenation and rotation.
//! - Leaves are shared by `Arc`; mutations rebuild the touched spine
//!   only, so cloned ropes (undo snapshots) stay cheap.

use std::fmt::{self, Display};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Minimum leaf payload in bytes (first/last leaves exempt)
pub const MIN_LEAF: usize = 512;
/// Maximum leaf payload in bytes
pub const MAX_LEAF: usize = 1024;

/// Aggregate counts for a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    /// Total UTF-8 bytes
    pub bytes: usize,
    /// Total Unicode scalar values
    pub chars: usize,
    /// Count of `\n` bytes
    pub line_breaks: usize,
}

impl Metrics {
    fn of(text: &str) -> Self {
        Metrics {
            bytes: text.len(),
            chars: text.chars().count(),
            line_breaks: text.bytes().filter(|b| *b == b'\n').count(),
        }
    }

    fn add(self, other: Metrics) -> Metrics {
        Metrics {
            bytes: self.bytes + other.bytes,
            chars: self.chars + other.chars,
            line_breaks: self.line_breaks + other.line_breaks,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        text: Arc<str>,
        metrics: Metrics,
    },
    Internal {
        left: Arc<Node>,
        right: Arc<Node>,
        metrics: Metrics,
        height: usize,
    },
}

/// UTF-8 text container with O(log n) editing
#[derive(Debug, Clone, Default)]
pub struct Rope {
    root: Option<Arc<Node>>,
}

impl Rope {
    pub fn new() -> Self {
        Rope { root: None }
    }

    pub fn from_str(text: &str) -> Self {
        Rope { root: build(text) }
    }

    /// Total bytes, from the root metrics
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |n| metrics(n).bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total Unicode scalar values
    pub fn char_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| metrics(n).chars)
    }

    /// Line count; an empty rope has one (empty) line
    pub fn line_count(&self) -> usize {
        self.root.as_ref().map_or(0, |n| metrics(n).line_breaks) + 1
    }

    /// Whether `pos` lies on a scalar boundary (or at either end)
    pub fn is_boundary(&self, pos: usize) -> bool {
        if pos == 0 || pos == self.len() {
            return true;
        }
        if pos > self.len() {
            return false;
        }
        match &self.root {
            Some(root) => node_is_boundary(root, pos),
            None => false,
        }
    }

    /// Insert `text` at byte offset `pos`
    ///
    /// Fails with `InvalidBoundary` when `pos` exceeds the length or
    /// falls inside a multi-byte scalar. The root is only replaced
    /// once the new tree is fully built, so a failed insert leaves
    /// the rope untouched.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<()> {
        if pos > self.len() || !self.is_boundary(pos) {
            return Err(Error::InvalidBoundary { pos });
        }
        if text.is_empty() {
            return Ok(());
        }
        let new = build(text);
        let (left, right) = match &self.root {
            Some(root) => split(root, pos),
            None => (None, None),
        };
        self.root = concat_opt(concat_opt(left, new), right);
        Ok(())
    }

    /// Delete bytes in `[start, end)`; `end` is clamped to the length
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        let end = end.min(self.len());
        if start > end || !self.is_boundary(start) {
            return Err(Error::InvalidBoundary { pos: start });
        }
        if !self.is_boundary(end) {
            return Err(Error::InvalidBoundary { pos: end });
        }
        if start == end {
            return Ok(());
        }
        let root = match &self.root {
            Some(root) => root,
            None => return Ok(()),
        };
        let (left, rest) = split(root, start);
        let (_, right) = match &rest {
            Some(rest) => split(rest, end - start),
            None => (None, None),
        };
        self.root = concat_opt(left, right);
        Ok(())
    }

    /// Copy out the bytes in `[start, end)` as an owned string
    pub fn slice(&self, start: usize, end: usize) -> Result<String> {
        let end = end.min(self.len());
        if start > end || !self.is_boundary(start) {
            return Err(Error::InvalidBoundary { pos: start });
        }
        if !self.is_boundary(end) {
            return Err(Error::InvalidBoundary { pos: end });
        }
        let mut out = String::with_capacity(end - start);
        if let Some(root) = &self.root {
            collect_range(root, start, end, &mut out);
        }
        Ok(out)
    }

    /// Byte offset of the `idx`-th scalar; the length when past the end
    pub fn char_to_byte(&self, idx: usize) -> usize {
        match &self.root {
            Some(root) if idx < metrics(root).chars => node_char_to_byte(root, idx),
            _ => self.len(),
        }
    }

    /// Index of the scalar containing byte `pos`; the scalar count when
    /// past the end
    pub fn byte_to_char(&self, pos: usize) -> usize {
        match &self.root {
            Some(root) if pos < metrics(root).bytes => node_byte_to_char(root, pos),
            _ => self.char_count(),
        }
    }

    /// Byte offset where line `line` starts (0 for line 0; the length
    /// when past the last line)
    pub fn line_start_byte(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        if line >= self.line_count() {
            return self.len();
        }
        match &self.root {
            Some(root) => node_nth_newline_end(root, line),
            None => 0,
        }
    }

    /// Byte offset one past the end of line `line` (including its
    /// newline, when present)
    pub fn line_end_byte(&self, line: usize) -> usize {
        if line + 1 >= self.line_count() {
            self.len()
        } else {
            self.line_start_byte(line + 1)
        }
    }

    /// Line number containing byte `pos`
    pub fn byte_to_line(&self, pos: usize) -> usize {
        match &self.root {
            Some(root) if pos < metrics(root).bytes => node_line_at_byte(root, pos),
            _ => self.line_count() - 1,
        }
    }

    /// Convert `(line, col)` — col in scalars — to a byte offset,
    /// clamping col to the line's content (the trailing newline is not
    /// addressable)
    pub fn line_col_to_byte(&self, line: usize, col: usize) -> usize {
        if line >= self.line_count() {
            return self.len();
        }
        let start = self.line_start_byte(line);
        let end = self.line_end_byte(line);
        let text = match self.slice(start, end) {
            Ok(text) => text,
            Err(_) => return self.len(),
        };
        let content = text.strip_suffix('\n').unwrap_or(&text);
        let offset = content
            .char_indices()
            .nth(col)
            .map(|(b, _)| b)
            .unwrap_or(content.len());
        start + offset
    }

    /// Convert a byte offset to `(line, col)` with col in scalars
    pub fn byte_to_line_col(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.len());
        let line = self.byte_to_line(pos);
        let start = self.line_start_byte(line);
        let col = self.byte_to_char(pos) - self.byte_to_char(start);
        (line, col)
    }

    /// Line `idx` without its trailing newline
    pub fn line(&self, idx: usize) -> String {
        if idx >= self.line_count() {
            return String::new();
        }
        let start = self.line_start_byte(idx);
        let end = self.line_end_byte(idx);
        match self.slice(start, end) {
            Ok(text) => match text.strip_suffix('\n') {
                Some(stripped) => stripped.to_string(),
                None => text,
            },
            Err(_) => String::new(),
        }
    }

    /// Scalar count of line `idx`, excluding the newline
    pub fn line_len_chars(&self, idx: usize) -> usize {
        self.line(idx).chars().count()
    }

    /// In-order iterator over leaf chunks
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self.root.as_deref())
    }

    /// Stream the rope's exact bytes into a writer
    pub fn write_to(&self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        for chunk in self.chunks() {
            out.write_all(chunk.as_bytes())?;
        }
        Ok(())
    }
}

impl Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Rope::from_str(text)
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.to_string() == other.to_string()
    }
}

/// In-order leaf iterator
pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Chunks { stack: Vec::new() };
        if let Some(node) = root {
            iter.push_left(node);
        }
        iter
    }

    fn push_left(&mut self, mut node: &'a Node) {
        loop {
            self.stack.push(node);
            match node {
                Node::Internal { left, .. } => node = left,
                Node::Leaf { .. } => break,
            }
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;
            match node {
                Node::Leaf { text, .. } => return Some(text),
                Node::Internal { right, .. } => self.push_left(right),
            }
        }
    }
}

// --- Tree construction ---

fn leaf(text: &str) -> Arc<Node> {
    Arc::new(Node::Leaf {
        metrics: Metrics::of(text),
        text: Arc::from(text),
    })
}

fn internal(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
    let m = metrics(&left).add(metrics(&right));
    let h = 1 + height(&left).max(height(&right));
    Arc::new(Node::Internal {
        left,
        right,
        metrics: m,
        height: h,
    })
}

fn metrics(node: &Node) -> Metrics {
    match node {
        Node::Leaf { metrics, .. } | Node::Internal { metrics, .. } => *metrics,
    }
}

fn height(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 1,
        Node::Internal { height, .. } => *height,
    }
}

fn children(node: &Node) -> (Arc<Node>, Arc<Node>) {
    match node {
        Node::Internal { left, right, .. } => (left.clone(), right.clone()),
        Node::Leaf { .. } => unreachable!("leaf has no children"),
    }
}

/// Build a balanced tree from arbitrary text, chunked into leaves
fn build(text: &str) -> Option<Arc<Node>> {
    if text.is_empty() {
        return None;
    }
    let mut leaves = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if rest.len() <= MAX_LEAF {
            leaves.push(leaf(rest));
            break;
        }
        // Cut near MAX_LEAF, backing off to a scalar boundary. When the
        // remainder would drop under MIN_LEAF, cut near the midpoint
        // instead so both halves stay above it.
        let target = if rest.len() - MAX_LEAF < MIN_LEAF {
            rest.len() / 2
        } else {
            MAX_LEAF
        };
        let cut = floor_char_boundary(rest, target);
        let (head, tail) = rest.split_at(cut);
        leaves.push(leaf(head));
        rest = tail;
    }
    Some(build_balanced(&leaves))
}

fn build_balanced(leaves: &[Arc<Node>]) -> Arc<Node> {
    match leaves.len() {
        1 => leaves[0].clone(),
        n => {
            let mid = n / 2;
            internal(
                build_balanced(&leaves[..mid]),
                build_balanced(&leaves[mid..]),
            )
        }
    }
}

fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

// --- Concatenation and balance ---

fn concat_opt(left: Option<Arc<Node>>, right: Option<Arc<Node>>) -> Option<Arc<Node>> {
    match (left, right) {
        (None, r) => r,
        (l, None) => l,
        (Some(l), Some(r)) => Some(concat(l, r)),
    }
}

fn concat(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
    // Two small leaves collapse into one; everything else joins with
    // AVL repair along the taller spine.
    if let (Node::Leaf { text: lt, .. }, Node::Leaf { text: rt, .. }) = (&*left, &*right) {
        if lt.len() + rt.len() <= MAX_LEAF {
            let mut merged = String::with_capacity(lt.len() + rt.len());
            merged.push_str(lt);
            merged.push_str(rt);
            return leaf(&merged);
        }
    }
    join(left, right)
}

fn join(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
    let hl = height(&left);
    let hr = height(&right);
    if hl.abs_diff(hr) <= 1 {
        internal(left, right)
    } else if hl > hr {
        let (ll, lr) = children(&left);
        rebalance(ll, join(lr, right))
    } else {
        let (rl, rr) = children(&right);
        rebalance(join(left, rl), rr)
    }
}

/// Build an internal node from two subtrees whose heights differ by at
/// most 2, applying the rotation (LL, LR, RR, RL) that restores AVL
/// balance. Rotations are pure: new interior nodes, shared leaves.
fn rebalance(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
    let hl = height(&left);
    let hr = height(&right);
    if hl > hr + 1 {
        let (ll, lr) = children(&left);
        if height(&ll) >= height(&lr) {
            // LL: single right rotation
            internal(ll, internal(lr, right))
        } else {
            // LR: left child rotates left, then right
            let (lrl, lrr) = children(&lr);
            internal(internal(ll, lrl), internal(lrr, right))
        }
    } else if hr > hl + 1 {
        let (rl, rr) = children(&right);
        if height(&rr) >= height(&rl) {
            // RR: single left rotation
            internal(internal(left, rl), rr)
        } else {
            // RL: right child rotates right, then left
            let (rll, rlr) = children(&rl);
            internal(internal(left, rll), internal(rlr, rr))
        }
    } else {
        internal(left, right)
    }
}

// --- Split ---

/// Split at a byte offset known to be a scalar boundary. Both returned
/// sides are balanced trees.
fn split(node: &Arc<Node>, pos: usize) -> (Option<Arc<Node>>, Option<Arc<Node>>) {
    match &**node {
        Node::Leaf { text, .. } => {
            if pos == 0 {
                (None, Some(node.clone()))
            } else if pos == text.len() {
                (Some(node.clone()), None)
            } else {
                (Some(leaf(&text[..pos])), Some(leaf(&text[pos..])))
            }
        }
        Node::Internal { left, right, .. } => {
            let left_bytes = metrics(left).bytes;
            if pos < left_bytes {
                let (a, b) = split(left, pos);
                (a, concat_opt(b, Some(right.clone())))
            } else if pos == left_bytes {
                (Some(left.clone()), Some(right.clone()))
            } else {
                let (a, b) = split(right, pos - left_bytes);
                (concat_opt(Some(left.clone()), a), b)
            }
        }
    }
}

// --- Descent helpers ---

fn node_is_boundary(node: &Node, pos: usize) -> bool {
    match node {
        Node::Leaf { text, .. } => text.is_char_boundary(pos),
        Node::Internal { left, right, .. } => {
            let left_bytes = metrics(left).bytes;
            if pos < left_bytes {
                node_is_boundary(left, pos)
            } else {
                node_is_boundary(right, pos - left_bytes)
            }
        }
    }
}

fn node_char_to_byte(node: &Node, idx: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => text
            .char_indices()
            .nth(idx)
            .map(|(b, _)| b)
            .unwrap_or(text.len()),
        Node::Internal { left, right, .. } => {
            let lm = metrics(left);
            if idx < lm.chars {
                node_char_to_byte(left, idx)
            } else {
                lm.bytes + node_char_to_byte(right, idx - lm.chars)
            }
        }
    }
}

fn node_byte_to_char(node: &Node, pos: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => {
            let fb = floor_char_boundary(text, pos);
            text[..fb].chars().count()
        }
        Node::Internal { left, right, .. } => {
            let lm = metrics(left);
            if pos < lm.bytes {
                node_byte_to_char(left, pos)
            } else {
                lm.chars + node_byte_to_char(right, pos - lm.bytes)
            }
        }
    }
}

fn node_line_at_byte(node: &Node, pos: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => {
            let fb = floor_char_boundary(text, pos);
            text[..fb].bytes().filter(|b| *b == b'\n').count()
        }
        Node::Internal { left, right, .. } => {
            let lm = metrics(left);
            if pos < lm.bytes {
                node_line_at_byte(left, pos)
            } else {
                lm.line_breaks + node_line_at_byte(right, pos - lm.bytes)
            }
        }
    }
}

/// Byte offset just after the `target`-th newline (1-based target)
fn node_nth_newline_end(node: &Node, target: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => {
            let mut seen = 0;
            for (i, b) in text.bytes().enumerate() {
                if b == b'\n' {
                    seen += 1;
                    if seen == target {
                        return i + 1;
                    }
                }
            }
            text.len()
        }
        Node::Internal { left, right, .. } => {
            let lm = metrics(left);
            if target <= lm.line_breaks {
                node_nth_newline_end(left, target)
            } else {
                lm.bytes + node_nth_newline_end(right, target - lm.line_breaks)
            }
        }
    }
}

fn collect_range(node: &Node, start: usize, end: usize, out: &mut String) {
    match node {
        Node::Leaf { text, .. } => {
            out.push_str(&text[start..end]);
        }
        Node::Internal { left, right, .. } => {
            let left_bytes = metrics(left).bytes;
            if start < left_bytes {
                collect_range(left, start, end.min(left_bytes), out);
            }
            if end > left_bytes {
                let rs = start.max(left_bytes) - left_bytes;
                collect_range(right, rs, end - left_bytes, out);
            }
        }
    }
}

// --- Test support ---

#[cfg(test)]
fn check_node(node: &Node) -> (Metrics, usize) {
    match node {
        Node::Leaf { text, metrics, .. } => {
            assert_eq!(*metrics, Metrics::of(text), "leaf metrics drifted");
            assert!(text.len() <= MAX_LEAF, "leaf over MAX_LEAF");
            (*metrics, 1)
        }
        Node::Internal {
            left,
            right,
            metrics,
            height,
        } => {
            let (lm, lh) = check_node(left);
            let (rm, rh) = check_node(right);
            assert_eq!(*metrics, lm.add(rm), "internal metrics drifted");
            assert_eq!(*height, 1 + lh.max(rh), "height drifted");
            assert!(lh.abs_diff(rh) <= 1, "AVL imbalance: {lh} vs {rh}");
            (*metrics, *height)
        }
    }
}

impl Rope {
    /// Walk the whole tree asserting metrics, heights, and balance
    #[cfg(test)]
    pub fn assert_invariants(&self) {
        if let Some(root) = &self.root {
            check_node(root);
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
