//! Undo history as a branching tree of rope snapshots
//!
//! Every committed command appends a child of the current node, so an
//! undo followed by a fresh edit keeps the old future as a sibling
//! branch instead of discarding it. Linear vim-style undo/redo falls
//! out of walking parent links and the most-recently-visited child.
//!
//! Snapshots are rope clones: leaves are reference-counted, so a
//! snapshot costs one spine, not one copy of the document.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::rope::Rope;

/// Maximum sibling branches preserved per node; committing an
/// (K+1)-th child evicts the oldest child and its whole subtree.
pub const MAX_BRANCHES: usize = 10;

#[derive(Debug, Clone)]
pub struct UndoNode {
    pub snapshot: Rope,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Arena index of the child redo will follow
    last_visited: Option<usize>,
    pub label: String,
    pub timestamp_ms: u64,
}

/// Branch listing entry exposed to commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub index: usize,
    pub label: String,
    pub timestamp_ms: u64,
}

pub struct UndoTree {
    /// Node arena; evicted slots become `None`
    nodes: Vec<Option<UndoNode>>,
    root: usize,
    current: usize,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl UndoTree {
    /// Create a tree whose root holds the buffer's initial contents
    pub fn new(initial: Rope) -> Self {
        let root = UndoNode {
            snapshot: initial,
            parent: None,
            children: Vec::new(),
            last_visited: None,
            label: String::from("initial"),
            timestamp_ms: now_ms(),
        };
        UndoTree {
            nodes: vec![Some(root)],
            root: 0,
            current: 0,
        }
    }

    fn node(&self, idx: usize) -> &UndoNode {
        self.nodes[idx].as_ref().expect("live undo node")
    }

    fn node_mut(&mut self, idx: usize) -> &mut UndoNode {
        self.nodes[idx].as_mut().expect("live undo node")
    }

    /// Snapshot at the current node
    pub fn snapshot(&self) -> &Rope {
        &self.node(self.current).snapshot
    }

    /// Arena index of the current node
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_label(&self) -> &str {
        &self.node(self.current).label
    }

    /// Append a snapshot as a new child of the current node and move
    /// onto it. Evicts the current node's oldest child (with its whole
    /// subtree) when the branch cap is reached.
    pub fn commit(&mut self, snapshot: Rope, label: impl Into<String>) -> usize {
        if self.node(self.current).children.len() >= MAX_BRANCHES {
            let oldest = self.node(self.current).children[0];
            self.evict_subtree(oldest);
            let cur = self.current;
            self.node_mut(cur).children.remove(0);
        }

        let idx = self.nodes.len();
        self.nodes.push(Some(UndoNode {
            snapshot,
            parent: Some(self.current),
            children: Vec::new(),
            last_visited: None,
            label: label.into(),
            timestamp_ms: now_ms(),
        }));

        let cur = self.current;
        let parent = self.node_mut(cur);
        parent.children.push(idx);
        parent.last_visited = Some(idx);
        self.current = idx;
        idx
    }

    /// Step to the parent node; returns its snapshot
    pub fn undo(&mut self) -> Result<&Rope> {
        let parent = self.node(self.current).parent.ok_or(Error::AtRoot)?;
        self.node_mut(parent).last_visited = Some(self.current);
        self.current = parent;
        Ok(&self.node(parent).snapshot)
    }

    /// Step to the most recently visited child; returns its snapshot
    pub fn redo(&mut self) -> Result<&Rope> {
        let node = self.node(self.current);
        if node.children.is_empty() {
            return Err(Error::NoRedo);
        }
        let child = node
            .last_visited
            .filter(|c| node.children.contains(c))
            .unwrap_or(*node.children.last().expect("nonempty children"));
        self.current = child;
        Ok(&self.node(child).snapshot)
    }

    /// Number of alternate futures at the current node
    pub fn branch_count(&self) -> usize {
        self.node(self.current).children.len()
    }

    /// Children of the current node, oldest first
    pub fn list_branches(&self) -> Vec<BranchInfo> {
        self.node(self.current)
            .children
            .iter()
            .map(|&c| {
                let n = self.node(c);
                BranchInfo {
                    index: c,
                    label: n.label.clone(),
                    timestamp_ms: n.timestamp_ms,
                }
            })
            .collect()
    }

    /// Jump into the child branch with arena index `index`
    pub fn switch_to_branch(&mut self, index: usize) -> Result<&Rope> {
        if !self.node(self.current).children.contains(&index) {
            return Err(Error::NoRedo);
        }
        let cur = self.current;
        self.node_mut(cur).last_visited = Some(index);
        self.current = index;
        Ok(&self.node(index).snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.node(self.current).parent.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.node(self.current).children.is_empty()
    }

    /// Depth of the current node below the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut idx = self.current;
        while let Some(parent) = self.node(idx).parent {
            depth += 1;
            idx = parent;
        }
        depth
    }

    /// Bound history depth: while the current chain is deeper than
    /// `max`, advance the root one step along it, discarding the old
    /// root's other branches. A `max` of 0 means unbounded.
    pub fn limit_depth(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        while self.depth() > max {
            // Path child: the root's child on the chain toward current
            let mut on_path = self.current;
            while self.node(on_path).parent != Some(self.root) {
                on_path = match self.node(on_path).parent {
                    Some(p) => p,
                    None => return,
                };
            }
            let siblings: Vec<usize> = self
                .node(self.root)
                .children
                .iter()
                .copied()
                .filter(|&c| c != on_path)
                .collect();
            for sibling in siblings {
                self.evict_subtree(sibling);
            }
            self.nodes[self.root] = None;
            self.node_mut(on_path).parent = None;
            self.root = on_path;
        }
    }

    fn evict_subtree(&mut self, idx: usize) {
        let children = match self.nodes[idx].as_ref() {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.evict_subtree(child);
        }
        self.nodes[idx] = None;
    }

    /// Live node count (root included)
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
