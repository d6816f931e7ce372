//! Open-buffer bookkeeping
//!
//! Each open buffer carries its own undo tree, selections, and scroll
//! position. The manager tracks the active buffer and the open order.

use std::collections::HashMap;
use std::path::Path;

use crate::buffer::{Buffer, BufferId};
use crate::error::{Error, Result};
use crate::history::UndoTree;
use crate::selection::SelectionSet;
use crate::viewport::Viewport;

/// A buffer plus its per-buffer editing state
pub struct OpenBuffer {
    pub buffer: Buffer,
    pub undo: UndoTree,
    pub selections: SelectionSet,
    pub viewport: Viewport,
}

impl OpenBuffer {
    fn new(buffer: Buffer) -> Self {
        let undo = UndoTree::new(buffer.rope().clone());
        OpenBuffer {
            buffer,
            undo,
            selections: SelectionSet::new(),
            viewport: Viewport::new(),
        }
    }
}

pub struct BufferManager {
    entries: HashMap<BufferId, OpenBuffer>,
    order: Vec<BufferId>,
    current: usize,
    next_id: BufferId,
}

impl BufferManager {
    /// Start with a single empty buffer
    pub fn new() -> Self {
        let mut manager = BufferManager {
            entries: HashMap::new(),
            order: Vec::new(),
            current: 0,
            next_id: 1,
        };
        let buffer = Buffer::new(manager.take_id());
        manager.add(buffer);
        manager
    }

    fn take_id(&mut self) -> BufferId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add(&mut self, buffer: Buffer) -> BufferId {
        let id = buffer.id;
        self.entries.insert(id, OpenBuffer::new(buffer));
        self.order.push(id);
        self.current = self.order.len() - 1;
        id
    }

    pub fn active_id(&self) -> BufferId {
        self.order[self.current]
    }

    pub fn active(&self) -> &OpenBuffer {
        self.entries.get(&self.active_id()).expect("active buffer")
    }

    pub fn active_mut(&mut self) -> &mut OpenBuffer {
        let id = self.active_id();
        self.entries.get_mut(&id).expect("active buffer")
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        false // never: closing the last buffer spawns an empty one
    }

    /// Open `path`, or switch to it when already open
    pub fn open(&mut self, path: &Path) -> Result<BufferId> {
        let existing = self.order.iter().copied().find(|id| {
            self.entries
                .get(id)
                .and_then(|e| e.buffer.filepath())
                .is_some_and(|p| p == path)
        });
        if let Some(id) = existing {
            self.switch_to(id);
            return Ok(id);
        }
        let id = self.take_id();
        let buffer = Buffer::open_file(id, path)?;
        Ok(self.add(buffer))
    }

    pub fn switch_to(&mut self, id: BufferId) -> bool {
        match self.order.iter().position(|&x| x == id) {
            Some(pos) => {
                self.current = pos;
                true
            }
            None => false,
        }
    }

    /// Close the active buffer. Refuses (with `Modified`) when it has
    /// unsaved changes and `force` is off. Returns how many buffers
    /// remain open; zero means the editor should exit.
    pub fn close_active(&mut self, force: bool) -> Result<usize> {
        let id = self.active_id();
        if !force && self.active().buffer.is_modified() {
            return Err(Error::Modified);
        }
        let pos = self
            .order
            .iter()
            .position(|&x| x == id)
            .expect("active buffer in order");
        self.order.remove(pos);
        self.entries.remove(&id);
        if self.current >= self.order.len() && self.current > 0 {
            self.current -= 1;
        }
        let remaining = self.order.len();
        if remaining == 0 {
            // Keep the invariant that an active buffer always exists
            // in case the caller keeps running
            let buffer = Buffer::new(self.take_id());
            self.add(buffer);
        }
        Ok(remaining)
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}
