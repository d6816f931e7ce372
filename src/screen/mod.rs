//! Double-buffered character-cell compositor
//!
//! The editor composes each frame into the back buffer; damage is the
//! set of rows where back and front differ. Only damaged rows reach
//! the terminal, after which the buffers swap.
//!
//! ## screen/ Invariants
//!
//! - A row is dirty iff any of its cells differs from the front buffer.
//! - The first frame after creation or resize is fully dirty.
//! - After a swap, no row is dirty until the back buffer changes again.
//! - Out-of-bounds writes are clipped, never panic.

use crate::color::{Attrs, Color, Style};

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Cell {
    pub fn new(ch: char, style: Style) -> Self {
        Cell {
            ch,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    pub fn blank() -> Self {
        Cell {
            ch: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::NONE,
        }
    }

    pub fn style(&self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank()
    }
}

pub struct Screen {
    width: usize,
    height: usize,
    /// Row-major back buffer (composed into)
    back: Vec<Cell>,
    /// Row-major front buffer (what the terminal shows)
    front: Vec<Cell>,
    /// Per-row damage, valid after `compute_damage`
    dirty: Vec<bool>,
    /// Set on creation and resize: next damage pass marks every row
    force_all: bool,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Screen {
            width,
            height,
            back: vec![Cell::blank(); width * height],
            front: vec![Cell::blank(); width * height],
            dirty: vec![false; height],
            force_all: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.back = vec![Cell::blank(); width * height];
        self.front = vec![Cell::blank(); width * height];
        self.dirty = vec![false; height];
        self.force_all = true;
    }

    /// Reset the back buffer to blanks; the start of every compose
    pub fn clear_back(&mut self) {
        self.back.fill(Cell::blank());
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.height && col < self.width {
            self.back[row * self.width + col] = cell;
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.height && col < self.width {
            Some(&self.back[row * self.width + col])
        } else {
            None
        }
    }

    /// Write text left to right from `(row, col)`, one column per
    /// scalar, clipped at `max_col` and the screen edge. Control
    /// characters render as spaces. Returns the column after the last
    /// written cell.
    pub fn write_text(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        style: Style,
        max_col: usize,
    ) -> usize {
        if row >= self.height {
            return col;
        }
        let limit = max_col.min(self.width);
        let mut at = col;
        for ch in text.chars() {
            if at >= limit {
                break;
            }
            let ch = if ch.is_control() { ' ' } else { ch };
            self.back[row * self.width + at] = Cell::new(ch, style);
            at += 1;
        }
        at
    }

    /// Fill a whole row with one cell
    pub fn fill_row(&mut self, row: usize, cell: Cell) {
        if row < self.height {
            let start = row * self.width;
            self.back[start..start + self.width].fill(cell);
        }
    }

    /// The composed cells of one row
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.width;
        &self.back[start..start + self.width]
    }

    /// Compare back against front, marking each differing row dirty.
    /// The first pass after creation/resize marks everything.
    pub fn compute_damage(&mut self) {
        for row in 0..self.height {
            let start = row * self.width;
            let range = start..start + self.width;
            self.dirty[row] =
                self.force_all || self.back[range.clone()] != self.front[range];
        }
    }

    pub fn is_dirty(&self, row: usize) -> bool {
        self.dirty.get(row).copied().unwrap_or(false)
    }

    /// Rows marked dirty by the last damage pass
    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.height).filter(move |&r| self.dirty[r])
    }

    /// Promote the back buffer to front after a successful emit and
    /// clear all damage
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
        self.dirty.fill(false);
        self.force_all = false;
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
