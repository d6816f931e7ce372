//! Register store for yank/delete text
//!
//! Named registers `a..z`, numbered history `0..9` (the latest yank in
//! `0`, deletes shifting down `1..9`), `+` as the system-clipboard
//! slot (held in-process; OS integration is an external collaborator),
//! and the `_` black hole that swallows writes.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterContents {
    pub text: String,
    /// Linewise text pastes onto its own line
    pub linewise: bool,
}

impl RegisterContents {
    pub fn charwise(text: impl Into<String>) -> Self {
        RegisterContents {
            text: text.into(),
            linewise: false,
        }
    }

    pub fn linewise(text: impl Into<String>) -> Self {
        RegisterContents {
            text: text.into(),
            linewise: true,
        }
    }
}

pub const BLACK_HOLE: char = '_';
pub const CLIPBOARD: char = '+';

#[derive(Debug, Default)]
pub struct Registers {
    slots: HashMap<char, RegisterContents>,
    /// Most recent non-black-hole write target; the default paste source
    last_written: Option<char>,
}

fn is_valid(name: char) -> bool {
    name.is_ascii_lowercase() || name.is_ascii_digit() || name == CLIPBOARD || name == BLACK_HOLE
}

impl Registers {
    pub fn new() -> Self {
        Registers::default()
    }

    /// Store into a register; `_` discards, anything unknown is a no-op
    pub fn write(&mut self, name: char, contents: RegisterContents) {
        if name == BLACK_HOLE || !is_valid(name) {
            return;
        }
        self.slots.insert(name, contents);
        self.last_written = Some(name);
    }

    pub fn last_written(&self) -> Option<char> {
        self.last_written
    }

    /// Read a register; `_` always reads empty
    pub fn read(&self, name: char) -> Option<&RegisterContents> {
        if name == BLACK_HOLE {
            return None;
        }
        self.slots.get(&name)
    }

    /// A yank lands in the target register (or `0` by default)
    pub fn record_yank(&mut self, target: Option<char>, contents: RegisterContents) {
        match target {
            Some(name) => self.write(name, contents),
            None => self.write('0', contents),
        }
    }

    /// A delete shifts the numbered history `1..9` down and lands in
    /// `1`, unless an explicit target register was named.
    pub fn record_delete(&mut self, target: Option<char>, contents: RegisterContents) {
        match target {
            Some(name) => self.write(name, contents),
            None => {
                for n in (1..9u32).rev() {
                    let from = char::from_digit(n, 10).expect("digit");
                    let to = char::from_digit(n + 1, 10).expect("digit");
                    if let Some(prev) = self.slots.get(&from).cloned() {
                        self.slots.insert(to, prev);
                    }
                }
                self.slots.insert('1', contents);
                self.last_written = Some('1');
            }
        }
    }
}
