//! Key sequence bindings
//!
//! Each mode owns a prefix tree mapping key sequences to commands.
//! Lookup is exact-first: a bound sequence executes immediately even
//! when longer bindings share the prefix.

pub mod defaults;
pub mod trie;

pub use self::trie::{MatchResult, TrieNode};

use std::collections::HashMap;

use crate::commands::Command;
use crate::key::Key;
use crate::mode::Mode;

#[derive(Debug, Clone)]
pub struct Keymap {
    maps: HashMap<Mode, TrieNode>,
}

impl Keymap {
    pub fn empty() -> Self {
        Keymap {
            maps: HashMap::new(),
        }
    }

    /// The built-in bindings
    pub fn standard() -> Self {
        let mut map = Keymap::empty();
        defaults::install(&mut map);
        map
    }

    pub fn bind(&mut self, mode: Mode, keys: &[Key], command: Command) {
        self.maps.entry(mode).or_default().insert(keys, command);
    }

    pub fn lookup(&self, mode: Mode, keys: &[Key]) -> MatchResult {
        match self.maps.get(&mode) {
            Some(trie) => trie.lookup(keys),
            None => MatchResult::None,
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
