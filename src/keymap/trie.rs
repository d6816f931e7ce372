use std::collections::HashMap;

use crate::commands::Command;
use crate::key::Key;

/// Result of looking up a key sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The sequence is bound: execute now
    Exact(Command),
    /// The sequence is a strict prefix of at least one binding: wait
    Prefix,
    /// No binding starts with this sequence
    None,
}

/// A node in the key sequence trie
#[derive(Debug, Default, Clone)]
pub struct TrieNode {
    children: HashMap<Key, TrieNode>,
    command: Option<Command>,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sequence into the trie
    pub fn insert(&mut self, keys: &[Key], command: Command) {
        match keys.split_first() {
            None => self.command = Some(command),
            Some((head, rest)) => {
                self.children.entry(*head).or_default().insert(rest, command);
            }
        }
    }

    /// Look up a sequence. A node carrying a command matches exactly,
    /// even if longer bindings continue below it: terminal wins.
    pub fn lookup(&self, keys: &[Key]) -> MatchResult {
        match keys.split_first() {
            None => {
                if let Some(command) = self.command {
                    MatchResult::Exact(command)
                } else if !self.children.is_empty() {
                    MatchResult::Prefix
                } else {
                    MatchResult::None
                }
            }
            Some((head, rest)) => match self.children.get(head) {
                Some(child) => child.lookup(rest),
                None => MatchResult::None,
            },
        }
    }
}
