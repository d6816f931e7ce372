use super::*;
use crate::commands::Command;
use crate::key::Key;
use crate::mode::Mode;

fn keys(s: &str) -> Vec<Key> {
    s.chars().map(Key::char).collect()
}

#[test]
fn test_single_key_binding() {
    let map = Keymap::standard();
    assert_eq!(
        map.lookup(Mode::Normal, &keys("x")),
        MatchResult::Exact(Command::DeleteChar)
    );
}

#[test]
fn test_sequence_prefix_then_exact() {
    let map = Keymap::standard();
    assert_eq!(map.lookup(Mode::Normal, &keys("d")), MatchResult::Prefix);
    assert_eq!(
        map.lookup(Mode::Normal, &keys("dd")),
        MatchResult::Exact(Command::DeleteLine)
    );
}

#[test]
fn test_unbound_sequence() {
    let map = Keymap::standard();
    assert_eq!(map.lookup(Mode::Normal, &keys("Q")), MatchResult::None);
    assert_eq!(map.lookup(Mode::Normal, &keys("dx")), MatchResult::None);
}

#[test]
fn test_mode_separation() {
    let map = Keymap::standard();
    // `d` is a prefix in Normal (dd) but terminal in Select
    assert_eq!(
        map.lookup(Mode::Select, &keys("d")),
        MatchResult::Exact(Command::DeleteSelection)
    );
    // `i` means nothing in Select
    assert_eq!(map.lookup(Mode::Select, &keys("i")), MatchResult::None);
}

#[test]
fn test_custom_binding_overrides() {
    let mut map = Keymap::empty();
    map.bind(Mode::Normal, &keys("zz"), Command::MoveBufferEnd);
    assert_eq!(map.lookup(Mode::Normal, &keys("z")), MatchResult::Prefix);
    assert_eq!(
        map.lookup(Mode::Normal, &keys("zz")),
        MatchResult::Exact(Command::MoveBufferEnd)
    );
}

#[test]
fn test_ctrl_keys_distinct_from_plain() {
    let map = Keymap::standard();
    assert_eq!(
        map.lookup(Mode::Normal, &[Key::ctrl('r')]),
        MatchResult::Exact(Command::Redo)
    );
    assert_eq!(map.lookup(Mode::Normal, &[Key::char('r')]), MatchResult::Exact(Command::ReplacePending));
}
