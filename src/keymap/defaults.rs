//! Built-in key bindings

use crate::commands::Command;
use crate::key::{Key, KeyCode};
use crate::keymap::Keymap;
use crate::mode::Mode;

fn chars(s: &str) -> Vec<Key> {
    s.chars().map(Key::char).collect()
}

pub fn install(map: &mut Keymap) {
    for mode in [Mode::Normal, Mode::Select] {
        // Motions shared by Normal and Select
        map.bind(mode, &chars("h"), Command::MoveLeft);
        map.bind(mode, &chars("j"), Command::MoveDown);
        map.bind(mode, &chars("k"), Command::MoveUp);
        map.bind(mode, &chars("l"), Command::MoveRight);
        map.bind(mode, &[Key::new(KeyCode::Left)], Command::MoveLeft);
        map.bind(mode, &[Key::new(KeyCode::Down)], Command::MoveDown);
        map.bind(mode, &[Key::new(KeyCode::Up)], Command::MoveUp);
        map.bind(mode, &[Key::new(KeyCode::Right)], Command::MoveRight);
        map.bind(mode, &chars("0"), Command::MoveLineStart);
        map.bind(mode, &chars("$"), Command::MoveLineEnd);
        map.bind(mode, &[Key::new(KeyCode::Home)], Command::MoveLineStart);
        map.bind(mode, &[Key::new(KeyCode::End)], Command::MoveLineEnd);
        map.bind(mode, &chars("gg"), Command::MoveBufferStart);
        map.bind(mode, &chars("G"), Command::MoveBufferEnd);
        map.bind(mode, &chars("w"), Command::MoveWordForward);
        map.bind(mode, &chars("b"), Command::MoveWordBackward);
        map.bind(mode, &chars("e"), Command::MoveWordEnd);
        map.bind(mode, &[Key::new(KeyCode::PageUp)], Command::PageUp);
        map.bind(mode, &[Key::new(KeyCode::PageDown)], Command::PageDown);
        map.bind(mode, &[Key::ctrl('u')], Command::PageUp);
        map.bind(mode, &[Key::ctrl('d')], Command::PageDown);
    }

    // Normal-only
    map.bind(Mode::Normal, &chars("i"), Command::EnterInsert);
    map.bind(Mode::Normal, &chars("a"), Command::EnterInsertAfter);
    map.bind(Mode::Normal, &chars("o"), Command::OpenLineBelow);
    map.bind(Mode::Normal, &chars("O"), Command::OpenLineAbove);
    map.bind(Mode::Normal, &chars("v"), Command::EnterSelect);
    map.bind(Mode::Normal, &chars(":"), Command::EnterCommand);
    map.bind(Mode::Normal, &chars("x"), Command::DeleteChar);
    map.bind(Mode::Normal, &[Key::new(KeyCode::Delete)], Command::DeleteChar);
    map.bind(Mode::Normal, &chars("dd"), Command::DeleteLine);
    map.bind(Mode::Normal, &chars("yy"), Command::YankLine);
    map.bind(Mode::Normal, &chars("p"), Command::PasteAfter);
    map.bind(Mode::Normal, &chars("P"), Command::PasteBefore);
    map.bind(Mode::Normal, &chars("u"), Command::Undo);
    map.bind(Mode::Normal, &[Key::ctrl('r')], Command::Redo);
    map.bind(Mode::Normal, &chars("gb"), Command::BranchCycle);
    map.bind(Mode::Normal, &chars("r"), Command::ReplacePending);
    map.bind(Mode::Normal, &chars("m"), Command::SetMarkPending);
    map.bind(Mode::Normal, &chars("'"), Command::JumpMarkPending);
    map.bind(Mode::Normal, &chars("\""), Command::SelectRegisterPending);
    map.bind(
        Mode::Normal,
        &[Key {
            code: KeyCode::Down,
            ctrl: false,
            alt: true,
        }],
        Command::AddCursorBelow,
    );
    map.bind(
        Mode::Normal,
        &[Key {
            code: KeyCode::Up,
            ctrl: false,
            alt: true,
        }],
        Command::AddCursorAbove,
    );

    // Select-only
    map.bind(Mode::Select, &chars("d"), Command::DeleteSelection);
    map.bind(Mode::Select, &chars("x"), Command::DeleteSelection);
    map.bind(Mode::Select, &chars("y"), Command::YankSelection);
    map.bind(Mode::Select, &chars("\""), Command::SelectRegisterPending);
}
