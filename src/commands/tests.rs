use super::*;
use crate::buffer::Buffer;
use crate::config::Config;
use crate::history::UndoTree;
use crate::marks::Marks;
use crate::message::MessageQueue;
use crate::registers::Registers;
use crate::rope::Rope;

struct Fixture {
    buffer: Buffer,
    selections: SelectionSet,
    undo: UndoTree,
    registers: Registers,
    marks: Marks,
    messages: MessageQueue,
    config: Config,
    switch: Option<(crate::buffer::BufferId, Position)>,
}

impl Fixture {
    fn new(text: &str) -> Self {
        let mut buffer = Buffer::new(1);
        if !text.is_empty() {
            buffer.insert(Position::new(0, 0), text).unwrap();
        }
        let undo = UndoTree::new(buffer.rope().clone());
        Fixture {
            buffer,
            selections: SelectionSet::new(),
            undo,
            registers: Registers::new(),
            marks: Marks::new(),
            messages: MessageQueue::new(),
            config: Config::default(),
            switch: None,
        }
    }

    fn ctx(&mut self) -> EditCtx<'_> {
        EditCtx {
            buffer: &mut self.buffer,
            selections: &mut self.selections,
            undo: &mut self.undo,
            registers: &mut self.registers,
            marks: &mut self.marks,
            messages: &mut self.messages,
            config: &self.config,
            page: 10,
            active_register: None,
            switch_request: &mut self.switch,
        }
    }

    fn text(&self) -> String {
        self.buffer.rope().to_string()
    }

    fn cursor(&self) -> Position {
        self.selections.primary().head
    }
}

fn run(fx: &mut Fixture, cmd: Command, mode: Mode) -> CommandResult {
    let mut ctx = fx.ctx();
    execute(cmd, mode, &mut ctx)
}

#[test]
fn test_motion_moves_cursor_in_normal() {
    let mut fx = Fixture::new("hello\nworld");
    run(&mut fx, Command::MoveRight, Mode::Normal);
    run(&mut fx, Command::MoveRight, Mode::Normal);
    assert_eq!(fx.cursor(), Position::new(0, 2));
    let sel = fx.selections.primary();
    assert!(sel.is_cursor());
}

#[test]
fn test_motion_extends_in_select() {
    let mut fx = Fixture::new("hello");
    run(&mut fx, Command::MoveRight, Mode::Select);
    run(&mut fx, Command::MoveRight, Mode::Select);
    let sel = fx.selections.primary();
    assert_eq!(sel.anchor, Position::new(0, 0));
    assert_eq!(sel.head, Position::new(0, 2));
}

#[test]
fn test_delete_char_under_cursor() {
    let mut fx = Fixture::new("abc");
    run(&mut fx, Command::DeleteChar, Mode::Normal);
    assert_eq!(fx.text(), "bc");
    assert_eq!(fx.registers.read('1').unwrap().text, "a");
}

#[test]
fn test_delete_char_multi_cursor() {
    let mut fx = Fixture::new("abc\ndef");
    fx.selections.set_single_cursor(Position::new(0, 0));
    fx.selections
        .add_selection(crate::selection::Selection::cursor(Position::new(1, 0)), 0);
    run(&mut fx, Command::DeleteChar, Mode::Normal);
    assert_eq!(fx.text(), "bc\nef");
    assert_eq!(fx.selections.len(), 2);
}

#[test]
fn test_delete_line_middle() {
    let mut fx = Fixture::new("one\ntwo\nthree");
    fx.selections.set_single_cursor(Position::new(1, 1));
    run(&mut fx, Command::DeleteLine, Mode::Normal);
    assert_eq!(fx.text(), "one\nthree");
    assert_eq!(fx.registers.read('1').unwrap().text, "two\n");
}

#[test]
fn test_delete_last_line_takes_preceding_newline() {
    let mut fx = Fixture::new("one\ntwo");
    fx.selections.set_single_cursor(Position::new(1, 0));
    run(&mut fx, Command::DeleteLine, Mode::Normal);
    assert_eq!(fx.text(), "one");
}

#[test]
fn test_paste_charwise_after() {
    let mut fx = Fixture::new("abc");
    fx.registers
        .write('a', crate::registers::RegisterContents::charwise("XY"));
    run(&mut fx, Command::PasteAfter, Mode::Normal);
    assert_eq!(fx.text(), "aXYbc");
}

#[test]
fn test_paste_linewise_after() {
    let mut fx = Fixture::new("one\ntwo");
    fx.registers
        .write('a', crate::registers::RegisterContents::linewise("new\n"));
    fx.selections.set_single_cursor(Position::new(0, 1));
    run(&mut fx, Command::PasteAfter, Mode::Normal);
    assert_eq!(fx.text(), "one\nnew\ntwo");
    assert_eq!(fx.cursor(), Position::new(1, 0));
}

#[test]
fn test_paste_linewise_before() {
    let mut fx = Fixture::new("one");
    fx.registers
        .write('a', crate::registers::RegisterContents::linewise("new\n"));
    run(&mut fx, Command::PasteBefore, Mode::Normal);
    assert_eq!(fx.text(), "new\none");
}

#[test]
fn test_paste_empty_register_reports() {
    let mut fx = Fixture::new("abc");
    let result = run(&mut fx, Command::PasteAfter, Mode::Normal);
    assert!(matches!(result, CommandResult::ErrorMessage(_)));
    assert_eq!(fx.text(), "abc");
}

#[test]
fn test_insert_at_cursors_multi() {
    let mut fx = Fixture::new("ab\ncd");
    fx.selections.set_single_cursor(Position::new(0, 1));
    fx.selections
        .add_selection(crate::selection::Selection::cursor(Position::new(1, 1)), 0);
    let mut ctx = fx.ctx();
    insert_at_cursors(&mut ctx, "--");
    assert_eq!(fx.text(), "a--b\nc--d");
    // Both cursors sit after their insertion
    assert_eq!(fx.selections.all()[0].head, Position::new(0, 3));
    assert_eq!(fx.selections.all()[1].head, Position::new(1, 3));
}

#[test]
fn test_backspace_at_line_start_joins() {
    let mut fx = Fixture::new("ab\ncd");
    fx.selections.set_single_cursor(Position::new(1, 0));
    let mut ctx = fx.ctx();
    delete_before_cursors(&mut ctx);
    assert_eq!(fx.text(), "abcd");
    assert_eq!(fx.cursor(), Position::new(0, 2));
}

#[test]
fn test_backspace_at_origin_is_noop() {
    let mut fx = Fixture::new("ab");
    let mut ctx = fx.ctx();
    delete_before_cursors(&mut ctx);
    assert_eq!(fx.text(), "ab");
}

#[test]
fn test_open_line_below_and_above() {
    let mut fx = Fixture::new("one\ntwo");
    let mut ctx = fx.ctx();
    open_line(&mut ctx, true);
    assert_eq!(fx.text(), "one\n\ntwo");
    assert_eq!(fx.cursor(), Position::new(1, 0));

    let mut fx = Fixture::new("one");
    let mut ctx = fx.ctx();
    open_line(&mut ctx, false);
    assert_eq!(fx.text(), "\none");
    assert_eq!(fx.cursor(), Position::new(0, 0));
}

#[test]
fn test_replace_multibyte() {
    let mut fx = Fixture::new("aé");
    fx.selections.set_single_cursor(Position::new(0, 1));
    let mut ctx = fx.ctx();
    replace_at_cursors(&mut ctx, 'X');
    assert_eq!(fx.text(), "aX");

    let mut fx = Fixture::new("ab");
    let mut ctx = fx.ctx();
    replace_at_cursors(&mut ctx, '世');
    assert_eq!(fx.text(), "世b");
}

#[test]
fn test_selection_delete_records_register() {
    let mut fx = Fixture::new("abcdef");
    fx.selections.set_single_selection(crate::selection::Selection::new(
        Position::new(0, 1),
        Position::new(0, 3),
    ));
    run(&mut fx, Command::DeleteSelection, Mode::Select);
    assert_eq!(fx.text(), "aef");
    assert_eq!(fx.registers.read('1').unwrap().text, "bcd");
}

#[test]
fn test_undo_redo_restore_snapshots() {
    let mut fx = Fixture::new("base");
    fx.buffer.insert(Position::new(0, 4), "!").unwrap();
    fx.undo.commit(fx.buffer.rope().clone(), "edit");

    run(&mut fx, Command::Undo, Mode::Normal);
    assert_eq!(fx.text(), "base");
    run(&mut fx, Command::Redo, Mode::Normal);
    assert_eq!(fx.text(), "base!");
}

#[test]
fn test_undo_at_root_is_benign_hint() {
    let mut fx = Fixture::new("base");
    let result = run(&mut fx, Command::Undo, Mode::Normal);
    assert_eq!(result, CommandResult::Ok);
    assert!(fx
        .messages
        .current()
        .unwrap()
        .text
        .contains("oldest change"));
}

#[test]
fn test_undo_clamps_selections() {
    let mut fx = Fixture::new("short");
    fx.buffer
        .insert(Position::new(0, 5), "\nmuch longer line")
        .unwrap();
    fx.undo.commit(fx.buffer.rope().clone(), "edit");
    fx.selections.set_single_cursor(Position::new(1, 10));

    run(&mut fx, Command::Undo, Mode::Normal);
    assert_eq!(fx.text(), "short");
    assert_eq!(fx.cursor(), Position::new(0, 5));
}

#[test]
fn test_branch_cycle_switches_futures() {
    let mut fx = Fixture::new("abc");

    // Future 1: "abcX"
    fx.buffer.insert(Position::new(0, 3), "X").unwrap();
    fx.undo.commit(fx.buffer.rope().clone(), "insert X");
    run(&mut fx, Command::Undo, Mode::Normal);

    // Future 2: "abcY"
    fx.buffer.restore_snapshot(Rope::from_str("abcY"));
    fx.undo.commit(fx.buffer.rope().clone(), "insert Y");

    // From "abcY", cycling goes to the sibling "abcX"
    run(&mut fx, Command::BranchCycle, Mode::Normal);
    assert_eq!(fx.text(), "abcX");
    // And cycling again comes back around
    run(&mut fx, Command::BranchCycle, Mode::Normal);
    assert_eq!(fx.text(), "abcY");
}

#[test]
fn test_add_cursor_respects_cap() {
    let mut fx = Fixture::new("a\nb\nc\nd");
    fx.config.max_cursors = 2;
    run(&mut fx, Command::AddCursorBelow, Mode::Normal);
    assert_eq!(fx.selections.len(), 2);
    run(&mut fx, Command::AddCursorBelow, Mode::Normal);
    assert_eq!(fx.selections.len(), 2);
    assert!(fx.messages.current().unwrap().text.contains("Cursor limit"));
}

#[test]
fn test_jump_mark_other_buffer_requests_switch() {
    let mut fx = Fixture::new("abc");
    fx.marks.set('A', 99, Position::new(2, 0));
    let mut ctx = fx.ctx();
    let result = jump_mark(&mut ctx, 'A');
    assert_eq!(result, CommandResult::Ok);
    assert_eq!(fx.switch, Some((99, Position::new(2, 0))));
}

#[test]
fn test_jump_unset_mark_reports() {
    let mut fx = Fixture::new("abc");
    let mut ctx = fx.ctx();
    let result = jump_mark(&mut ctx, 'z');
    assert!(matches!(result, CommandResult::ErrorMessage(_)));
}

#[test]
fn test_word_motion_commands() {
    let mut fx = Fixture::new("foo bar baz");
    run(&mut fx, Command::MoveWordForward, Mode::Normal);
    assert_eq!(fx.cursor(), Position::new(0, 4));
    run(&mut fx, Command::MoveWordForward, Mode::Normal);
    assert_eq!(fx.cursor(), Position::new(0, 8));
    run(&mut fx, Command::MoveWordBackward, Mode::Normal);
    assert_eq!(fx.cursor(), Position::new(0, 4));
}
