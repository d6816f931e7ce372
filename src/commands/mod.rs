//! Editor commands and their executor
//!
//! Commands are the unit the keymap resolves to. The executor mutates
//! at most one buffer's state (rope, selections, registers, marks) and
//! reports failures as user-visible messages rather than panicking.
//! The undo boundary is decided by the caller: a mutating command that
//! returns `Ok` gets exactly one snapshot committed.

pub mod controller;

use crate::buffer::{Buffer, BufferId};
use crate::config::Config;
use crate::history::UndoTree;
use crate::marks::Marks;
use crate::message::MessageQueue;
use crate::mode::Mode;
use crate::movement;
use crate::registers::{RegisterContents, Registers};
use crate::rope::Rope;
use crate::selection::{Position, Selection, SelectionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Motions
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveLineStart,
    MoveLineEnd,
    MoveBufferStart,
    MoveBufferEnd,
    MoveWordForward,
    MoveWordBackward,
    MoveWordEnd,
    PageUp,
    PageDown,

    // Mode transitions (handled by the controller)
    EnterInsert,
    EnterInsertAfter,
    OpenLineBelow,
    OpenLineAbove,
    EnterSelect,
    EnterCommand,

    // Edits
    DeleteChar,
    DeleteLine,
    YankLine,
    PasteAfter,
    PasteBefore,
    DeleteSelection,
    YankSelection,

    // History
    Undo,
    Redo,
    BranchCycle,

    // Multi-cursor
    AddCursorBelow,
    AddCursorAbove,

    // Pending-argument commands (controller captures the next key)
    ReplacePending,
    SetMarkPending,
    JumpMarkPending,
    SelectRegisterPending,
}

/// Outcome of a command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    ErrorMessage(String),
}

/// Everything a command may touch. Built per dispatch from the active
/// buffer's state plus the editor-global stores.
pub struct EditCtx<'a> {
    pub buffer: &'a mut Buffer,
    pub selections: &'a mut SelectionSet,
    pub undo: &'a mut UndoTree,
    pub registers: &'a mut Registers,
    pub marks: &'a mut Marks,
    pub messages: &'a mut MessageQueue,
    pub config: &'a Config,
    /// Page size for PageUp/PageDown, from the viewport
    pub page: usize,
    /// Register named via `"` for the next yank/delete/paste
    pub active_register: Option<char>,
    /// Set when a command needs the editor to activate another buffer
    pub switch_request: &'a mut Option<(BufferId, Position)>,
}

/// Whether a command edits the buffer (drives the undo boundary)
pub fn is_mutating(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::DeleteChar
            | Command::DeleteLine
            | Command::PasteAfter
            | Command::PasteBefore
            | Command::DeleteSelection
    )
}

/// Undo label for a mutating command
pub fn label(cmd: Command) -> &'static str {
    match cmd {
        Command::DeleteChar => "delete char",
        Command::DeleteLine => "delete line",
        Command::PasteAfter | Command::PasteBefore => "paste",
        Command::DeleteSelection => "delete selection",
        _ => "edit",
    }
}

pub fn execute(cmd: Command, mode: Mode, ctx: &mut EditCtx) -> CommandResult {
    let extend = mode == Mode::Select;
    match cmd {
        Command::MoveLeft => apply_motion(ctx, extend, movement::left),
        Command::MoveRight => apply_motion(ctx, extend, movement::right),
        Command::MoveUp => apply_motion(ctx, extend, movement::up),
        Command::MoveDown => apply_motion(ctx, extend, movement::down),
        Command::MoveLineStart => apply_motion(ctx, extend, movement::line_start),
        Command::MoveLineEnd => apply_motion(ctx, extend, movement::line_end),
        Command::MoveBufferStart => apply_motion(ctx, extend, movement::buffer_start),
        Command::MoveBufferEnd => apply_motion(ctx, extend, movement::buffer_end),
        Command::MoveWordForward => apply_motion(ctx, extend, movement::word_forward),
        Command::MoveWordBackward => apply_motion(ctx, extend, movement::word_backward),
        Command::MoveWordEnd => apply_motion(ctx, extend, movement::word_end),
        Command::PageUp => {
            let page = ctx.page;
            apply_motion(ctx, extend, |r, p| movement::page_up(r, p, page))
        }
        Command::PageDown => {
            let page = ctx.page;
            apply_motion(ctx, extend, |r, p| movement::page_down(r, p, page))
        }

        Command::DeleteChar => delete_char_at_cursors(ctx),
        Command::DeleteLine => delete_lines(ctx),
        Command::YankLine => yank_lines(ctx),
        Command::PasteAfter => paste(ctx, true),
        Command::PasteBefore => paste(ctx, false),
        Command::DeleteSelection => delete_selection(ctx),
        Command::YankSelection => yank_selection(ctx),

        Command::Undo => undo(ctx),
        Command::Redo => redo(ctx),
        Command::BranchCycle => branch_cycle(ctx),

        Command::AddCursorBelow => add_cursor(ctx, 1),
        Command::AddCursorAbove => add_cursor(ctx, -1),

        // Mode transitions and pending-argument commands are resolved
        // by the controller before reaching the executor.
        Command::EnterInsert
        | Command::EnterInsertAfter
        | Command::OpenLineBelow
        | Command::OpenLineAbove
        | Command::EnterSelect
        | Command::EnterCommand
        | Command::ReplacePending
        | Command::SetMarkPending
        | Command::JumpMarkPending
        | Command::SelectRegisterPending => CommandResult::Ok,
    }
}

fn apply_motion(
    ctx: &mut EditCtx,
    extend: bool,
    f: impl Fn(&Rope, Position) -> Position,
) -> CommandResult {
    let rope = ctx.buffer.rope().clone();
    ctx.selections.transform(|sel| {
        let head = f(&rope, sel.head);
        if extend {
            Selection::new(sel.anchor, head)
        } else {
            Selection::cursor(head)
        }
    });
    CommandResult::Ok
}

// --- Multi-cursor edit primitives ---
//
// Edits apply in ascending document order with a running byte shift so
// every cursor's target stays correct as earlier edits land.

fn head_byte(rope: &Rope, sel: &Selection) -> usize {
    rope.line_col_to_byte(sel.head.line, sel.head.col)
}

/// Insert `text` at every cursor; cursors end up after their insertion
pub fn insert_at_cursors(ctx: &mut EditCtx, text: &str) -> CommandResult {
    let rope = ctx.buffer.rope();
    let mut bytes: Vec<usize> = ctx.selections.all().iter().map(|s| head_byte(rope, s)).collect();
    bytes.sort_unstable();
    bytes.dedup();

    let mut new_heads = Vec::with_capacity(bytes.len());
    for (i, b) in bytes.iter().enumerate() {
        let at = b + i * text.len();
        if let Err(e) = ctx.buffer.insert_at_byte(at, text) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        new_heads.push(at + text.len());
    }
    set_cursors_at_bytes(ctx, &new_heads);
    CommandResult::Ok
}

/// Insert `open` then `close` at every cursor, leaving the cursor
/// between them (bracket auto-pairing)
pub fn insert_pair_at_cursors(ctx: &mut EditCtx, open: char, close: char) -> CommandResult {
    let mut text = String::new();
    text.push(open);
    text.push(close);
    let rope = ctx.buffer.rope();
    let mut bytes: Vec<usize> = ctx.selections.all().iter().map(|s| head_byte(rope, s)).collect();
    bytes.sort_unstable();
    bytes.dedup();

    let mut new_heads = Vec::with_capacity(bytes.len());
    for (i, b) in bytes.iter().enumerate() {
        let at = b + i * text.len();
        if let Err(e) = ctx.buffer.insert_at_byte(at, &text) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        new_heads.push(at + open.len_utf8());
    }
    set_cursors_at_bytes(ctx, &new_heads);
    CommandResult::Ok
}

/// Delete the scalar before every cursor (backspace)
pub fn delete_before_cursors(ctx: &mut EditCtx) -> CommandResult {
    let rope = ctx.buffer.rope();
    let mut ranges = Vec::new();
    for sel in ctx.selections.all() {
        let b = head_byte(rope, sel);
        if b == 0 {
            continue;
        }
        let start = rope.char_to_byte(rope.byte_to_char(b - 1));
        ranges.push((start, b));
    }
    if ranges.is_empty() {
        return CommandResult::Ok;
    }
    match delete_byte_ranges(ctx, ranges) {
        Ok(_) => CommandResult::Ok,
        Err(e) => CommandResult::ErrorMessage(e),
    }
}

fn forward_char_ranges(ctx: &EditCtx) -> Vec<(usize, usize)> {
    let rope = ctx.buffer.rope();
    let mut ranges = Vec::new();
    for sel in ctx.selections.all() {
        let b = head_byte(rope, sel);
        if b >= rope.len() {
            continue;
        }
        let end = rope.char_to_byte(rope.byte_to_char(b) + 1);
        ranges.push((b, end));
    }
    ranges
}

/// Delete the scalar under every cursor (vim `x`), recording the text
/// in the numbered delete history
pub fn delete_char_at_cursors(ctx: &mut EditCtx) -> CommandResult {
    let ranges = forward_char_ranges(ctx);
    if ranges.is_empty() {
        return CommandResult::Ok;
    }
    let target = ctx.active_register;
    match delete_byte_ranges(ctx, ranges) {
        Ok(removed) => {
            ctx.registers
                .record_delete(target, RegisterContents::charwise(removed));
            CommandResult::Ok
        }
        Err(e) => CommandResult::ErrorMessage(e),
    }
}

/// Delete forward without touching registers (insert-mode Delete key)
pub fn delete_forward_at_cursors(ctx: &mut EditCtx) -> CommandResult {
    let ranges = forward_char_ranges(ctx);
    if ranges.is_empty() {
        return CommandResult::Ok;
    }
    match delete_byte_ranges(ctx, ranges) {
        Ok(_) => CommandResult::Ok,
        Err(e) => CommandResult::ErrorMessage(e),
    }
}

/// Delete non-overlapping byte ranges bottom-up in document order,
/// returning the removed text and placing cursors at the range starts.
fn delete_byte_ranges(
    ctx: &mut EditCtx,
    mut ranges: Vec<(usize, usize)>,
) -> std::result::Result<String, String> {
    ranges.sort_unstable();
    ranges.dedup();
    // Merge overlapping spans so a byte is never deleted twice
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (s, e) in ranges {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut removed = String::new();
    for (s, e) in &merged {
        removed.push_str(
            &ctx.buffer
                .rope()
                .slice(*s, *e)
                .map_err(|e| e.to_string())?,
        );
    }
    for (s, e) in merged.iter().rev() {
        ctx.buffer.delete_bytes(*s, *e).map_err(|e| e.to_string())?;
    }

    let mut shift = 0usize;
    let new_heads: Vec<usize> = merged
        .iter()
        .map(|(s, e)| {
            let h = s - shift;
            shift += e - s;
            h
        })
        .collect();
    set_cursors_at_bytes(ctx, &new_heads);
    Ok(removed)
}

fn set_cursors_at_bytes(ctx: &mut EditCtx, bytes: &[usize]) {
    let rope = ctx.buffer.rope();
    let positions: Vec<Position> = bytes
        .iter()
        .map(|&b| {
            let (line, col) = rope.byte_to_line_col(b);
            Position::new(line, col)
        })
        .collect();
    match positions.split_first() {
        Some((first, rest)) => {
            ctx.selections.set_single_cursor(*first);
            for p in rest {
                ctx.selections.add_selection(Selection::cursor(*p), 0);
            }
        }
        None => ctx.selections.set_single_cursor(Position::default()),
    }
}

// --- Linewise operations ---

fn cursor_lines(ctx: &EditCtx) -> Vec<usize> {
    let mut lines: Vec<usize> = ctx.selections.all().iter().map(|s| s.head.line).collect();
    lines.sort_unstable();
    lines.dedup();
    lines
}

fn line_delete_range(rope: &Rope, line: usize) -> (usize, usize) {
    let start = rope.line_start_byte(line);
    let end = rope.line_end_byte(line);
    if end == rope.len() && start > 0 {
        // Last line has no trailing newline; take the preceding one
        (start - 1, end)
    } else {
        (start, end)
    }
}

fn delete_lines(ctx: &mut EditCtx) -> CommandResult {
    let rope = ctx.buffer.rope().clone();
    let lines = cursor_lines(ctx);
    let mut text = String::new();
    for &line in &lines {
        text.push_str(&rope.line(line));
        text.push('\n');
    }
    let ranges: Vec<(usize, usize)> = lines
        .iter()
        .map(|&l| line_delete_range(&rope, l))
        .collect();
    let target = ctx.active_register;
    match delete_byte_ranges(ctx, ranges) {
        Ok(_) => {
            ctx.registers
                .record_delete(target, RegisterContents::linewise(text));
            // Land on the first column of the line that moved up
            let rope = ctx.buffer.rope().clone();
            ctx.selections.transform(|s| {
                let line = s.head.line.min(rope.line_count() - 1);
                Selection::cursor(Position::new(line, 0))
            });
            CommandResult::Ok
        }
        Err(e) => CommandResult::ErrorMessage(e),
    }
}

fn yank_lines(ctx: &mut EditCtx) -> CommandResult {
    let rope = ctx.buffer.rope();
    let mut text = String::new();
    for line in cursor_lines(ctx) {
        text.push_str(&rope.line(line));
        text.push('\n');
    }
    let count = text.bytes().filter(|b| *b == b'\n').count();
    ctx.registers
        .record_yank(ctx.active_register, RegisterContents::linewise(text));
    ctx.messages.info(format!(
        "{count} line{} yanked",
        if count == 1 { "" } else { "s" }
    ));
    CommandResult::Ok
}

fn paste(ctx: &mut EditCtx, after: bool) -> CommandResult {
    let source = ctx
        .active_register
        .or_else(|| ctx.registers.last_written());
    let contents = match source.and_then(|r| ctx.registers.read(r)) {
        Some(c) => c.clone(),
        None => return CommandResult::ErrorMessage("Nothing in register".to_string()),
    };
    if contents.text.is_empty() {
        return CommandResult::ErrorMessage("Nothing in register".to_string());
    }

    let rope = ctx.buffer.rope().clone();
    let head = ctx.selections.primary().head;
    if contents.linewise {
        let line = head.line;
        let at = if after {
            rope.line_end_byte(line)
        } else {
            rope.line_start_byte(line)
        };
        // A linewise paste after the unterminated last line needs its
        // own leading newline instead of a trailing one.
        let text = if after && at == rope.len() && !rope.is_empty() && !ends_with_newline(&rope) {
            let mut t = String::with_capacity(contents.text.len() + 1);
            t.push('\n');
            t.push_str(contents.text.strip_suffix('\n').unwrap_or(&contents.text));
            t
        } else {
            contents.text.clone()
        };
        if let Err(e) = ctx.buffer.insert_at_byte(at, &text) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        let (line, _) = ctx.buffer.rope().byte_to_line_col(at + 1);
        ctx.selections.set_single_cursor(Position::new(line, 0));
    } else {
        let b = rope.line_col_to_byte(head.line, head.col);
        let at = if after && b < rope.len() {
            rope.char_to_byte(rope.byte_to_char(b) + 1)
        } else {
            b
        };
        if let Err(e) = ctx.buffer.insert_at_byte(at, &contents.text) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        let (line, col) = ctx.buffer.rope().byte_to_line_col(at + contents.text.len());
        ctx.selections.set_single_cursor(Position::new(line, col));
    }
    CommandResult::Ok
}

fn ends_with_newline(rope: &Rope) -> bool {
    rope.line(rope.line_count() - 1).is_empty() && rope.line_count() > 1
}

// --- Selection (Select mode) operations ---

fn selection_byte_span(rope: &Rope, sel: &Selection) -> (usize, usize) {
    let start = sel.start();
    let end = sel.end();
    let sb = rope.line_col_to_byte(start.line, start.col);
    let eb = rope.line_col_to_byte(end.line, end.col);
    // Include the scalar under the head cell, vim-style
    let eb = if eb < rope.len() {
        rope.char_to_byte(rope.byte_to_char(eb) + 1)
    } else {
        eb
    };
    (sb, eb.max(sb))
}

fn delete_selection(ctx: &mut EditCtx) -> CommandResult {
    let rope = ctx.buffer.rope().clone();
    let ranges: Vec<(usize, usize)> = ctx
        .selections
        .all()
        .iter()
        .map(|s| selection_byte_span(&rope, s))
        .collect();
    let target = ctx.active_register;
    match delete_byte_ranges(ctx, ranges) {
        Ok(removed) => {
            ctx.registers
                .record_delete(target, RegisterContents::charwise(removed));
            CommandResult::Ok
        }
        Err(e) => CommandResult::ErrorMessage(e),
    }
}

fn yank_selection(ctx: &mut EditCtx) -> CommandResult {
    let rope = ctx.buffer.rope();
    let mut text = String::new();
    for sel in ctx.selections.all() {
        let (sb, eb) = selection_byte_span(rope, sel);
        match rope.slice(sb, eb) {
            Ok(s) => text.push_str(&s),
            Err(e) => return CommandResult::ErrorMessage(e.to_string()),
        }
    }
    ctx.registers
        .record_yank(ctx.active_register, RegisterContents::charwise(text));
    ctx.selections.transform(|s| Selection::cursor(s.start()));
    CommandResult::Ok
}

// --- Pending-argument command bodies ---

pub fn replace_at_cursors(ctx: &mut EditCtx, c: char) -> CommandResult {
    if c == '\n' || c == '\r' {
        return CommandResult::Ok;
    }
    let rope = ctx.buffer.rope();
    let mut targets: Vec<usize> = ctx
        .selections
        .all()
        .iter()
        .map(|s| head_byte(rope, s))
        .filter(|&b| b < rope.len())
        .collect();
    targets.sort_unstable();
    targets.dedup();
    if targets.is_empty() {
        return CommandResult::Ok;
    }

    let mut replacement = [0u8; 4];
    let replacement = c.encode_utf8(&mut replacement);
    let mut shift = 0isize;
    let mut new_heads = Vec::with_capacity(targets.len());
    for b in targets {
        let at = (b as isize + shift) as usize;
        let rope = ctx.buffer.rope();
        let end = rope.char_to_byte(rope.byte_to_char(at) + 1);
        let under = rope.slice(at, end).unwrap_or_default();
        if under.is_empty() || under == "\n" {
            // Cursor past the line content: nothing to replace
            new_heads.push(at);
            continue;
        }
        let old_len = end - at;
        if let Err(e) = ctx.buffer.delete_bytes(at, end) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        if let Err(e) = ctx.buffer.insert_at_byte(at, replacement) {
            return CommandResult::ErrorMessage(e.to_string());
        }
        shift += replacement.len() as isize - old_len as isize;
        new_heads.push(at);
    }
    set_cursors_at_bytes(ctx, &new_heads);
    CommandResult::Ok
}

pub fn set_mark(ctx: &mut EditCtx, register: char) -> CommandResult {
    if !register.is_ascii_alphabetic() {
        return CommandResult::ErrorMessage("Invalid mark register".to_string());
    }
    let head = ctx.selections.primary().head;
    ctx.marks.set(register, ctx.buffer.id, head);
    CommandResult::Ok
}

pub fn jump_mark(ctx: &mut EditCtx, register: char) -> CommandResult {
    let mark = match ctx.marks.get(register) {
        Some(m) => m,
        None => return CommandResult::ErrorMessage(format!("Mark '{register}' not set")),
    };
    if mark.buffer_id == ctx.buffer.id {
        let rope = ctx.buffer.rope();
        let line = mark.position.line.min(rope.line_count() - 1);
        let col = mark.position.col.min(rope.line_len_chars(line));
        ctx.selections.set_single_cursor(Position::new(line, col));
        CommandResult::Ok
    } else if register.is_ascii_uppercase() {
        *ctx.switch_request = Some((mark.buffer_id, mark.position));
        CommandResult::Ok
    } else {
        CommandResult::ErrorMessage(format!("Mark '{register}' is in another buffer"))
    }
}

/// Insert a newline below (or above) each cursor line, leaving the
/// cursors on the fresh lines. The controller enters Insert mode after.
pub fn open_line(ctx: &mut EditCtx, below: bool) -> CommandResult {
    let rope = ctx.buffer.rope().clone();
    let lines = cursor_lines(ctx);

    let mut insert_bytes = Vec::new();
    for &line in &lines {
        let at = if below {
            rope.line_end_byte(line)
        } else {
            rope.line_start_byte(line)
        };
        insert_bytes.push(at);
    }
    let mut new_heads = Vec::with_capacity(insert_bytes.len());
    for (i, b) in insert_bytes.iter().enumerate() {
        let at = b + i; // one byte of "\n" per earlier insertion
        if below && at == ctx.buffer.rope().len() && !rope.is_empty() && !ends_with_newline(&rope) {
            // Unterminated last line: newline goes in front of the cursor
            if let Err(e) = ctx.buffer.insert_at_byte(at, "\n") {
                return CommandResult::ErrorMessage(e.to_string());
            }
            new_heads.push(at + 1);
        } else {
            if let Err(e) = ctx.buffer.insert_at_byte(at, "\n") {
                return CommandResult::ErrorMessage(e.to_string());
            }
            new_heads.push(at);
        }
    }
    set_cursors_at_bytes(ctx, &new_heads);
    CommandResult::Ok
}

// --- History ---

fn restore_snapshot(ctx: &mut EditCtx, rope: Rope) {
    ctx.buffer.restore_snapshot(rope);
    clamp_selections(ctx);
}

fn clamp_selections(ctx: &mut EditCtx) {
    let rope = ctx.buffer.rope().clone();
    ctx.selections.transform(|s| {
        let line = s.head.line.min(rope.line_count() - 1);
        let col = s.head.col.min(rope.line_len_chars(line));
        Selection::cursor(Position::new(line, col))
    });
}

fn undo(ctx: &mut EditCtx) -> CommandResult {
    let snapshot = match ctx.undo.undo() {
        Ok(rope) => rope.clone(),
        Err(e) => {
            ctx.messages.push(e.level(), e.to_string());
            return CommandResult::Ok;
        }
    };
    restore_snapshot(ctx, snapshot);
    CommandResult::Ok
}

fn redo(ctx: &mut EditCtx) -> CommandResult {
    let snapshot = match ctx.undo.redo() {
        Ok(rope) => rope.clone(),
        Err(e) => {
            ctx.messages.push(e.level(), e.to_string());
            return CommandResult::Ok;
        }
    };
    restore_snapshot(ctx, snapshot);
    CommandResult::Ok
}

/// Step back one node and redo into the next sibling branch; cycling
/// through alternate futures recorded at the parent.
fn branch_cycle(ctx: &mut EditCtx) -> CommandResult {
    if !ctx.undo.can_undo() {
        // At the root: plain redo if there is anywhere to go
        return redo(ctx);
    }
    let came_from = ctx.undo.current_index();
    if ctx.undo.undo().is_err() {
        return CommandResult::Ok;
    }
    let branches = ctx.undo.list_branches();
    let pos = branches
        .iter()
        .position(|b| b.index == came_from)
        .unwrap_or(0);
    let next = &branches[(pos + 1) % branches.len()];
    let label = next.label.clone();
    let total = branches.len();
    let shown = (pos + 1) % total + 1;
    let snapshot = match ctx.undo.switch_to_branch(next.index) {
        Ok(rope) => rope.clone(),
        Err(e) => return CommandResult::ErrorMessage(e.to_string()),
    };
    restore_snapshot(ctx, snapshot);
    ctx.messages.info(format!("Branch {shown}/{total}: {label}"));
    CommandResult::Ok
}

// --- Multi-cursor management ---

fn add_cursor(ctx: &mut EditCtx, direction: isize) -> CommandResult {
    let rope = ctx.buffer.rope();
    let head = ctx.selections.primary().head;
    let line = if direction < 0 {
        match head.line.checked_sub(1) {
            Some(l) => l,
            None => return CommandResult::Ok,
        }
    } else {
        let l = head.line + 1;
        if l >= rope.line_count() {
            return CommandResult::Ok;
        }
        l
    };
    let col = head.col.min(rope.line_len_chars(line));
    let added = ctx.selections.add_selection(
        Selection::cursor(Position::new(line, col)),
        ctx.config.max_cursors,
    );
    if !added {
        ctx.messages
            .warning(format!("Cursor limit ({}) reached", ctx.config.max_cursors));
    }
    CommandResult::Ok
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
