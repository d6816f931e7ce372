//! Modal dispatch
//!
//! The controller is the four-state FSM over Normal / Insert / Select /
//! Command. It owns the pending key prefix, the pending
//! partial command (a command waiting for its argument key), the
//! active register, and the command-line buffer. Escape cancels all of
//! them from any mode.

use crate::command_line::{self, ExCommand};
use crate::commands::{self, Command, CommandResult, EditCtx};
use crate::constants::history::INSERT_LABEL;
use crate::key::{Key, KeyCode};
use crate::keymap::{Keymap, MatchResult};
use crate::mode::Mode;
use crate::selection::Selection;

/// A command that captured its trigger key and is waiting for the
/// argument key that completes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialCommand {
    Replace,
    SetMark,
    JumpMark,
    SelectRegister,
}

/// Editor-level effect a key dispatch may request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    None,
    /// A submitted `:` command line
    Ex(ExCommand),
}

pub struct ModeController {
    mode: Mode,
    keymap: Keymap,
    pending_keys: Vec<Key>,
    pending: Option<PartialCommand>,
    active_register: Option<char>,
    command_line: String,
    /// Buffer revision when the current insert session began; the
    /// whole session commits as one undo step iff it changed anything
    insert_session_start: u64,
}

impl ModeController {
    pub fn new(keymap: Keymap) -> Self {
        ModeController {
            mode: Mode::Normal,
            keymap,
            pending_keys: Vec::new(),
            pending: None,
            active_register: None,
            command_line: String::new(),
            insert_session_start: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Pending-sequence hint for the status line
    pub fn pending_hint(&self) -> String {
        if let Some(partial) = self.pending {
            return match partial {
                PartialCommand::Replace => "r".to_string(),
                PartialCommand::SetMark => "m".to_string(),
                PartialCommand::JumpMark => "'".to_string(),
                PartialCommand::SelectRegister => "\"".to_string(),
            };
        }
        self.pending_keys.iter().map(|k| k.describe()).collect()
    }

    pub fn handle_key(&mut self, key: Key, ctx: &mut EditCtx) -> Dispatch {
        ctx.active_register = self.active_register;
        if key.is(KeyCode::Escape) {
            self.escape(ctx);
            return Dispatch::None;
        }
        match self.mode {
            Mode::Normal | Mode::Select => self.handle_modal_key(key, ctx),
            Mode::Insert => {
                self.handle_insert_key(key, ctx);
                Dispatch::None
            }
            Mode::Command => self.handle_command_key(key),
        }
    }

    /// Paste events insert literally in Insert mode and append to the
    /// command line in Command mode; elsewhere they are dropped.
    pub fn handle_paste(&mut self, text: &str, ctx: &mut EditCtx) {
        match self.mode {
            Mode::Insert => {
                if let CommandResult::ErrorMessage(text) =
                    commands::insert_at_cursors(ctx, text)
                {
                    ctx.messages.error(text);
                }
            }
            Mode::Command => {
                self.command_line
                    .push_str(&text.replace(['\n', '\r'], " "));
            }
            Mode::Normal | Mode::Select => {}
        }
    }

    /// Escape: back to Normal, clearing every pending state
    fn escape(&mut self, ctx: &mut EditCtx) {
        self.pending_keys.clear();
        self.pending = None;
        self.active_register = None;
        match self.mode {
            Mode::Insert => self.commit_insert_session(ctx),
            Mode::Command => self.command_line.clear(),
            Mode::Select => ctx.selections.collapse_all(),
            Mode::Normal => {
                let head = ctx.selections.primary().head;
                ctx.selections.set_single_cursor(head);
            }
        }
        self.mode = Mode::Normal;
    }

    fn commit_insert_session(&mut self, ctx: &mut EditCtx) {
        if ctx.buffer.revision() != self.insert_session_start {
            ctx.undo.commit(ctx.buffer.rope().clone(), INSERT_LABEL);
            ctx.undo.limit_depth(ctx.config.max_undo_history);
        }
    }

    // --- Normal / Select ---

    fn handle_modal_key(&mut self, key: Key, ctx: &mut EditCtx) -> Dispatch {
        if let Some(partial) = self.pending.take() {
            self.finish_partial(partial, key, ctx);
            return Dispatch::None;
        }

        self.pending_keys.push(key);
        match self.keymap.lookup(self.mode, &self.pending_keys) {
            MatchResult::Exact(cmd) => {
                self.pending_keys.clear();
                self.dispatch_command(cmd, ctx)
            }
            MatchResult::Prefix => Dispatch::None,
            MatchResult::None => {
                self.pending_keys.clear();
                Dispatch::None
            }
        }
    }

    fn finish_partial(&mut self, partial: PartialCommand, key: Key, ctx: &mut EditCtx) {
        let c = match key.code {
            KeyCode::Char(c) if !key.ctrl && !key.alt => c,
            _ => return, // anything else cancels the partial
        };
        let result = match partial {
            PartialCommand::Replace => {
                let before = ctx.buffer.revision();
                let result = commands::replace_at_cursors(ctx, c);
                if result == CommandResult::Ok && ctx.buffer.revision() != before {
                    self.commit_edit(ctx, "replace");
                }
                result
            }
            PartialCommand::SetMark => commands::set_mark(ctx, c),
            PartialCommand::JumpMark => commands::jump_mark(ctx, c),
            PartialCommand::SelectRegister => {
                self.active_register = Some(c);
                CommandResult::Ok
            }
        };
        if let CommandResult::ErrorMessage(text) = result {
            ctx.messages.error(text);
        }
    }

    fn dispatch_command(&mut self, cmd: Command, ctx: &mut EditCtx) -> Dispatch {
        match cmd {
            Command::EnterInsert => {
                self.enter_insert(ctx);
            }
            Command::EnterInsertAfter => {
                let rope = ctx.buffer.rope().clone();
                ctx.selections.transform(|s| {
                    let len = rope.line_len_chars(s.head.line);
                    let col = (s.head.col + 1).min(len);
                    Selection::cursor(crate::selection::Position::new(s.head.line, col))
                });
                self.enter_insert(ctx);
            }
            Command::OpenLineBelow | Command::OpenLineAbove => {
                self.enter_insert(ctx);
                let below = cmd == Command::OpenLineBelow;
                if let CommandResult::ErrorMessage(text) = commands::open_line(ctx, below) {
                    ctx.messages.error(text);
                }
            }
            Command::EnterSelect => {
                // Anchors drop where the cursors stand
                ctx.selections.transform(|s| Selection::cursor(s.head));
                self.mode = Mode::Select;
            }
            Command::EnterCommand => {
                self.command_line.clear();
                self.mode = Mode::Command;
            }
            Command::ReplacePending => self.pending = Some(PartialCommand::Replace),
            Command::SetMarkPending => self.pending = Some(PartialCommand::SetMark),
            Command::JumpMarkPending => self.pending = Some(PartialCommand::JumpMark),
            Command::SelectRegisterPending => {
                self.pending = Some(PartialCommand::SelectRegister)
            }
            _ => {
                let before = ctx.buffer.revision();
                let result = commands::execute(cmd, self.mode, ctx);
                match result {
                    CommandResult::Ok => {
                        if commands::is_mutating(cmd) && ctx.buffer.revision() != before {
                            self.commit_edit(ctx, commands::label(cmd));
                        }
                        if consumes_register(cmd) {
                            self.active_register = None;
                        }
                        // Select-mode delete/yank drops back to Normal
                        if self.mode == Mode::Select
                            && matches!(
                                cmd,
                                Command::DeleteSelection | Command::YankSelection
                            )
                        {
                            self.mode = Mode::Normal;
                        }
                    }
                    CommandResult::ErrorMessage(text) => {
                        ctx.messages.error(text);
                        self.active_register = None;
                    }
                }
            }
        }
        Dispatch::None
    }

    fn commit_edit(&mut self, ctx: &mut EditCtx, label: &str) {
        ctx.undo.commit(ctx.buffer.rope().clone(), label);
        ctx.undo.limit_depth(ctx.config.max_undo_history);
    }

    fn enter_insert(&mut self, ctx: &EditCtx) {
        self.mode = Mode::Insert;
        self.insert_session_start = ctx.buffer.revision();
    }

    // --- Insert ---

    fn handle_insert_key(&mut self, key: Key, ctx: &mut EditCtx) {
        if key.ctrl || key.alt {
            return;
        }
        let result = match key.code {
            KeyCode::Char(c) => {
                if ctx.config.auto_pair_brackets {
                    if let Some(close) = pair_close(c) {
                        if let CommandResult::ErrorMessage(text) =
                            commands::insert_pair_at_cursors(ctx, c, close)
                        {
                            ctx.messages.error(text);
                        }
                        return;
                    }
                }
                let mut buf = [0u8; 4];
                commands::insert_at_cursors(ctx, c.encode_utf8(&mut buf))
            }
            KeyCode::Enter => commands::insert_at_cursors(ctx, "\n"),
            KeyCode::Tab => {
                if ctx.config.expand_tabs {
                    let spaces = " ".repeat(ctx.config.tab_width);
                    commands::insert_at_cursors(ctx, &spaces)
                } else {
                    commands::insert_at_cursors(ctx, "\t")
                }
            }
            KeyCode::Backspace => commands::delete_before_cursors(ctx),
            KeyCode::Delete => commands::delete_forward_at_cursors(ctx),
            KeyCode::Left => commands::execute(Command::MoveLeft, self.mode, ctx),
            KeyCode::Right => commands::execute(Command::MoveRight, self.mode, ctx),
            KeyCode::Up => commands::execute(Command::MoveUp, self.mode, ctx),
            KeyCode::Down => commands::execute(Command::MoveDown, self.mode, ctx),
            KeyCode::Home => commands::execute(Command::MoveLineStart, self.mode, ctx),
            KeyCode::End => commands::execute(Command::MoveLineEnd, self.mode, ctx),
            KeyCode::PageUp => commands::execute(Command::PageUp, self.mode, ctx),
            KeyCode::PageDown => commands::execute(Command::PageDown, self.mode, ctx),
            _ => CommandResult::Ok,
        };
        if let CommandResult::ErrorMessage(text) = result {
            ctx.messages.error(text);
        }
    }

    // --- Command line ---

    fn handle_command_key(&mut self, key: Key) -> Dispatch {
        match key.code {
            KeyCode::Char(c) if !key.ctrl && !key.alt => {
                self.command_line.push(c);
                Dispatch::None
            }
            KeyCode::Backspace => {
                if self.command_line.pop().is_none() {
                    self.mode = Mode::Normal;
                }
                Dispatch::None
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.command_line);
                self.mode = Mode::Normal;
                Dispatch::Ex(command_line::parse(&line))
            }
            _ => Dispatch::None,
        }
    }
}

fn pair_close(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

fn consumes_register(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::DeleteChar
            | Command::DeleteLine
            | Command::YankLine
            | Command::PasteAfter
            | Command::PasteBefore
            | Command::DeleteSelection
            | Command::YankSelection
    )
}
