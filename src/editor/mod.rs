//! The editor: event loop, dispatch, and frame composition
//!
//! One cooperative single-threaded loop: render, poll input for at
//! most the terminal's 300 ms read timeout, decode, dispatch, sleep a
//! few milliseconds. Every command is atomic from the renderer's point
//! of view; a frame only ever observes post-command state.

use std::io::Write;
use std::path::Path;

use crate::buffer::manager::BufferManager;
use crate::buffer::BufferId;
use crate::color::{Attrs, Style, Theme};
use crate::command_line::ExCommand;
use crate::commands::controller::{Dispatch, ModeController};
use crate::commands::EditCtx;
use crate::config::Config;
use crate::constants::timing;
use crate::error::Result;
use crate::input::{Decoder, Event, MouseEvent, MouseKind};
use crate::key::{Key, KeyCode};
use crate::keymap::Keymap;
use crate::marks::Marks;
use crate::message::{Level, MessageQueue};
use crate::mode::Mode;
use crate::registers::Registers;
use crate::screen::{Cell, Screen};
use crate::selection::Position;
use crate::syntax::{self, NoHighlight, SyntaxProvider};
use crate::term::Terminal;
use crate::vt::VtWriter;

pub struct Editor<W: Write> {
    buffers: BufferManager,
    controller: ModeController,
    registers: Registers,
    marks: Marks,
    messages: MessageQueue,
    config: Config,
    theme: Theme,
    syntax: Box<dyn SyntaxProvider>,
    screen: Screen,
    vt: VtWriter<W>,
    decoder: Decoder,
    should_quit: bool,
    demo: bool,
    /// Terminal restore sequences already emitted
    released: bool,
}

impl<W: Write> Editor<W> {
    pub fn new(config: Config, demo: bool, sink: W, cols: usize, rows: usize) -> Self {
        let theme = Theme::by_name(&config.theme_name);
        Editor {
            buffers: BufferManager::new(),
            controller: ModeController::new(Keymap::standard()),
            registers: Registers::new(),
            marks: Marks::new(),
            messages: MessageQueue::new(),
            config,
            theme,
            syntax: Box::new(NoHighlight),
            screen: Screen::new(cols, rows),
            vt: VtWriter::new(sink),
            decoder: Decoder::new(),
            should_quit: false,
            demo,
            released: false,
        }
    }

    /// Open `path` into a buffer; failures surface on the message line
    pub fn open_path(&mut self, path: &Path) {
        match self.buffers.open(path) {
            Ok(_) => {
                tracing::info!(path = %path.display(), "opened");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                self.messages.push(e.level(), e.to_string());
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn active_text(&self) -> String {
        self.buffers.active().buffer.rope().to_string()
    }

    /// Decode a batch of raw terminal bytes and dispatch the events.
    /// This is the whole input path minus the blocking read, so tests
    /// drive the editor byte-for-byte like a terminal would.
    pub fn feed_input(&mut self, bytes: &[u8]) {
        if !self.messages.is_empty() {
            self.messages.dismiss();
        }
        let events = self.decoder.feed(bytes);
        for event in events {
            if self.should_quit {
                break;
            }
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                tracing::debug!(cols, rows, "resize");
                self.screen.resize(cols as usize, rows as usize);
            }
        }
    }

    /// Rows available for buffer text: everything except the message
    /// row and the status row
    fn text_rows(&self) -> usize {
        self.screen.height().saturating_sub(2)
    }

    fn handle_key(&mut self, key: Key) {
        if self.demo {
            if key.is(KeyCode::Escape) || key.is(KeyCode::Char('q')) || key == Key::ctrl('c') {
                self.should_quit = true;
            }
            return;
        }

        let page = self.text_rows().saturating_sub(1).max(1);
        let mut switch: Option<(BufferId, Position)> = None;

        let dispatch = {
            let entry = self.buffers.active_mut();
            let mut ctx = EditCtx {
                buffer: &mut entry.buffer,
                selections: &mut entry.selections,
                undo: &mut entry.undo,
                registers: &mut self.registers,
                marks: &mut self.marks,
                messages: &mut self.messages,
                config: &self.config,
                page,
                active_register: None,
                switch_request: &mut switch,
            };
            self.controller.handle_key(key, &mut ctx)
        };

        if let Some((id, position)) = switch {
            self.jump_to_buffer(id, position);
        }
        if let Dispatch::Ex(cmd) = dispatch {
            self.execute_ex(cmd);
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.demo {
            return;
        }
        let page = self.text_rows().saturating_sub(1).max(1);
        let mut switch: Option<(BufferId, Position)> = None;
        let entry = self.buffers.active_mut();
        let mut ctx = EditCtx {
            buffer: &mut entry.buffer,
            selections: &mut entry.selections,
            undo: &mut entry.undo,
            registers: &mut self.registers,
            marks: &mut self.marks,
            messages: &mut self.messages,
            config: &self.config,
            page,
            active_register: None,
            switch_request: &mut switch,
        };
        self.controller.handle_paste(text, &mut ctx);
    }

    fn jump_to_buffer(&mut self, id: BufferId, position: Position) {
        if !self.buffers.switch_to(id) {
            self.messages.error("Buffer no longer open");
            return;
        }
        let entry = self.buffers.active_mut();
        let rope = entry.buffer.rope();
        let line = position.line.min(rope.line_count() - 1);
        let col = position.col.min(rope.line_len_chars(line));
        entry.selections.set_single_cursor(Position::new(line, col));
    }

    fn execute_ex(&mut self, cmd: ExCommand) {
        match cmd {
            ExCommand::Nothing => {}
            ExCommand::Quit { force } => self.close_buffer(force),
            ExCommand::Write { path } => {
                self.write_active(path.as_deref());
            }
            ExCommand::WriteQuit { path } => {
                if self.write_active(path.as_deref()) {
                    self.close_buffer(false);
                }
            }
            ExCommand::Edit { path } => match self.buffers.open(&path) {
                Ok(_) => tracing::info!(path = %path.display(), "opened"),
                Err(e) => self.messages.push(e.level(), e.to_string()),
            },
            ExCommand::Unknown(line) => {
                self.messages.error(format!("Not an editor command: {line}"));
            }
        }
    }

    fn write_active(&mut self, path: Option<&Path>) -> bool {
        let entry = self.buffers.active_mut();
        let result = match path {
            Some(path) => entry.buffer.save_as(path),
            None => entry.buffer.save(),
        };
        match result {
            Ok(()) => {
                let name = entry.buffer.name();
                let bytes = entry.buffer.rope().len();
                self.messages.success(format!("\"{name}\" {bytes}B written"));
                true
            }
            Err(e) => {
                self.messages.push(e.level(), e.to_string());
                false
            }
        }
    }

    fn close_buffer(&mut self, force: bool) {
        let id = self.buffers.active_id();
        match self.buffers.close_active(force) {
            Ok(0) => self.should_quit = true,
            Ok(_) => self.marks.forget_buffer(id),
            Err(e) => self.messages.push(e.level(), e.to_string()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.demo {
            return;
        }
        match mouse.kind {
            MouseKind::Press => {
                let text_rows = self.text_rows();
                let entry = self.buffers.active_mut();
                let rope = entry.buffer.rope();
                let gutter = crate::status::gutter_width(
                    rope.line_count(),
                    self.config.line_numbers,
                );
                let row = mouse.row.saturating_sub(1) as usize;
                let col = mouse.col.saturating_sub(1) as usize;
                if row >= text_rows {
                    return;
                }
                let line = (entry.viewport.top_line + row).min(rope.line_count() - 1);
                let col = entry.viewport.left_col + col.saturating_sub(gutter);
                let col = col.min(rope.line_len_chars(line));
                entry.selections.set_single_cursor(Position::new(line, col));
            }
            MouseKind::ScrollUp => self.scroll_lines(-3),
            MouseKind::ScrollDown => self.scroll_lines(3),
            MouseKind::Release => {}
        }
    }

    fn scroll_lines(&mut self, delta: isize) {
        let entry = self.buffers.active_mut();
        let rope = entry.buffer.rope();
        let last = rope.line_count() - 1;
        entry.selections.transform(|s| {
            let line = s.head.line.saturating_add_signed(delta).min(last);
            let col = s.head.col.min(rope.line_len_chars(line));
            crate::selection::Selection::cursor(Position::new(line, col))
        });
    }

    // --- Rendering ---

    /// Compose the frame, emit only damaged rows, swap. A failed emit
    /// returns before the swap so the front buffer still matches the
    /// terminal contents.
    pub fn render(&mut self) -> std::io::Result<()> {
        let cols = self.screen.width();
        let rows = self.screen.height();
        if cols == 0 || rows < 2 {
            return Ok(());
        }

        self.screen.clear_back();
        let cursor_cell = if self.demo {
            self.compose_demo();
            None
        } else {
            let cell = self.compose_buffer();
            self.compose_message_row();
            self.compose_status_row();
            cell
        };

        self.screen.compute_damage();
        let dirty: Vec<usize> = self.screen.dirty_rows().collect();
        if !dirty.is_empty() {
            self.vt.hide_cursor()?;
            for row in &dirty {
                self.vt.render_row(*row, self.screen.row(*row))?;
            }
        }
        match cursor_cell {
            Some((row, col)) => {
                self.vt.goto(row, col)?;
                self.vt.show_cursor()?;
            }
            None => self.vt.hide_cursor()?,
        }
        self.vt.flush()?;
        self.screen.swap();
        Ok(())
    }

    /// Compose the text area; returns the terminal cursor cell
    fn compose_buffer(&mut self) -> Option<(usize, usize)> {
        let cols = self.screen.width();
        let text_rows = self.text_rows();
        let mode = self.controller.mode();
        let highlight_line = self.config.highlight_current_line;
        let syntax_on = self.config.syntax_highlighting;

        let entry = self.buffers.active_mut();
        let rope = entry.buffer.rope().clone();
        let line_count = rope.line_count();
        let gutter = crate::status::gutter_width(line_count, self.config.line_numbers);
        let text_cols = cols.saturating_sub(gutter);
        let cursor = entry.selections.primary().head;

        entry
            .viewport
            .scroll_to(cursor, text_rows, text_cols, line_count);
        let top = entry.viewport.top_line;
        let left = entry.viewport.left_col;

        let language = entry
            .buffer
            .filepath()
            .and_then(syntax::language_for_path);
        let selections: Vec<crate::selection::Selection> = entry.selections.all().to_vec();

        for screen_row in 0..text_rows {
            let line = top + screen_row;
            if line >= line_count {
                self.screen.write_text(
                    screen_row,
                    0,
                    "~",
                    Style::fg(self.theme.gutter_fg),
                    cols,
                );
                continue;
            }

            if gutter > 0 {
                let label = crate::status::gutter_label(
                    line,
                    cursor.line,
                    self.config.relative_line_numbers,
                    gutter,
                );
                let style = if line == cursor.line {
                    Style {
                        fg: self.theme.gutter_fg,
                        bg: crate::color::Color::Default,
                        attrs: Attrs::bold(),
                    }
                } else {
                    Style::fg(self.theme.gutter_fg)
                };
                self.screen.write_text(screen_row, 0, &label, style, gutter);
            }

            let content = rope.line(line);
            let line_len = content.chars().count();
            let visible: Vec<char> =
                content.chars().skip(left).take(text_cols).collect();

            let base_bg = if highlight_line && line == cursor.line {
                self.theme.current_line_bg
            } else {
                crate::color::Color::Default
            };
            let mut styles = vec![
                Style {
                    fg: crate::color::Color::Default,
                    bg: base_bg,
                    attrs: Attrs::NONE,
                };
                visible.len()
            ];

            if syntax_on {
                let start = rope.line_start_byte(line);
                let end = rope.line_end_byte(line);
                let line_start_char = rope.byte_to_char(start);
                for span in self.syntax.highlights(&rope, language, start..end) {
                    let from = rope.byte_to_char(span.start.max(start)) - line_start_char;
                    let to = rope.byte_to_char(span.end.min(end)) - line_start_char;
                    for col in from..to {
                        if col >= left && col < left + visible.len() {
                            styles[col - left].fg = span.style.fg;
                            styles[col - left].attrs = span.style.attrs;
                        }
                    }
                }
            }

            // Selection spans paint one union; overlapping regions do
            // not double-style.
            if mode == Mode::Select {
                for sel in &selections {
                    if sel.is_cursor() {
                        continue;
                    }
                    let (start, end) = (sel.start(), sel.end());
                    if line < start.line || line > end.line {
                        continue;
                    }
                    let from = if line == start.line { start.col } else { 0 };
                    let to = if line == end.line { end.col } else { line_len };
                    for col in from..=to {
                        if col >= left && col < left + visible.len() {
                            styles[col - left].bg = self.theme.selection_bg;
                        }
                    }
                }
            }

            // Secondary cursors render reversed; the primary is the
            // hardware cursor.
            for sel in selections.iter().skip(1) {
                if sel.head.line == line
                    && sel.head.col >= left
                    && sel.head.col < left + visible.len().max(1)
                {
                    let idx = sel.head.col - left;
                    if idx < styles.len() {
                        styles[idx].attrs.reverse = true;
                    }
                }
            }

            for (i, (ch, style)) in visible.iter().zip(styles.iter()).enumerate() {
                self.screen
                    .set_cell(screen_row, gutter + i, Cell::new(*ch, *style));
            }
            // Secondary cursor sitting at the end of the line content
            for sel in selections.iter().skip(1) {
                if sel.head.line == line && sel.head.col == line_len && line_len >= left {
                    let at = gutter + (line_len - left);
                    let mut cell = Cell::new(' ', Style::default());
                    cell.attrs.reverse = true;
                    if at < cols {
                        self.screen.set_cell(screen_row, at, cell);
                    }
                }
            }
        }

        // Hardware cursor cell
        if mode == Mode::Command {
            let msg_row = self.screen.height() - 2;
            let col = 1 + self.controller.command_line().chars().count();
            return Some((msg_row, col.min(cols.saturating_sub(1))));
        }
        if cursor.line >= top
            && cursor.line < top + text_rows
            && cursor.col >= left
            && cursor.col < left + text_cols
        {
            Some((cursor.line - top, gutter + cursor.col - left))
        } else {
            None
        }
    }

    fn compose_message_row(&mut self) {
        let row = self.screen.height() - 2;
        let cols = self.screen.width();
        if self.controller.mode() == Mode::Command {
            let line = format!(":{}", self.controller.command_line());
            self.screen
                .write_text(row, 0, &line, Style::default(), cols);
            return;
        }
        if let Some(message) = self.messages.current() {
            let fg = match message.level {
                Level::Info => self.theme.info_fg,
                Level::Warning => self.theme.warning_fg,
                Level::Error => self.theme.error_fg,
                Level::Success => self.theme.success_fg,
            };
            self.screen
                .write_text(row, 0, &message.text, Style::fg(fg), cols);
        }
    }

    fn compose_status_row(&mut self) {
        let row = self.screen.height() - 1;
        let cols = self.screen.width();
        let entry = self.buffers.active();
        let (left, right) = crate::status::status_text(
            self.controller.mode(),
            &entry.buffer.name(),
            entry.buffer.is_modified(),
            entry.selections.primary().head,
            entry.buffer.rope().line_count(),
            entry.selections.len(),
            &self.controller.pending_hint(),
        );
        let style = Style {
            fg: self.theme.status_fg,
            bg: self.theme.status_bg,
            attrs: Attrs::NONE,
        };
        self.screen.fill_row(row, Cell::new(' ', style));
        self.screen.write_text(row, 0, &left, style, cols);
        let right_len = right.chars().count();
        if right_len < cols {
            self.screen
                .write_text(row, cols - right_len, &right, style, cols);
        }
    }

    fn compose_demo(&mut self) {
        let cols = self.screen.width();
        let rows = self.screen.height();
        let lines = [
            concat!("aesop v", env!("CARGO_PKG_VERSION")),
            "",
            "A modal terminal text editor",
            "",
            "press q, Esc, or Ctrl-C to quit",
        ];
        let start = rows.saturating_sub(lines.len()) / 2;
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            let col = cols.saturating_sub(width) / 2;
            let style = if i == 0 {
                Style {
                    fg: self.theme.info_fg,
                    bg: crate::color::Color::Default,
                    attrs: Attrs::bold(),
                }
            } else {
                Style::default()
            };
            self.screen.write_text(start + i, col, line, style, cols);
        }
    }

    // --- The loop ---

    pub fn run(&mut self, term: &mut Terminal) -> Result<()> {
        self.vt.enter_alt_screen()?;
        self.vt.clear_screen()?;
        self.vt.enable_mouse()?;
        self.vt.flush()?;

        let size = term.size();
        self.screen.resize(size.cols as usize, size.rows as usize);

        let mut buf = [0u8; 4096];
        while !self.should_quit {
            self.messages.prune_expired();
            self.render()?;

            // The ioctl is cheap; polling it every tick doubles as the
            // resize signal without an async handler.
            let size = term.size();
            if (size.cols as usize, size.rows as usize)
                != (self.screen.width(), self.screen.height())
            {
                self.handle_event(Event::Resize(size.cols, size.rows));
                continue;
            }

            let n = term.read(&mut buf)?;
            if n > 0 {
                self.feed_input(&buf[..n]);
            }
            std::thread::sleep(std::time::Duration::from_millis(timing::LOOP_SLEEP_MS));
        }

        self.release_terminal();
        Ok(())
    }

    /// Emit the terminal restore sequences once
    fn release_terminal(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let _ = self.vt.disable_mouse();
        let _ = self.vt.show_cursor();
        let _ = self.vt.leave_alt_screen();
        let _ = self.vt.flush();
    }
}

impl<W: Write> Drop for Editor<W> {
    fn drop(&mut self) {
        // Runs on panics too; termios restore is the Terminal guard's job
        self.release_terminal();
    }
}
