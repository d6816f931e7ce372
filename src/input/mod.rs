//! Byte-stream input decoder
//!
//! A state machine that turns the raw tty byte stream into structured
//! events. No I/O happens here; the terminal layer feeds batches of
//! bytes in and events come out in arrival order.
//!
//! ## input/ Invariants
//!
//! - The decoder is a pure transformation: same bytes in, same events
//!   out, regardless of batch boundaries (except the dangling-escape
//!   flush, which is per batch).
//! - Multi-byte UTF-8 sequences always surface as a single Char event.
//! - Unrecognized sequences are dropped, never passed through as
//!   garbage characters.

use crate::key::{Key, KeyCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Mouse(MouseEvent),
    /// Bracketed paste contents, delivered as one event
    Paste(String),
    /// Terminal size changed (cols, rows); produced by the terminal
    /// layer, not by escape parsing
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press,
    Release,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub button: MouseButton,
    /// 1-indexed, as reported by the terminal
    pub col: u16,
    pub row: u16,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escape,
    Csi,
    MouseSgr,
}

pub struct Decoder {
    state: State,
    /// Accumulated CSI parameter/intermediate bytes (terminator excluded)
    csi: Vec<u8>,
    /// Pending UTF-8 sequence
    utf8: [u8; 4],
    utf8_len: usize,
    utf8_need: usize,
    /// Bracketed-paste accumulator; `Some` between 200~ and 201~
    paste: Option<Vec<u8>>,
}

const PASTE_END: &[u8] = b"\x1b[201~";

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            state: State::Normal,
            csi: Vec::new(),
            utf8: [0; 4],
            utf8_len: 0,
            utf8_need: 0,
            paste: None,
        }
    }

    /// Decode a batch of bytes, then apply the dangling-escape policy:
    /// a batch that ends with the machine still in the Escape state
    /// yields a standalone Escape key.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut out = Vec::new();
        for &b in bytes {
            self.push_byte(b, &mut out);
        }
        if self.state == State::Escape {
            out.push(Event::Key(Key::new(KeyCode::Escape)));
            self.state = State::Normal;
        }
        out
    }

    fn push_byte(&mut self, b: u8, out: &mut Vec<Event>) {
        if let Some(buf) = &mut self.paste {
            buf.push(b);
            if buf.ends_with(PASTE_END) {
                buf.truncate(buf.len() - PASTE_END.len());
                let text = String::from_utf8_lossy(buf).into_owned();
                self.paste = None;
                out.push(Event::Paste(text));
            }
            return;
        }

        match self.state {
            State::Normal => self.normal_byte(b, out),
            State::Escape => self.escape_byte(b, out),
            State::Csi => self.csi_byte(b, out),
            State::MouseSgr => self.mouse_byte(b, out),
        }
    }

    fn normal_byte(&mut self, b: u8, out: &mut Vec<Event>) {
        if self.utf8_need > 0 {
            self.utf8_continuation(b, out);
            return;
        }
        match b {
            0x1b => self.state = State::Escape,
            0x7f => out.push(Event::Key(Key::new(KeyCode::Backspace))),
            b'\r' | b'\n' => out.push(Event::Key(Key::new(KeyCode::Enter))),
            b'\t' => out.push(Event::Key(Key::new(KeyCode::Tab))),
            0x01..=0x1a => {
                // Ctrl-modified letter: ^A..^Z map back to a..z
                out.push(Event::Key(Key::ctrl((b + 0x60) as char)));
            }
            0x20..=0x7e => out.push(Event::Key(Key::char(b as char))),
            0xc2..=0xdf => self.utf8_start(b, 2),
            0xe0..=0xef => self.utf8_start(b, 3),
            0xf0..=0xf4 => self.utf8_start(b, 4),
            _ => {} // stray control or invalid UTF-8 lead: drop
        }
    }

    fn utf8_start(&mut self, b: u8, need: usize) {
        self.utf8[0] = b;
        self.utf8_len = 1;
        self.utf8_need = need;
    }

    fn utf8_continuation(&mut self, b: u8, out: &mut Vec<Event>) {
        if b & 0b1100_0000 != 0b1000_0000 {
            // Broken sequence: drop it and reprocess this byte fresh
            self.utf8_need = 0;
            self.utf8_len = 0;
            self.normal_byte(b, out);
            return;
        }
        self.utf8[self.utf8_len] = b;
        self.utf8_len += 1;
        if self.utf8_len == self.utf8_need {
            if let Ok(s) = std::str::from_utf8(&self.utf8[..self.utf8_len]) {
                if let Some(c) = s.chars().next() {
                    out.push(Event::Key(Key::char(c)));
                }
            }
            self.utf8_need = 0;
            self.utf8_len = 0;
        }
    }

    fn escape_byte(&mut self, b: u8, out: &mut Vec<Event>) {
        match b {
            b'[' => {
                self.csi.clear();
                self.state = State::Csi;
            }
            0x20..=0x7e => {
                out.push(Event::Key(Key::alt(b as char)));
                self.state = State::Normal;
            }
            _ => self.state = State::Normal, // drop
        }
    }

    fn csi_byte(&mut self, b: u8, out: &mut Vec<Event>) {
        if self.csi.is_empty() && b == b'<' {
            self.state = State::MouseSgr;
            return;
        }
        if (0x40..=0x7e).contains(&b) {
            let event = parse_csi(&self.csi, b, &mut self.paste);
            if let Some(event) = event {
                out.push(event);
            }
            self.state = State::Normal;
            return;
        }
        self.csi.push(b);
    }

    fn mouse_byte(&mut self, b: u8, out: &mut Vec<Event>) {
        if b == b'M' || b == b'm' {
            if let Some(event) = parse_mouse_sgr(&self.csi, b == b'M') {
                out.push(Event::Mouse(event));
            }
            self.csi.clear();
            self.state = State::Normal;
            return;
        }
        self.csi.push(b);
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_params(raw: &[u8]) -> Vec<u16> {
    raw.split(|b| *b == b';')
        .map(|part| {
            part.iter()
                .filter(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| {
                    acc.saturating_mul(10).saturating_add((b - b'0') as u16)
                })
        })
        .collect()
}

/// xterm modifier parameter: value - 1 is a bitmask of
/// shift(1) / alt(2) / ctrl(4)
fn apply_modifier(mut key: Key, param: u16) -> Key {
    if param >= 2 {
        let bits = param - 1;
        key.ctrl = bits & 4 != 0;
        key.alt = bits & 2 != 0;
        // Shift is not tracked on special keys beyond what the
        // terminal already folded into the character itself
    }
    key
}

fn parse_csi(raw: &[u8], terminator: u8, paste: &mut Option<Vec<u8>>) -> Option<Event> {
    let params = parse_params(raw);
    let modifier = params.get(1).copied().unwrap_or(0);

    let code = match terminator {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'~' => {
            let num = params.first().copied().unwrap_or(0);
            return tilde_key(num, modifier, paste);
        }
        _ => return None, // unknown final byte: drop the sequence
    };
    Some(Event::Key(apply_modifier(Key::new(code), modifier)))
}

/// xterm `CSI <n> ~` table
fn tilde_key(num: u16, modifier: u16, paste: &mut Option<Vec<u8>>) -> Option<Event> {
    let code = match num {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::F((num - 10) as u8),
        17..=21 => KeyCode::F((num - 11) as u8),
        23 | 24 => KeyCode::F((num - 12) as u8),
        200 => {
            *paste = Some(Vec::new());
            return None;
        }
        201 => return None, // stray paste terminator
        _ => return None,
    };
    Some(Event::Key(apply_modifier(Key::new(code), modifier)))
}

fn parse_mouse_sgr(raw: &[u8], press: bool) -> Option<MouseEvent> {
    let params = parse_params(raw);
    if params.len() != 3 {
        return None;
    }
    let (b, col, row) = (params[0], params[1], params[2]);

    let kind = if b & 0x40 != 0 {
        if b & 0x1 != 0 {
            MouseKind::ScrollDown
        } else {
            MouseKind::ScrollUp
        }
    } else if press {
        MouseKind::Press
    } else {
        MouseKind::Release
    };

    let button = if b & 0x40 != 0 {
        MouseButton::None
    } else {
        match b & 0x3 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    };

    Some(MouseEvent {
        kind,
        button,
        col,
        row,
        shift: b & 4 != 0,
        alt: b & 8 != 0,
        ctrl: b & 16 != 0,
    })
}
