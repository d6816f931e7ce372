//! Key representation for decoded input
//!
//! Keys come out of the byte decoder already normalized: control
//! bytes become `ctrl`-modified letters, `ESC <printable>` becomes an
//! `alt`-modified character, multi-byte UTF-8 arrives as one `Char`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Printable character (any Unicode scalar)
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// Function key F1..=F12
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
}

impl Key {
    pub fn new(code: KeyCode) -> Self {
        Key {
            code,
            ctrl: false,
            alt: false,
        }
    }

    pub fn char(c: char) -> Self {
        Key::new(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Key {
            code: KeyCode::Char(c),
            ctrl: true,
            alt: false,
        }
    }

    pub fn alt(c: char) -> Self {
        Key {
            code: KeyCode::Char(c),
            ctrl: false,
            alt: true,
        }
    }

    pub fn is(&self, code: KeyCode) -> bool {
        self.code == code && !self.ctrl && !self.alt
    }

    /// Short human-readable form for the pending-sequence hint
    pub fn describe(&self) -> String {
        let mut out = String::new();
        if self.ctrl {
            out.push_str("C-");
        }
        if self.alt {
            out.push_str("M-");
        }
        match self.code {
            KeyCode::Char(' ') => out.push_str("SPC"),
            KeyCode::Char(c) => out.push(c),
            KeyCode::Enter => out.push_str("RET"),
            KeyCode::Tab => out.push_str("TAB"),
            KeyCode::Backspace => out.push_str("BS"),
            KeyCode::Escape => out.push_str("ESC"),
            KeyCode::Up => out.push_str("Up"),
            KeyCode::Down => out.push_str("Down"),
            KeyCode::Left => out.push_str("Left"),
            KeyCode::Right => out.push_str("Right"),
            KeyCode::Home => out.push_str("Home"),
            KeyCode::End => out.push_str("End"),
            KeyCode::PageUp => out.push_str("PgUp"),
            KeyCode::PageDown => out.push_str("PgDn"),
            KeyCode::Insert => out.push_str("Ins"),
            KeyCode::Delete => out.push_str("Del"),
            KeyCode::F(n) => out.push_str(&format!("F{n}")),
        }
        out
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Key::new(code)
    }
}
