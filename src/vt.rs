//! Buffered VT100/xterm escape writer
//!
//! The single producer of bytes to the terminal. Tracks the current
//! SGR state so attribute and color escapes are emitted only when they
//! change within a row; every rendered row starts from a clean reset.

use std::io::{BufWriter, Write};

use crate::color::{Attrs, Color, Style};
use crate::screen::Cell;

/// Output buffer size
pub const BUFFER_CAPACITY: usize = 64 * 1024;

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
pub const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";
pub const RESET_ATTRIBUTES: &str = "\x1b[0m";
pub const ENABLE_MOUSE: &str = "\x1b[?1000h\x1b[?1006h";
pub const DISABLE_MOUSE: &str = "\x1b[?1006l\x1b[?1000l";
pub const ENABLE_BRACKETED_PASTE: &str = "\x1b[?2004h";
pub const DISABLE_BRACKETED_PASTE: &str = "\x1b[?2004l";

pub struct VtWriter<W: Write> {
    out: BufWriter<W>,
    fg: Color,
    bg: Color,
    attrs: Attrs,
}

impl<W: Write> VtWriter<W> {
    pub fn new(sink: W) -> Self {
        VtWriter {
            out: BufWriter::with_capacity(BUFFER_CAPACITY, sink),
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::NONE,
        }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    /// Recover the sink (tests)
    pub fn into_inner(self) -> std::io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }

    pub fn enter_alt_screen(&mut self) -> std::io::Result<()> {
        self.out.write_all(ENTER_ALT_SCREEN.as_bytes())
    }

    pub fn leave_alt_screen(&mut self) -> std::io::Result<()> {
        self.out.write_all(LEAVE_ALT_SCREEN.as_bytes())
    }

    pub fn clear_screen(&mut self) -> std::io::Result<()> {
        self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        self.out.write_all(CURSOR_HOME.as_bytes())
    }

    pub fn hide_cursor(&mut self) -> std::io::Result<()> {
        self.out.write_all(HIDE_CURSOR.as_bytes())
    }

    pub fn show_cursor(&mut self) -> std::io::Result<()> {
        self.out.write_all(SHOW_CURSOR.as_bytes())
    }

    pub fn enable_mouse(&mut self) -> std::io::Result<()> {
        self.out.write_all(ENABLE_MOUSE.as_bytes())?;
        self.out.write_all(ENABLE_BRACKETED_PASTE.as_bytes())
    }

    pub fn disable_mouse(&mut self) -> std::io::Result<()> {
        self.out.write_all(DISABLE_BRACKETED_PASTE.as_bytes())?;
        self.out.write_all(DISABLE_MOUSE.as_bytes())
    }

    /// Move the cursor; `row`/`col` are 0-indexed here, emitted
    /// 1-indexed on the wire
    pub fn goto(&mut self, row: usize, col: usize) -> std::io::Result<()> {
        write!(self.out, "\x1b[{};{}H", row + 1, col + 1)
    }

    /// Reset SGR state; the start of every rendered row
    pub fn begin_row(&mut self) -> std::io::Result<()> {
        self.out.write_all(RESET_ATTRIBUTES.as_bytes())?;
        self.fg = Color::Default;
        self.bg = Color::Default;
        self.attrs = Attrs::NONE;
        Ok(())
    }

    /// Emit the minimal SGR delta from the tracked state to `style`
    pub fn set_style(&mut self, style: Style) -> std::io::Result<()> {
        let mut params: Vec<String> = Vec::new();

        // An attribute can only be cleared by a full reset, so any
        // turned-off flag forces reset + re-emit of everything active.
        let turning_off = (self.attrs.bold && !style.attrs.bold)
            || (self.attrs.dim && !style.attrs.dim)
            || (self.attrs.italic && !style.attrs.italic)
            || (self.attrs.underline && !style.attrs.underline)
            || (self.attrs.reverse && !style.attrs.reverse);

        if turning_off {
            params.push("0".to_string());
            push_attr_params(&mut params, Attrs::NONE, style.attrs);
            push_color_params(&mut params, Color::Default, style.fg, false);
            push_color_params(&mut params, Color::Default, style.bg, true);
        } else {
            push_attr_params(&mut params, self.attrs, style.attrs);
            push_color_params(&mut params, self.fg, style.fg, false);
            push_color_params(&mut params, self.bg, style.bg, true);
        }

        if !params.is_empty() {
            write!(self.out, "\x1b[{}m", params.join(";"))?;
        }
        self.fg = style.fg;
        self.bg = style.bg;
        self.attrs = style.attrs;
        Ok(())
    }

    /// Emit one cell's glyph as UTF-8; control scalars become spaces
    pub fn put(&mut self, ch: char) -> std::io::Result<()> {
        let mut buf = [0u8; 4];
        let encoded = if ch.is_control() {
            " "
        } else {
            ch.encode_utf8(&mut buf)
        };
        self.out.write_all(encoded.as_bytes())
    }

    /// Render a full row of cells at `row`: goto, reset, then glyphs
    /// with delta styling
    pub fn render_row(&mut self, row: usize, cells: &[Cell]) -> std::io::Result<()> {
        self.goto(row, 0)?;
        self.begin_row()?;
        for cell in cells {
            self.set_style(cell.style())?;
            self.put(cell.ch)?;
        }
        Ok(())
    }
}

fn push_attr_params(params: &mut Vec<String>, from: Attrs, to: Attrs) {
    if to.bold && !from.bold {
        params.push("1".to_string());
    }
    if to.dim && !from.dim {
        params.push("2".to_string());
    }
    if to.italic && !from.italic {
        params.push("3".to_string());
    }
    if to.underline && !from.underline {
        params.push("4".to_string());
    }
    if to.reverse && !from.reverse {
        params.push("7".to_string());
    }
}

fn push_color_params(params: &mut Vec<String>, from: Color, to: Color, background: bool) {
    if from == to {
        return;
    }
    match (to, background) {
        (Color::Default, false) => params.push("39".to_string()),
        (Color::Default, true) => params.push("49".to_string()),
        (Color::Indexed(i), false) => {
            let code = if i < 8 { 30 + i as u16 } else { 82 + i as u16 };
            params.push(code.to_string());
        }
        (Color::Indexed(i), true) => {
            let code = if i < 8 { 40 + i as u16 } else { 92 + i as u16 };
            params.push(code.to_string());
        }
        (Color::Rgb(r, g, b), false) => params.push(format!("38;2;{r};{g};{b}")),
        (Color::Rgb(r, g, b), true) => params.push(format!("48;2;{r};{g};{b}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Style;
    use crate::screen::Cell;

    fn drain(vt: VtWriter<Vec<u8>>) -> String {
        String::from_utf8(vt.into_inner().expect("flushed sink")).expect("utf8 output")
    }

    #[test]
    fn test_goto_is_one_indexed_on_the_wire() {
        let mut vt = VtWriter::new(Vec::new());
        vt.goto(5, 0).unwrap();
        assert_eq!(drain(vt), "\x1b[6;1H");
    }

    #[test]
    fn test_standard_color_codes() {
        let mut vt = VtWriter::new(Vec::new());
        vt.set_style(Style::fg(Color::Indexed(1))).unwrap();
        vt.set_style(Style {
            fg: Color::Indexed(9),
            bg: Color::Indexed(2),
            attrs: Attrs::NONE,
        })
        .unwrap();
        // 30+1=31; bright 82+9=91; bg 40+2=42
        assert_eq!(drain(vt), "\x1b[31m\x1b[91;42m");
    }

    #[test]
    fn test_bright_background_code() {
        let mut vt = VtWriter::new(Vec::new());
        vt.set_style(Style {
            fg: Color::Default,
            bg: Color::Indexed(12),
            attrs: Attrs::NONE,
        })
        .unwrap();
        // 92+12=104
        assert_eq!(drain(vt), "\x1b[104m");
    }

    #[test]
    fn test_rgb_colors() {
        let mut vt = VtWriter::new(Vec::new());
        vt.set_style(Style {
            fg: Color::Rgb(1, 2, 3),
            bg: Color::Rgb(4, 5, 6),
            attrs: Attrs::NONE,
        })
        .unwrap();
        assert_eq!(drain(vt), "\x1b[38;2;1;2;3;48;2;4;5;6m");
    }

    #[test]
    fn test_default_colors_emit_39_49() {
        let mut vt = VtWriter::new(Vec::new());
        vt.set_style(Style {
            fg: Color::Indexed(1),
            bg: Color::Indexed(2),
            attrs: Attrs::NONE,
        })
        .unwrap();
        vt.set_style(Style::default()).unwrap();
        assert_eq!(drain(vt), "\x1b[31;42m\x1b[39;49m");
    }

    #[test]
    fn test_unchanged_style_emits_nothing() {
        let mut vt = VtWriter::new(Vec::new());
        let style = Style::fg(Color::Indexed(3));
        vt.set_style(style).unwrap();
        vt.set_style(style).unwrap();
        assert_eq!(drain(vt), "\x1b[33m");
    }

    #[test]
    fn test_attr_removal_resets_then_reapplies() {
        let mut vt = VtWriter::new(Vec::new());
        vt.set_style(Style {
            fg: Color::Indexed(1),
            bg: Color::Default,
            attrs: Attrs {
                bold: true,
                underline: true,
                ..Attrs::NONE
            },
        })
        .unwrap();
        vt.set_style(Style {
            fg: Color::Indexed(1),
            bg: Color::Default,
            attrs: Attrs::bold(),
        })
        .unwrap();
        let out = drain(vt);
        assert_eq!(out, "\x1b[1;4;31m\x1b[0;1;31m");
    }

    #[test]
    fn test_row_starts_with_reset_and_goto() {
        let mut vt = VtWriter::new(Vec::new());
        let cells = vec![Cell::new('h', Style::default()); 2];
        vt.render_row(5, &cells).unwrap();
        let out = drain(vt);
        assert!(out.starts_with("\x1b[6;1H\x1b[0m"));
        assert!(out.ends_with("hh"));
    }

    #[test]
    fn test_utf8_glyphs_and_control_fallback() {
        let mut vt = VtWriter::new(Vec::new());
        vt.put('世').unwrap();
        vt.put('\u{1}').unwrap();
        assert_eq!(drain(vt), "世 ");
    }

    #[test]
    fn test_alt_screen_sequences() {
        let mut vt = VtWriter::new(Vec::new());
        vt.enter_alt_screen().unwrap();
        vt.leave_alt_screen().unwrap();
        assert_eq!(drain(vt), "\x1b[?1049h\x1b[?1049l");
    }
}
