//! Color and style types shared by the compositor and the VT writer

/// Terminal color
///
/// `Indexed` covers the 16 standard colors (0-7 normal, 8-15 bright).
/// RGB colors assume a truecolor-capable terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// The terminal's configured default
    #[default]
    Default,
    /// Standard palette index 0..=15
    Indexed(u8),
    /// 24-bit color
    Rgb(u8, u8, u8),
}

pub const BLACK: Color = Color::Indexed(0);
pub const RED: Color = Color::Indexed(1);
pub const GREEN: Color = Color::Indexed(2);
pub const YELLOW: Color = Color::Indexed(3);
pub const BLUE: Color = Color::Indexed(4);
pub const MAGENTA: Color = Color::Indexed(5);
pub const CYAN: Color = Color::Indexed(6);
pub const WHITE: Color = Color::Indexed(7);
pub const BRIGHT_BLACK: Color = Color::Indexed(8);

/// Cell attribute flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attrs {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Attrs {
    pub const NONE: Attrs = Attrs {
        bold: false,
        dim: false,
        italic: false,
        underline: false,
        reverse: false,
    };

    pub fn bold() -> Self {
        Attrs {
            bold: true,
            ..Attrs::NONE
        }
    }

    pub fn reverse() -> Self {
        Attrs {
            reverse: true,
            ..Attrs::NONE
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Attrs::NONE
    }
}

/// A fg/bg/attrs triple applied to a span of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    pub fn fg(fg: Color) -> Self {
        Style {
            fg,
            ..Style::default()
        }
    }
}

/// Colors for the chrome around the buffer text
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub status_fg: Color,
    pub status_bg: Color,
    pub gutter_fg: Color,
    pub current_line_bg: Color,
    pub selection_bg: Color,
    pub info_fg: Color,
    pub warning_fg: Color,
    pub error_fg: Color,
    pub success_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            name: "dark",
            status_fg: BLACK,
            status_bg: WHITE,
            gutter_fg: BRIGHT_BLACK,
            current_line_bg: Color::Rgb(40, 40, 40),
            selection_bg: Color::Rgb(60, 60, 90),
            info_fg: CYAN,
            warning_fg: YELLOW,
            error_fg: RED,
            success_fg: GREEN,
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            status_fg: WHITE,
            status_bg: BLACK,
            gutter_fg: BRIGHT_BLACK,
            current_line_bg: Color::Rgb(230, 230, 230),
            selection_bg: Color::Rgb(200, 200, 240),
            info_fg: BLUE,
            warning_fg: YELLOW,
            error_fg: RED,
            success_fg: GREEN,
        }
    }

    /// Resolve a configured theme name, falling back to dark
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Theme::light(),
            _ => Theme::dark(),
        }
    }
}
