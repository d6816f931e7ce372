//! Status line and gutter formatting
//!
//! The gutter width is computed in exactly one place and the label
//! formatter takes that width as its argument, so layout and text can
//! never disagree about how wide the gutter is.

use crate::constants::ui;
use crate::mode::Mode;
use crate::selection::Position;

/// Gutter width for a buffer whose last line number (1-based) is
/// `last_line`: the digit count plus one column of padding. Zero when
/// line numbers are off.
pub fn gutter_width(last_line: usize, line_numbers: bool) -> usize {
    if !line_numbers {
        return 0;
    }
    let mut digits = 1;
    let mut n = last_line;
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits + ui::GUTTER_PAD
}

/// Right-aligned gutter label for `line` (0-indexed), using the same
/// `width` that `gutter_width` returned. Relative numbering shows the
/// distance from the cursor line, with the absolute number on the
/// cursor line itself.
pub fn gutter_label(line: usize, cursor_line: usize, relative: bool, width: usize) -> String {
    let number = if relative && line != cursor_line {
        line.abs_diff(cursor_line)
    } else {
        line + 1
    };
    format!("{:>w$} ", number, w = width.saturating_sub(ui::GUTTER_PAD))
}

/// Left and right segments of the status line
pub fn status_text(
    mode: Mode,
    name: &str,
    modified: bool,
    primary: Position,
    total_lines: usize,
    selection_count: usize,
    pending_hint: &str,
) -> (String, String) {
    let mut left = format!(" {} | {}", mode.name(), name);
    if modified {
        left.push_str(" [+]");
    }
    let mut right = String::new();
    if !pending_hint.is_empty() {
        right.push_str(pending_hint);
        right.push_str(" | ");
    }
    if selection_count > 1 {
        right.push_str(&format!("{selection_count} sel | "));
    }
    right.push_str(&format!(
        "{}:{} / {} ",
        primary.line + 1,
        primary.col + 1,
        total_lines
    ));
    (left, right)
}
