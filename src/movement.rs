//! Cursor motions over a rope
//!
//! Motions are pure functions from a position (plus the rope) to a new
//! position; the caller decides whether the anchor follows (movement)
//! or stays (extension). Columns are clamped to line content, so a
//! motion can never produce an unaddressable position.

use crate::rope::Rope;
use crate::selection::Position;

/// Character categories for word movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Word,
    Symbol,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Symbol
    }
}

fn clamp_col(rope: &Rope, line: usize, col: usize) -> usize {
    col.min(rope.line_len_chars(line))
}

pub fn left(rope: &Rope, pos: Position) -> Position {
    let col = clamp_col(rope, pos.line, pos.col);
    if col > 0 {
        Position::new(pos.line, col - 1)
    } else if pos.line > 0 {
        Position::new(pos.line - 1, rope.line_len_chars(pos.line - 1))
    } else {
        pos
    }
}

pub fn right(rope: &Rope, pos: Position) -> Position {
    let len = rope.line_len_chars(pos.line);
    if pos.col < len {
        Position::new(pos.line, pos.col + 1)
    } else if pos.line + 1 < rope.line_count() {
        Position::new(pos.line + 1, 0)
    } else {
        Position::new(pos.line, len)
    }
}

pub fn up(rope: &Rope, pos: Position) -> Position {
    if pos.line == 0 {
        return pos;
    }
    Position::new(pos.line - 1, clamp_col(rope, pos.line - 1, pos.col))
}

pub fn down(rope: &Rope, pos: Position) -> Position {
    if pos.line + 1 >= rope.line_count() {
        return pos;
    }
    Position::new(pos.line + 1, clamp_col(rope, pos.line + 1, pos.col))
}

pub fn line_start(_rope: &Rope, pos: Position) -> Position {
    Position::new(pos.line, 0)
}

pub fn line_end(rope: &Rope, pos: Position) -> Position {
    Position::new(pos.line, rope.line_len_chars(pos.line))
}

pub fn buffer_start(_rope: &Rope, _pos: Position) -> Position {
    Position::new(0, 0)
}

pub fn buffer_end(rope: &Rope, _pos: Position) -> Position {
    let last = rope.line_count() - 1;
    Position::new(last, rope.line_len_chars(last))
}

pub fn page_up(rope: &Rope, pos: Position, page: usize) -> Position {
    let line = pos.line.saturating_sub(page.max(1));
    Position::new(line, clamp_col(rope, line, pos.col))
}

pub fn page_down(rope: &Rope, pos: Position, page: usize) -> Position {
    let line = (pos.line + page.max(1)).min(rope.line_count() - 1);
    Position::new(line, clamp_col(rope, line, pos.col))
}

/// Start of the next word (vim `w`)
pub fn word_forward(rope: &Rope, pos: Position) -> Position {
    let mut byte = rope.line_col_to_byte(pos.line, pos.col);
    let text = rope.to_string();
    let mut chars = text[byte..].chars();

    let first = match chars.next() {
        Some(c) => c,
        None => return pos,
    };
    byte += first.len_utf8();
    let start_class = classify(first);

    // Skip the rest of the current run, then any whitespace
    let mut in_run = start_class != CharClass::Whitespace;
    for c in chars {
        let class = classify(c);
        if in_run {
            if class == start_class {
                byte += c.len_utf8();
                continue;
            }
            in_run = false;
        }
        if class == CharClass::Whitespace {
            byte += c.len_utf8();
        } else {
            break;
        }
    }
    to_position(rope, byte)
}

/// Start of the previous word (vim `b`)
pub fn word_backward(rope: &Rope, pos: Position) -> Position {
    let byte = rope.line_col_to_byte(pos.line, pos.col);
    let text = rope.to_string();
    let mut iter = text[..byte].char_indices().rev().peekable();

    // Skip whitespace immediately behind the cursor
    while let Some(&(_, c)) = iter.peek() {
        if classify(c) == CharClass::Whitespace {
            iter.next();
        } else {
            break;
        }
    }
    let (mut start, class) = match iter.peek() {
        Some(&(i, c)) => (i, classify(c)),
        None => return Position::new(0, 0),
    };
    // Walk back through the run
    for (i, c) in iter {
        if classify(c) == class {
            start = i;
        } else {
            break;
        }
    }
    to_position(rope, start)
}

/// End of the current or next word (vim `e`)
pub fn word_end(rope: &Rope, pos: Position) -> Position {
    let byte = rope.line_col_to_byte(pos.line, pos.col);
    let text = rope.to_string();
    let mut iter = text[byte..].char_indices().skip(1).peekable();

    // Skip whitespace (and the single char we started on)
    while let Some(&(_, c)) = iter.peek() {
        if classify(c) == CharClass::Whitespace {
            iter.next();
        } else {
            break;
        }
    }
    let (first_off, first) = match iter.next() {
        Some(pair) => pair,
        None => return pos,
    };
    let class = classify(first);
    let mut end = byte + first_off;
    for (off, c) in iter {
        if classify(c) == class {
            end = byte + off;
        } else {
            break;
        }
    }
    to_position(rope, end)
}

fn to_position(rope: &Rope, byte: usize) -> Position {
    let (line, col) = rope.byte_to_line_col(byte);
    Position::new(line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rope(s: &str) -> Rope {
        Rope::from_str(s)
    }

    #[test]
    fn test_left_right_wrap_lines() {
        let r = rope("ab\ncd");
        assert_eq!(right(&r, Position::new(0, 2)), Position::new(1, 0));
        assert_eq!(left(&r, Position::new(1, 0)), Position::new(0, 2));
        assert_eq!(left(&r, Position::new(0, 0)), Position::new(0, 0));
        assert_eq!(right(&r, Position::new(1, 2)), Position::new(1, 2));
    }

    #[test]
    fn test_vertical_clamps_column() {
        let r = rope("long line here\nab\nanother long one");
        assert_eq!(down(&r, Position::new(0, 10)), Position::new(1, 2));
        assert_eq!(up(&r, Position::new(2, 10)), Position::new(1, 2));
    }

    #[test]
    fn test_line_and_buffer_bounds() {
        let r = rope("hello\nworld");
        assert_eq!(line_end(&r, Position::new(0, 0)), Position::new(0, 5));
        assert_eq!(line_start(&r, Position::new(0, 4)), Position::new(0, 0));
        assert_eq!(buffer_end(&r, Position::new(0, 0)), Position::new(1, 5));
        assert_eq!(buffer_start(&r, Position::new(1, 3)), Position::new(0, 0));
    }

    #[test]
    fn test_word_forward() {
        let r = rope("foo bar_baz  qux");
        assert_eq!(word_forward(&r, Position::new(0, 0)), Position::new(0, 4));
        assert_eq!(word_forward(&r, Position::new(0, 4)), Position::new(0, 13));
    }

    #[test]
    fn test_word_forward_treats_symbols_as_runs() {
        let r = rope("a == b");
        assert_eq!(word_forward(&r, Position::new(0, 0)), Position::new(0, 2));
        assert_eq!(word_forward(&r, Position::new(0, 2)), Position::new(0, 5));
    }

    #[test]
    fn test_word_backward() {
        let r = rope("foo bar baz");
        assert_eq!(word_backward(&r, Position::new(0, 10)), Position::new(0, 8));
        assert_eq!(word_backward(&r, Position::new(0, 8)), Position::new(0, 4));
        assert_eq!(word_backward(&r, Position::new(0, 1)), Position::new(0, 0));
    }

    #[test]
    fn test_word_end() {
        let r = rope("foo bar");
        assert_eq!(word_end(&r, Position::new(0, 0)), Position::new(0, 2));
        assert_eq!(word_end(&r, Position::new(0, 2)), Position::new(0, 6));
    }

    #[test]
    fn test_word_motions_cross_lines() {
        let r = rope("one\ntwo");
        assert_eq!(word_forward(&r, Position::new(0, 0)), Position::new(1, 0));
        assert_eq!(word_backward(&r, Position::new(1, 0)), Position::new(0, 0));
    }
}
