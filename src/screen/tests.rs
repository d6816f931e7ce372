use super::*;
use crate::color::{Color, Style};

#[test]
fn test_first_frame_fully_dirty() {
    let mut screen = Screen::new(80, 24);
    screen.compute_damage();
    assert_eq!(screen.dirty_rows().count(), 24);
}

#[test]
fn test_swap_clears_damage() {
    let mut screen = Screen::new(80, 24);
    screen.compute_damage();
    screen.swap();
    screen.compute_damage();
    assert_eq!(screen.dirty_rows().count(), 0);
}

#[test]
fn test_single_cell_change_dirties_one_row() {
    let mut screen = Screen::new(80, 24);
    screen.compute_damage();
    screen.swap();

    screen.set_cell(5, 10, Cell::new('x', Style::default()));
    screen.compute_damage();
    let dirty: Vec<usize> = screen.dirty_rows().collect();
    assert_eq!(dirty, vec![5]);
}

#[test]
fn test_identical_rewrite_is_clean() {
    let mut screen = Screen::new(10, 2);
    screen.write_text(0, 0, "same", Style::default(), 10);
    screen.compute_damage();
    screen.swap();

    screen.clear_back();
    screen.write_text(0, 0, "same", Style::default(), 10);
    screen.compute_damage();
    assert_eq!(screen.dirty_rows().count(), 0);
}

#[test]
fn test_style_change_alone_is_damage() {
    let mut screen = Screen::new(10, 1);
    screen.write_text(0, 0, "a", Style::default(), 10);
    screen.compute_damage();
    screen.swap();

    screen.clear_back();
    screen.write_text(0, 0, "a", Style::fg(Color::Indexed(1)), 10);
    screen.compute_damage();
    assert!(screen.is_dirty(0));
}

#[test]
fn test_resize_forces_full_damage() {
    let mut screen = Screen::new(80, 24);
    screen.compute_damage();
    screen.swap();

    screen.resize(100, 30);
    screen.compute_damage();
    assert_eq!(screen.dirty_rows().count(), 30);
    assert_eq!(screen.width(), 100);
    assert_eq!(screen.height(), 30);
}

#[test]
fn test_write_text_clips_at_max_col_and_edge() {
    let mut screen = Screen::new(10, 1);
    let end = screen.write_text(0, 7, "abcdef", Style::default(), 9);
    assert_eq!(end, 9);
    assert_eq!(screen.cell(0, 7).unwrap().ch, 'a');
    assert_eq!(screen.cell(0, 8).unwrap().ch, 'b');
    assert_eq!(screen.cell(0, 9).unwrap().ch, ' '); // beyond max_col

    // Off-screen row: silently ignored
    let end = screen.write_text(5, 0, "zzz", Style::default(), 10);
    assert_eq!(end, 0);
    assert!(screen.cell(5, 0).is_none());
}

#[test]
fn test_one_column_per_scalar() {
    let mut screen = Screen::new(10, 1);
    screen.write_text(0, 0, "a世b", Style::default(), 10);
    assert_eq!(screen.cell(0, 0).unwrap().ch, 'a');
    assert_eq!(screen.cell(0, 1).unwrap().ch, '世');
    assert_eq!(screen.cell(0, 2).unwrap().ch, 'b');
}

#[test]
fn test_control_chars_render_as_spaces() {
    let mut screen = Screen::new(10, 1);
    screen.write_text(0, 0, "a\u{7}b", Style::default(), 10);
    assert_eq!(screen.cell(0, 1).unwrap().ch, ' ');
}

#[test]
fn test_compose_determinism() {
    let compose = |screen: &mut Screen| {
        screen.clear_back();
        screen.write_text(0, 0, "status", Style::fg(Color::Indexed(2)), 20);
        screen.write_text(1, 2, "body", Style::default(), 20);
    };
    let mut a = Screen::new(20, 3);
    let mut b = Screen::new(20, 3);
    compose(&mut a);
    compose(&mut b);
    for row in 0..3 {
        assert_eq!(a.row(row), b.row(row));
    }
}
