use super::*;
use crate::error::Error;

#[test]
fn test_empty_rope() {
    let r = Rope::new();
    assert!(r.is_empty());
    assert_eq!(r.len(), 0);
    assert_eq!(r.char_count(), 0);
    assert_eq!(r.line_count(), 1);
    assert_eq!(r.to_string(), "");
}

#[test]
fn test_insert_basic() {
    let mut r = Rope::new();
    r.insert(0, "Hello").unwrap();
    assert_eq!(r.to_string(), "Hello");
    assert_eq!(r.len(), 5);

    r.insert(5, " World").unwrap();
    assert_eq!(r.to_string(), "Hello World");

    r.insert(0, "Start ").unwrap();
    assert_eq!(r.to_string(), "Start Hello World");
    r.assert_invariants();
}

#[test]
fn test_insert_middle() {
    let mut r = Rope::from_str("AC");
    r.insert(1, "B").unwrap();
    assert_eq!(r.to_string(), "ABC");
}

#[test]
fn test_insert_past_end_fails() {
    let mut r = Rope::from_str("abc");
    let err = r.insert(4, "x").unwrap_err();
    assert!(matches!(err, Error::InvalidBoundary { pos: 4 }));
    assert_eq!(r.to_string(), "abc");
}

#[test]
fn test_utf8_boundary_safety() {
    // "é" is C3 A9: byte 1 is mid-scalar
    let mut r = Rope::from_str("é");
    assert!(matches!(
        r.insert(1, "x"),
        Err(Error::InvalidBoundary { pos: 1 })
    ));
    assert_eq!(r.to_string(), "é");

    r.insert(0, "x").unwrap();
    assert_eq!(r.to_string(), "xé");
    r.insert(3, "y").unwrap();
    assert_eq!(r.to_string(), "xéy");
}

#[test]
fn test_delete_basic() {
    let mut r = Rope::from_str("Hello World");
    r.delete(5, 11).unwrap();
    assert_eq!(r.to_string(), "Hello");
    r.delete(0, 2).unwrap();
    assert_eq!(r.to_string(), "llo");
}

#[test]
fn test_delete_clamps_end() {
    let mut r = Rope::from_str("abc");
    r.delete(1, 999).unwrap();
    assert_eq!(r.to_string(), "a");
}

#[test]
fn test_delete_mid_scalar_fails() {
    let mut r = Rope::from_str("aé");
    assert!(r.delete(2, 3).is_err());
    assert_eq!(r.to_string(), "aé");
}

#[test]
fn test_insert_delete_round_trip() {
    let before = "The quick brown fox\njumps over\nthe lazy dog";
    let mut r = Rope::from_str(before);
    r.insert(10, "très ").unwrap();
    r.delete(10, 10 + "très ".len()).unwrap();
    assert_eq!(r.to_string(), before);
    r.assert_invariants();
}

#[test]
fn test_slice() {
    let r = Rope::from_str("0123456789");
    assert_eq!(r.slice(3, 7).unwrap(), "3456");
    assert_eq!(r.slice(0, 10).unwrap(), "0123456789");
    assert_eq!(r.slice(5, 5).unwrap(), "");
    // end clamps
    assert_eq!(r.slice(8, 99).unwrap(), "89");
}

#[test]
fn test_line_metrics() {
    let r = Rope::from_str("Line 1\nLine 2\nLine 3");
    assert_eq!(r.line_count(), 3);
    assert_eq!(r.line_start_byte(0), 0);
    assert_eq!(r.line_start_byte(1), 7);
    assert_eq!(r.line_start_byte(2), 14);
    assert_eq!(r.line(0), "Line 1");
    assert_eq!(r.line(2), "Line 3");
    assert_eq!(r.byte_to_line(0), 0);
    assert_eq!(r.byte_to_line(6), 0);
    assert_eq!(r.byte_to_line(7), 1);
    assert_eq!(r.byte_to_line(14), 2);
}

#[test]
fn test_trailing_newline_makes_empty_line() {
    let r = Rope::from_str("a\n");
    assert_eq!(r.line_count(), 2);
    assert_eq!(r.line(1), "");
}

#[test]
fn test_char_byte_conversions() {
    // 1-, 2-, and 3-byte scalars
    let r = Rope::from_str("aé世b");
    assert_eq!(r.len(), 7);
    assert_eq!(r.char_count(), 4);
    assert_eq!(r.char_to_byte(0), 0);
    assert_eq!(r.char_to_byte(1), 1);
    assert_eq!(r.char_to_byte(2), 3);
    assert_eq!(r.char_to_byte(3), 6);
    assert_eq!(r.char_to_byte(4), 7);
    assert_eq!(r.byte_to_char(0), 0);
    assert_eq!(r.byte_to_char(1), 1);
    assert_eq!(r.byte_to_char(2), 1); // inside é
    assert_eq!(r.byte_to_char(3), 2);
    assert_eq!(r.byte_to_char(6), 3);
    assert_eq!(r.byte_to_char(7), 4);
}

#[test]
fn test_line_col_conversions() {
    let r = Rope::from_str("ab\n世界\nxyz");
    assert_eq!(r.line_col_to_byte(0, 0), 0);
    assert_eq!(r.line_col_to_byte(0, 2), 2); // clamped to content
    assert_eq!(r.line_col_to_byte(1, 0), 3);
    assert_eq!(r.line_col_to_byte(1, 1), 6);
    assert_eq!(r.line_col_to_byte(2, 3), r.len());

    assert_eq!(r.byte_to_line_col(0), (0, 0));
    assert_eq!(r.byte_to_line_col(6), (1, 1));
    assert_eq!(r.byte_to_line_col(10), (2, 0));
    assert_eq!(r.byte_to_line_col(r.len()), (2, 3));
}

#[test]
fn test_large_text_chunks_into_leaves() {
    let text = "x".repeat(10 * MAX_LEAF);
    let r = Rope::from_str(&text);
    assert_eq!(r.len(), text.len());
    assert_eq!(r.char_count(), text.len());
    r.assert_invariants();
    let collected: String = r.chunks().collect();
    assert_eq!(collected, text);
    for chunk in r.chunks() {
        assert!(chunk.len() <= MAX_LEAF);
    }
}

// Deterministic PRNG so failures reproduce
fn lcg(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    *state >> 33
}

#[test]
fn test_random_edits_keep_invariants() {
    let mut reference = String::from("seed text with\nseveral lines\nof content\n").repeat(50);
    let mut r = Rope::from_str(&reference);
    let mut state = 0x5eed;

    for i in 0..1000 {
        let pos = {
            let raw = lcg(&mut state) as usize % (reference.len() + 1);
            let mut p = raw;
            while !reference.is_char_boundary(p) {
                p -= 1;
            }
            p
        };
        if i % 3 == 0 && !reference.is_empty() {
            let mut end = (pos + 1 + lcg(&mut state) as usize % 8).min(reference.len());
            while !reference.is_char_boundary(end) {
                end += 1;
            }
            r.delete(pos, end).unwrap();
            reference.replace_range(pos..end, "");
        } else {
            let ins = ["a", "λ\n", "text block ", "\n"][lcg(&mut state) as usize % 4];
            r.insert(pos, ins).unwrap();
            reference.insert_str(pos, ins);
        }

        r.assert_invariants();
        assert_eq!(r.len(), reference.len());
        assert_eq!(r.char_count(), reference.chars().count());
        assert_eq!(
            r.line_count(),
            reference.bytes().filter(|b| *b == b'\n').count() + 1
        );
    }
    assert_eq!(r.to_string(), reference);
}

#[test]
fn test_megabyte_file_random_inserts_stay_balanced() {
    let text = "0123456789abcdef".repeat(65536); // 1 MiB ASCII
    let mut r = Rope::from_str(&text);
    let mut expected_len = text.len();
    let mut state = 42;

    for _ in 0..1000 {
        let pos = lcg(&mut state) as usize % (expected_len + 1);
        r.insert(pos, "Z").unwrap();
        expected_len += 1;
    }
    r.assert_invariants();
    assert_eq!(r.len(), expected_len);
    assert_eq!(r.char_count(), expected_len); // ASCII only: chars == bytes
}

#[test]
fn test_clone_shares_leaves() {
    let mut r = Rope::from_str(&"shared ".repeat(400));
    let snapshot = r.clone();
    let before = snapshot.to_string();

    r.insert(0, "mutated ").unwrap();
    r.delete(100, 150).unwrap();

    // The snapshot observes none of the later edits
    assert_eq!(snapshot.to_string(), before);
    snapshot.assert_invariants();
    r.assert_invariants();
}

#[test]
fn test_no_partial_mutation_on_failure() {
    let mut r = Rope::from_str("aé");
    let before = r.to_string();
    assert!(r.insert(2, "no").is_err());
    assert!(r.delete(2, 3).is_err());
    assert_eq!(r.to_string(), before);
}
