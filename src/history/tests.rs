use super::*;
use crate::rope::Rope;

fn rope(s: &str) -> Rope {
    Rope::from_str(s)
}

#[test]
fn test_commit_moves_current() {
    let mut tree = UndoTree::new(rope("abc"));
    tree.commit(rope("abcd"), "insert");
    assert_eq!(tree.snapshot().to_string(), "abcd");
    assert!(tree.can_undo());
    assert!(!tree.can_redo());
}

#[test]
fn test_undo_redo_round_trip() {
    let mut tree = UndoTree::new(rope("abc"));
    tree.commit(rope("abcd"), "insert");

    let restored = tree.undo().unwrap().to_string();
    assert_eq!(restored, "abc");

    let redone = tree.redo().unwrap().to_string();
    assert_eq!(redone, "abcd");
}

#[test]
fn test_undo_at_root_fails() {
    let mut tree = UndoTree::new(rope("abc"));
    assert!(matches!(tree.undo(), Err(crate::error::Error::AtRoot)));
}

#[test]
fn test_redo_without_children_fails() {
    let mut tree = UndoTree::new(rope("abc"));
    assert!(matches!(tree.redo(), Err(crate::error::Error::NoRedo)));
}

#[test]
fn test_branch_preservation() {
    // Insert "X", undo, insert "Y": both futures must survive
    let mut tree = UndoTree::new(rope("abc"));
    let x = tree.commit(rope("abcX"), "insert X");
    tree.undo().unwrap();
    tree.commit(rope("abcY"), "insert Y");
    tree.undo().unwrap();

    assert_eq!(tree.branch_count(), 2);
    let branches = tree.list_branches();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0].label, "insert X");
    assert_eq!(branches[1].label, "insert Y");

    let restored = tree.switch_to_branch(x).unwrap().to_string();
    assert_eq!(restored, "abcX");
}

#[test]
fn test_redo_follows_most_recent_branch() {
    let mut tree = UndoTree::new(rope("base"));
    tree.commit(rope("one"), "one");
    tree.undo().unwrap();
    tree.commit(rope("two"), "two");
    tree.undo().unwrap();

    // Last committed branch is the most recently visited
    assert_eq!(tree.redo().unwrap().to_string(), "two");
}

#[test]
fn test_redo_follows_explicit_switch() {
    let mut tree = UndoTree::new(rope("base"));
    let first = tree.commit(rope("one"), "one");
    tree.undo().unwrap();
    tree.commit(rope("two"), "two");
    tree.undo().unwrap();

    tree.switch_to_branch(first).unwrap();
    tree.undo().unwrap();
    assert_eq!(tree.redo().unwrap().to_string(), "one");
}

#[test]
fn test_branch_cap_evicts_oldest() {
    let mut tree = UndoTree::new(rope("base"));
    let mut labels = Vec::new();
    for i in 0..MAX_BRANCHES {
        let label = format!("edit {i}");
        tree.commit(rope(&format!("text {i}")), label.clone());
        labels.push(label);
        tree.undo().unwrap();
    }
    assert_eq!(tree.branch_count(), MAX_BRANCHES);

    // One more commit: exactly K siblings remain, oldest gone
    tree.commit(rope("text new"), "edit new");
    tree.undo().unwrap();
    assert_eq!(tree.branch_count(), MAX_BRANCHES);

    let remaining: Vec<String> = tree.list_branches().into_iter().map(|b| b.label).collect();
    assert!(!remaining.contains(&"edit 0".to_string()));
    assert!(remaining.contains(&"edit 1".to_string()));
    assert_eq!(remaining.last().unwrap(), "edit new");
}

#[test]
fn test_eviction_drops_descendants() {
    let mut tree = UndoTree::new(rope("base"));

    // Build a deep subtree under the first child
    tree.commit(rope("a"), "a");
    tree.commit(rope("a1"), "a1");
    tree.commit(rope("a2"), "a2");
    tree.undo().unwrap();
    tree.undo().unwrap();
    tree.undo().unwrap();
    let with_subtree = tree.len();

    for i in 0..MAX_BRANCHES {
        tree.commit(rope(&format!("b{i}")), format!("b{i}"));
        tree.undo().unwrap();
    }

    // "a" and its two descendants were evicted together
    assert!(tree.len() < with_subtree + MAX_BRANCHES);
    assert_eq!(tree.branch_count(), MAX_BRANCHES);
}

#[test]
fn test_invalid_branch_switch_fails() {
    let mut tree = UndoTree::new(rope("base"));
    tree.commit(rope("child"), "child");
    // current is the child; the root index is not one of its children
    assert!(tree.switch_to_branch(0).is_err());
}

#[test]
fn test_limit_depth_prunes_root_chain() {
    let mut tree = UndoTree::new(rope("0"));
    for i in 1..=20 {
        tree.commit(rope(&i.to_string()), format!("edit {i}"));
    }
    assert_eq!(tree.depth(), 20);

    tree.limit_depth(5);
    assert_eq!(tree.depth(), 5);
    // Current snapshot unaffected
    assert_eq!(tree.snapshot().to_string(), "20");
    // Can still undo down to the new root
    for _ in 0..5 {
        tree.undo().unwrap();
    }
    assert!(matches!(tree.undo(), Err(crate::error::Error::AtRoot)));
}

#[test]
fn test_snapshots_are_independent_of_later_edits() {
    let mut current = rope("hello world");
    let mut tree = UndoTree::new(current.clone());

    current.insert(5, ", dear").unwrap();
    tree.commit(current.clone(), "insert");

    current.delete(0, 5).unwrap();
    tree.commit(current.clone(), "delete");

    assert_eq!(tree.undo().unwrap().to_string(), "hello, dear world");
    assert_eq!(tree.undo().unwrap().to_string(), "hello world");
}
