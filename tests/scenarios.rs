//! Literal scenarios from spec.md §8's concrete-scenarios table.

use core_diff::{diff, AlgoKind, Config, DiffResult};
use core_diff::ChunkKind::{self, Delete, Equal, Insert};

fn kinds(result: &DiffResult) -> Vec<ChunkKind> {
    result.chunks().iter().map(|c| c.kind()).collect()
}

fn counts(result: &DiffResult) -> Vec<(ChunkKind, usize, usize)> {
    result
        .chunks()
        .iter()
        .map(|c| {
            let l = c.left().map(|s| s.count).unwrap_or(0);
            let r = c.right().map(|s| s.count).unwrap_or(0);
            (c.kind(), l, r)
        })
        .collect()
}

#[test]
fn scenario_1_identical_buffers() {
    let result = diff(&Config::default(), b"A\nB\nC\n", b"A\nB\nC\n").unwrap();
    assert_eq!(kinds(&result), vec![Equal]);
    assert!(result.reconstructs());
}

#[test]
fn scenario_2_single_line_substitution() {
    let result = diff(&Config::default(), b"A\nB\nC\n", b"A\nX\nC\n").unwrap();
    assert_eq!(kinds(&result), vec![Equal, Delete, Insert, Equal]);
    assert!(result.reconstructs());
}

#[test]
fn scenario_3_pure_insertion_from_empty() {
    let result = diff(&Config::default(), b"", b"A\nB\n").unwrap();
    assert_eq!(counts(&result), vec![(Insert, 0, 2)]);
    assert!(result.reconstructs());
}

#[test]
fn scenario_4_mixed_edit_with_shared_middle() {
    let left = b"A\nB\nC\nD\nE\n";
    let right = b"X\nB\nC\nY\n";
    let result = diff(&Config::default(), left, right).unwrap();
    assert_eq!(
        counts(&result),
        vec![
            (Delete, 1, 0),
            (Insert, 0, 1),
            (Equal, 2, 2),
            (Delete, 2, 0),
            (Insert, 0, 1),
        ]
    );
    assert!(result.reconstructs());
}

#[test]
fn scenario_5_crlf_forms_a_distinct_atom() {
    let left = b"foo\nbar\nbaz\n";
    let right = b"foo\nbar\r\nbaz\n";
    let result = diff(&Config::default(), left, right).unwrap();
    assert_eq!(kinds(&result), vec![Equal, Delete, Insert, Equal]);
    assert!(result.reconstructs());

    let deleted = result
        .chunks()
        .iter()
        .find(|c| c.kind() == Delete)
        .and_then(|c| c.left())
        .unwrap();
    assert_eq!(result.left_atom(deleted.start).bytes(result.left_bytes()), b"bar\n");
    let inserted = result
        .chunks()
        .iter()
        .find(|c| c.kind() == Insert)
        .and_then(|c| c.right())
        .unwrap();
    assert_eq!(result.right_atom(inserted.start).bytes(result.right_bytes()), b"bar\r\n");
}

#[test]
fn scenario_6_large_input_forces_divide_path() {
    // One `y` at position 5000 among 10000 `x` lines, against the
    // original divider's always-linear-space safety net: force it by
    // configuring a zero-budget MyersFull so the root algorithm cannot
    // even attempt the quadratic trace and must fall through to
    // Patience (unique anchor at the changed line) or MyersDivide.
    let mut left = String::new();
    let mut right = String::new();
    for i in 0..10_000 {
        if i == 5000 {
            left.push_str("y\n");
        } else {
            left.push_str("x\n");
            right.push_str("x\n");
        }
    }

    let mut config = Config::default();
    config.graph.get_mut(AlgoKind::MyersFull).permitted_state_size = 1;
    let result = diff(&config, left.as_bytes(), right.as_bytes()).unwrap();
    assert!(result.reconstructs());

    let total_equal: usize = result
        .chunks()
        .iter()
        .filter(|c| c.kind() == Equal)
        .map(|c| c.left().unwrap().count)
        .sum();
    assert_eq!(total_equal, 9999);
    let total_delete: usize = result
        .chunks()
        .iter()
        .filter(|c| c.kind() == Delete)
        .map(|c| c.left().unwrap().count)
        .sum();
    assert_eq!(total_delete, 1);
    assert!(result.chunks().iter().all(|c| c.kind() != Insert));
}

#[test]
fn fallback_preservation_myers_divide_alone() {
    let left = b"A\nB\nC\nD\nE\n";
    let right = b"X\nB\nC\nY\n";
    let mut config = Config::default();
    config.root_algo = AlgoKind::MyersDivide;
    let result = diff(&config, left, right).unwrap();
    assert!(result.reconstructs());
}

#[test]
fn fallback_preservation_patience_alone() {
    let left = b"A\nB\nC\nD\nE\n";
    let right = b"X\nB\nC\nY\n";
    let mut config = Config::default();
    config.root_algo = AlgoKind::Patience;
    let result = diff(&config, left, right).unwrap();
    assert!(result.reconstructs());
}
