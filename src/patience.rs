//! Patience diff: divide the problem on the longest common subsequence
//! of atoms that appear exactly once on each side.

use crate::algorithm::StepOutcome;
use crate::atom::atoms_equal;
use crate::chunk::{emit_section, AtomSpan, Chunk, EmittedChunk};
use crate::error::{DiffError, Result};
use crate::view::DiffData;

/// Marks `unique[i] == true` for every atom that occurs exactly once in
/// `view`, via pairwise comparison (spec.md §9: not hash-optimized).
fn mark_unique(view: &DiffData) -> Vec<bool> {
    let n = view.len();
    let mut unique = vec![true; n];
    let bytes = view.bytes();
    for i in 0..n {
        if !unique[i] {
            continue;
        }
        for j in (i + 1)..n {
            if atoms_equal(view.atom(i), view.atom(j), bytes, bytes) {
                unique[i] = false;
                unique[j] = false;
            }
        }
    }
    unique
}

/// Narrows each side's unique atoms down to those that occur exactly
/// once in *both* sides, recording each other's position.
fn mark_unique_in_both(
    left: &DiffData,
    right: &DiffData,
) -> (Vec<bool>, Vec<bool>, Vec<Option<usize>>, Vec<Option<usize>>) {
    let left_unique_here = mark_unique(left);
    let right_unique_here = mark_unique(right);
    let mut left_unique_in_both = left_unique_here.clone();
    let mut right_unique_in_both = right_unique_here.clone();
    let mut left_pos_in_other = vec![None; left.len()];
    let mut right_pos_in_other = vec![None; right.len()];

    let left_bytes = left.bytes();
    let right_bytes = right.bytes();

    for i in 0..left.len() {
        if !left_unique_here[i] {
            continue;
        }
        let mut found = 0u8;
        for j in 0..right.len() {
            if !atoms_equal(left.atom(i), right.atom(j), left_bytes, right_bytes) {
                continue;
            }
            if !right_unique_here[j] {
                found = 2;
                break;
            }
            found = 1;
            right_pos_in_other[j] = Some(i);
            left_pos_in_other[i] = Some(j);
        }
        if found == 0 || found > 1 {
            left_unique_in_both[i] = false;
        }
    }

    // An atom unique-here on the right that never matched a still-valid
    // unique-in-both left atom (e.g. it matched one the loop above just
    // disqualified) doesn't belong in the LCS candidate set either.
    for j in 0..right.len() {
        if !right_unique_here[j] || !right_unique_in_both[j] {
            continue;
        }
        let mut found_in_a = false;
        for i in 0..left.len() {
            if !left_unique_in_both[i] {
                continue;
            }
            if atoms_equal(right.atom(j), left.atom(i), right_bytes, left_bytes) {
                found_in_a = true;
                break;
            }
        }
        if !found_in_a {
            right_unique_in_both[j] = false;
        }
    }

    (left_unique_in_both, right_unique_in_both, left_pos_in_other, right_pos_in_other)
}

/// Grows each common-unique atom into a maximal run of identical
/// neighbours on both sides, so a whole contiguous equal run collapses
/// to one LCS entry instead of one per atom. Any common-unique atom
/// swallowed into an earlier run is disqualified as its own LCS
/// candidate.
fn swallow_identical_neighbors(
    left: &DiffData,
    right: &DiffData,
    left_unique_in_both: &mut [bool],
    right_unique_in_both: &mut [bool],
    left_pos_in_other: &[Option<usize>],
) -> (Vec<Option<(usize, usize)>>, Vec<Option<(usize, usize)>>) {
    let ln = left.len();
    let rn = right.len();
    let mut identical_left: Vec<Option<(usize, usize)>> = vec![None; ln];
    let mut identical_right: Vec<Option<(usize, usize)>> = vec![None; rn];
    let left_bytes = left.bytes();
    let right_bytes = right.bytes();

    let mut l_min = 0usize;
    let mut r_min = 0usize;
    let mut l_idx = 0usize;
    while l_idx < ln {
        let mut next_l_idx = l_idx + 1;
        if !left_unique_in_both[l_idx] {
            l_idx = next_l_idx;
            continue;
        }
        let r_idx = left_pos_in_other[l_idx].expect("common-unique atom always has a partner");

        let mut start_l = l_idx;
        let mut start_r = r_idx;
        while start_l > l_min
            && start_r > r_min
            && atoms_equal(left.atom(start_l - 1), right.atom(start_r - 1), left_bytes, right_bytes)
        {
            start_l -= 1;
            start_r -= 1;
        }

        let mut end_l = l_idx + 1;
        let mut end_r = r_idx + 1;
        while end_l < ln && end_r < rn && atoms_equal(left.atom(end_l), right.atom(end_r), left_bytes, right_bytes) {
            if left_unique_in_both[end_l] {
                left_unique_in_both[end_l] = false;
                right_unique_in_both[end_r] = false;
            }
            end_l += 1;
            end_r += 1;
            next_l_idx += 1;
        }

        identical_left[l_idx] = Some((start_l, end_l));
        identical_right[r_idx] = Some((start_r, end_r));

        l_min = end_l;
        r_min = end_r;
        l_idx = next_l_idx;
    }

    (identical_left, identical_right)
}

/// Patience-sorts the surviving common-unique left atoms by their
/// right-side position, then backtraces the longest increasing
/// subsequence of stack tops to get the final LCS, in left-to-right
/// order.
fn longest_common_subsequence(left: &DiffData, left_unique_in_both: &[bool], left_pos_in_other: &[Option<usize>]) -> Vec<usize> {
    let uniques: Vec<usize> = (0..left.len()).filter(|&i| left_unique_in_both[i]).collect();
    if uniques.is_empty() {
        return Vec::new();
    }

    let mut stacks: Vec<usize> = Vec::new();
    let mut prev_stack: Vec<Option<usize>> = vec![None; left.len()];

    for &i in &uniques {
        let pos = left_pos_in_other[i].expect("candidate has a partner");

        let mut lo = 0usize;
        let mut hi = stacks.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let top_pos = left_pos_in_other[stacks[mid]].expect("stack entries are candidates");
            if top_pos < pos {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let target = lo;

        prev_stack[i] = if target == 0 { None } else { Some(stacks[target - 1]) };
        if target == stacks.len() {
            stacks.push(i);
        } else {
            stacks[target] = i;
        }
    }

    let mut lcs = Vec::new();
    let mut cur = stacks.last().copied();
    while let Some(i) = cur {
        lcs.push(i);
        cur = prev_stack[i];
    }
    lcs.reverse();
    lcs
}

pub(crate) fn run(left: &DiffData, right: &DiffData, out: &mut Vec<EmittedChunk>) -> Result<StepOutcome> {
    let (mut left_unique_in_both, mut right_unique_in_both, left_pos_in_other, _right_pos_in_other) =
        mark_unique_in_both(left, right);

    if !left_unique_in_both.iter().any(|&b| b) {
        tracing::trace!("patience: no common-unique atoms, requesting fallback");
        return Ok(StepOutcome::UseFallback);
    }

    let (identical_left, identical_right) =
        swallow_identical_neighbors(left, right, &mut left_unique_in_both, &mut right_unique_in_both, &left_pos_in_other);

    let lcs = longest_common_subsequence(left, &left_unique_in_both, &left_pos_in_other);

    let l0 = left.offset_in_root();
    let r0 = right.offset_in_root();
    out.try_reserve(lcs.len() * 2 + 1).map_err(|_| DiffError::OutOfMemory)?;

    let mut left_pos = 0usize;
    let mut right_pos = 0usize;

    for i in 0..=lcs.len() {
        let (left_idx, right_idx, atom) = if i < lcs.len() {
            let li = lcs[i];
            let ri = left_pos_in_other[li].expect("lcs entries are candidates");
            let (id_l_start, _) = identical_left[li].expect("lcs entries were swallowed");
            let (id_r_start, _) = identical_right[ri].expect("lcs entries were swallowed");
            (id_l_start, id_r_start, Some((li, ri)))
        } else {
            (left.len(), right.len(), None)
        };

        let left_section_len = left_idx - left_pos;
        let right_section_len = right_idx - right_pos;
        emit_section(l0 + left_pos, left_section_len, r0 + right_pos, right_section_len, out)?;

        match atom {
            Some((li, ri)) => {
                let (il_start, il_end) = identical_left[li].unwrap();
                let (ir_start, ir_end) = identical_right[ri].unwrap();
                out.push(EmittedChunk::Solved(Chunk::equal(
                    AtomSpan::new(l0 + il_start, il_end - il_start),
                    AtomSpan::new(r0 + ir_start, ir_end - ir_start),
                )));
                left_pos = il_end;
                right_pos = ir_end;
            }
            None => {
                left_pos = left_idx;
                right_pos = right_idx;
            }
        }
    }

    Ok(StepOutcome::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::atomize::{Atomizer, LineAtomizer};

    fn atoms_for(buf: &[u8]) -> Vec<Atom> {
        let mut atoms = Vec::new();
        LineAtomizer.atomize(buf, &mut atoms).unwrap();
        atoms
    }

    #[test]
    fn no_common_unique_atoms_falls_back() {
        let left_buf = b"a\na\n";
        let right_buf = b"a\na\na\n";
        let left_atoms = atoms_for(left_buf);
        let right_atoms = atoms_for(right_buf);
        let left = DiffData::root(left_buf, &left_atoms);
        let right = DiffData::root(right_buf, &right_atoms);
        let mut out = Vec::new();
        let outcome = run(&left, &right, &mut out).unwrap();
        assert!(matches!(outcome, StepOutcome::UseFallback));
    }

    #[test]
    fn single_common_unique_anchor_splits_around_it() {
        let left_buf = b"one\ntwo\nANCHOR\nthree\nfour\n";
        let right_buf = b"uno\ndos\nANCHOR\ntres\n";
        let left_atoms = atoms_for(left_buf);
        let right_atoms = atoms_for(right_buf);
        let left = DiffData::root(left_buf, &left_atoms);
        let right = DiffData::root(right_buf, &right_atoms);
        let mut out = Vec::new();
        let outcome = run(&left, &right, &mut out).unwrap();
        assert!(matches!(outcome, StepOutcome::Ok));

        let equal_anchor = out.iter().any(|c| match c {
            EmittedChunk::Solved(c) => c.kind() == crate::chunk::ChunkKind::Equal && c.left().unwrap().count == 1,
            _ => false,
        });
        assert!(equal_anchor);
        let pending_before = out.iter().any(|c| matches!(c, EmittedChunk::Pending(p) if p.left.count == 2 && p.right.count == 2));
        assert!(pending_before);
    }

    #[test]
    fn identical_neighbors_are_swallowed_into_one_run() {
        let buf = b"x\ny\nz\n";
        let left_buf = [&buf[..], b"tail\n"].concat();
        let right_buf = [&buf[..], b"other\n"].concat();
        let left_atoms = atoms_for(&left_buf);
        let right_atoms = atoms_for(&right_buf);
        let left = DiffData::root(&left_buf, &left_atoms);
        let right = DiffData::root(&right_buf, &right_atoms);
        let mut out = Vec::new();
        let outcome = run(&left, &right, &mut out).unwrap();
        assert!(matches!(outcome, StepOutcome::Ok));
        let merged_equal_run = out.iter().any(|c| match c {
            EmittedChunk::Solved(c) => c.kind() == crate::chunk::ChunkKind::Equal && c.left().unwrap().count == 3,
            _ => false,
        });
        assert!(merged_equal_run);
    }
}
