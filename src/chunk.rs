//! Chunks and the final result model.

use crate::atom::Atom;
use crate::error::{DiffError, DiffRc, Result};

/// A contiguous run of atoms on one side, identified by the root-relative
/// start index and atom count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomSpan {
    pub start: usize,
    pub count: usize,
}

impl AtomSpan {
    pub(crate) fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.count
    }
}

/// The classification of a finalized chunk. Unlike the source
/// specification's `solved: bool` plus "which side is present" pair,
/// this is a closed enum: an unsolved sub-problem never becomes a
/// `Chunk` at all (see [`PendingChunk`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Both sides present, equal counts, byte-equal pairwise.
    Equal,
    /// Left only: atoms present in the left input but not the right.
    Delete,
    /// Right only: atoms present in the right input but not the left.
    Insert,
}

/// One entry in a finished [`DiffResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    kind: ChunkKind,
    left: Option<AtomSpan>,
    right: Option<AtomSpan>,
}

impl Chunk {
    pub(crate) fn equal(left: AtomSpan, right: AtomSpan) -> Self {
        debug_assert_eq!(left.count, right.count);
        Self { kind: ChunkKind::Equal, left: Some(left), right: Some(right) }
    }

    pub(crate) fn delete(left: AtomSpan) -> Self {
        Self { kind: ChunkKind::Delete, left: Some(left), right: None }
    }

    pub(crate) fn insert(right: AtomSpan) -> Self {
        Self { kind: ChunkKind::Insert, left: None, right: Some(right) }
    }

    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    pub fn left(&self) -> Option<AtomSpan> {
        self.left
    }

    pub fn right(&self) -> Option<AtomSpan> {
        self.right
    }

    /// Extends `self` in place to cover `next` if both are the same kind
    /// and `next` picks up exactly where `self` leaves off on every side
    /// it carries. Returns whether the merge happened.
    ///
    /// A single backtrace step through an all-insertion or all-deletion
    /// run produces one tiny chunk per step (see `myers_full`); this is
    /// the funnel that coalesces those back into the single chunk per
    /// contiguous run that spec.md §8's emptiness property expects.
    pub(crate) fn try_merge(&mut self, next: &Chunk) -> bool {
        if self.kind != next.kind {
            return false;
        }
        match (self.kind, self.left, next.left, self.right, next.right) {
            (ChunkKind::Equal, Some(mut l), Some(nl), Some(mut r), Some(nr)) => {
                if l.start + l.count != nl.start || r.start + r.count != nr.start {
                    return false;
                }
                l.count += nl.count;
                r.count += nr.count;
                self.left = Some(l);
                self.right = Some(r);
                true
            }
            (ChunkKind::Delete, Some(mut l), Some(nl), None, None) => {
                if l.start + l.count != nl.start {
                    return false;
                }
                l.count += nl.count;
                self.left = Some(l);
                true
            }
            (ChunkKind::Insert, None, None, Some(mut r), Some(nr)) => {
                if r.start + r.count != nr.start {
                    return false;
                }
                r.count += nr.count;
                self.right = Some(r);
                true
            }
            _ => false,
        }
    }
}

/// An unresolved sub-problem, delegated to an inner algorithm by
/// construction: both sides are non-empty (spec.md §3). This type
/// never appears in [`DiffResult::chunks`]: the framework (see
/// [`crate::algorithm`]) drains it entirely before a result is
/// returned to the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingChunk {
    pub left: AtomSpan,
    pub right: AtomSpan,
}

/// What an algorithm emits into its scratch buffer before the
/// framework either appends it to the final result or recurses on it.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EmittedChunk {
    Solved(Chunk),
    Pending(PendingChunk),
}

/// Shared by `myers_divide` and `patience`: both split their input into
/// a "section before/after the thing we matched on" whose shape is
/// identical either way: pending if both sides are non-empty, a
/// solved delete/insert if only one side is, nothing if both are
/// empty. Positions are root-absolute.
pub(crate) fn emit_section(
    left_start: usize,
    left_len: usize,
    right_start: usize,
    right_len: usize,
    out: &mut Vec<EmittedChunk>,
) -> Result<()> {
    if left_len == 0 && right_len == 0 {
        return Ok(());
    }
    out.try_reserve(1).map_err(|_| DiffError::OutOfMemory)?;
    if left_len > 0 && right_len > 0 {
        out.push(EmittedChunk::Pending(PendingChunk {
            left: AtomSpan::new(left_start, left_len),
            right: AtomSpan::new(right_start, right_len),
        }));
    } else if left_len > 0 {
        out.push(EmittedChunk::Solved(Chunk::delete(AtomSpan::new(left_start, left_len))));
    } else {
        out.push(EmittedChunk::Solved(Chunk::insert(AtomSpan::new(right_start, right_len))));
    }
    Ok(())
}

/// The outcome of a completed diff: two atom tables and an ordered,
/// non-overlapping sequence of chunks that together reconstruct both
/// inputs (spec.md §3's reconstruction invariant).
pub struct DiffResult<'a> {
    rc: DiffRc,
    left_bytes: &'a [u8],
    right_bytes: &'a [u8],
    left_atoms: Vec<Atom>,
    right_atoms: Vec<Atom>,
    chunks: Vec<Chunk>,
}

impl<'a> DiffResult<'a> {
    pub(crate) fn new(
        left_bytes: &'a [u8],
        right_bytes: &'a [u8],
        left_atoms: Vec<Atom>,
        right_atoms: Vec<Atom>,
        chunks: Vec<Chunk>,
    ) -> Self {
        Self { rc: DiffRc::Ok, left_bytes, right_bytes, left_atoms, right_atoms, chunks }
    }

    /// The legacy result-code view described in spec.md §6. A
    /// successfully-constructed `DiffResult` is always `DiffRc::Ok`;
    /// failures short-circuit [`crate::diff`] as a `DiffError` instead.
    pub fn rc(&self) -> DiffRc {
        self.rc
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn left_bytes(&self) -> &'a [u8] {
        self.left_bytes
    }

    pub fn right_bytes(&self) -> &'a [u8] {
        self.right_bytes
    }

    pub fn left_atoms(&self) -> &[Atom] {
        &self.left_atoms
    }

    pub fn right_atoms(&self) -> &[Atom] {
        &self.right_atoms
    }

    /// The atom at root-absolute index `i` on the left side.
    pub fn left_atom(&self, i: usize) -> &Atom {
        &self.left_atoms[i]
    }

    /// The atom at root-absolute index `i` on the right side.
    pub fn right_atom(&self, i: usize) -> &Atom {
        &self.right_atoms[i]
    }

    /// Asserts and returns whether concatenating every chunk's left
    /// (resp. right) span reconstructs the full atom sequence with no
    /// gaps, overlaps, or omissions. Exercised by `tests/properties.rs`;
    /// exposed publicly so embedding callers can self-check in debug
    /// builds without duplicating the walk.
    pub fn reconstructs(&self) -> bool {
        let mut left_cursor = 0usize;
        let mut right_cursor = 0usize;
        for c in &self.chunks {
            if let Some(l) = c.left {
                if l.start != left_cursor {
                    return false;
                }
                left_cursor += l.count;
            }
            if let Some(r) = c.right {
                if r.start != right_cursor {
                    return false;
                }
                right_cursor += r.count;
            }
        }
        left_cursor == self.left_atoms.len() && right_cursor == self.right_atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_detects_gap() {
        let left = b"";
        let right = b"";
        let chunks = vec![
            Chunk::equal(AtomSpan::new(0, 2), AtomSpan::new(0, 2)),
            // gap: should have continued at 2, jumps to 3
            Chunk::delete(AtomSpan::new(3, 1)),
        ];
        let result = DiffResult::new(left, right, vec![], vec![], chunks);
        assert!(!result.reconstructs());
    }

    #[test]
    fn try_merge_joins_adjacent_inserts_only() {
        let mut a = Chunk::insert(AtomSpan::new(0, 1));
        let b = Chunk::insert(AtomSpan::new(1, 1));
        assert!(a.try_merge(&b));
        assert_eq!(a.right().unwrap(), AtomSpan::new(0, 2));

        let mut c = Chunk::insert(AtomSpan::new(0, 1));
        let d = Chunk::insert(AtomSpan::new(2, 1));
        assert!(!c.try_merge(&d));

        let mut e = Chunk::delete(AtomSpan::new(0, 1));
        let f = Chunk::insert(AtomSpan::new(1, 1));
        assert!(!e.try_merge(&f));
    }

    #[test]
    fn reconstructs_accepts_contiguous_chunks() {
        let left = b"";
        let right = b"";
        let atoms = vec![Atom::new(0, 1, 0), Atom::new(1, 1, 0), Atom::new(2, 1, 0)];
        let chunks = vec![
            Chunk::equal(AtomSpan::new(0, 1), AtomSpan::new(0, 1)),
            Chunk::delete(AtomSpan::new(1, 2)),
        ];
        let result = DiffResult::new(left, right, atoms.clone(), vec![atoms[0]], chunks);
        assert!(result.reconstructs());
    }
}
