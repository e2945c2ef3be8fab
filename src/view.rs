//! Root and sub-range views over one side's atom table.

use crate::atom::Atom;

/// One side (left or right) of a diff: a root buffer plus a contiguous
/// sub-range of its atom table.
///
/// A root `DiffData` owns its atom array (`offset_in_root == 0` and
/// `count == atoms.len()`). Recursion produces sub-views that borrow
/// the same `Vec<Atom>` and narrow `count`/`offset_in_root`, which is
/// the explicit substitution the design calls for in place of the
/// pointer-subtraction the reference C implementation uses to recover
/// an atom's absolute index.
pub struct DiffData<'a> {
    bytes: &'a [u8],
    atoms: &'a [Atom],
    offset_in_root: usize,
    count: usize,
}

impl<'a> DiffData<'a> {
    /// Construct the root view spanning every atom in `atoms`.
    pub(crate) fn root(bytes: &'a [u8], atoms: &'a [Atom]) -> Self {
        Self {
            bytes,
            atoms,
            offset_in_root: 0,
            count: atoms.len(),
        }
    }

    /// Construct a sub-view over `[start, start+count)` atoms of this
    /// view (indices relative to this view, not necessarily the root).
    pub(crate) fn sub_view(&self, start: usize, count: usize) -> DiffData<'a> {
        debug_assert!(start + count <= self.count);
        DiffData {
            bytes: self.bytes,
            atoms: self.atoms,
            offset_in_root: self.offset_in_root + start,
            count,
        }
    }

    /// The buffer this view's atoms were derived from.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of atoms visible through this view.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Absolute index into the root atom array of this view's first
    /// local index.
    pub fn offset_in_root(&self) -> usize {
        self.offset_in_root
    }

    /// The atom at local index `i` (`0 <= i < self.len()`).
    pub fn atom(&self, i: usize) -> &'a Atom {
        &self.atoms[self.offset_in_root + i]
    }

    /// All atoms visible through this view, as a contiguous slice of
    /// the root atom array.
    pub fn atoms(&self) -> &'a [Atom] {
        &self.atoms[self.offset_in_root..self.offset_in_root + self.count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_view_is_contiguous_and_offset_correctly() {
        let bytes = b"aaabbbccc";
        let atoms = vec![Atom::new(0, 3, 1), Atom::new(3, 3, 2), Atom::new(6, 3, 3)];
        let root = DiffData::root(bytes, &atoms);
        assert_eq!(root.len(), 3);
        assert_eq!(root.offset_in_root(), 0);

        let sub = root.sub_view(1, 2);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.offset_in_root(), 1);
        assert_eq!(sub.atom(0).at, 3);
        assert_eq!(sub.atom(1).at, 6);
        assert_eq!(sub.atoms().len(), 2);
    }
}
