//! Splitting a buffer into atoms.
//!
//! The engine is agnostic to what an atom means: the contract is
//! "populate each side's atom list". [`LineAtomizer`] is the default
//! and the only one exercised by the core algorithms' invariants;
//! [`WordAtomizer`] is a second, trivial implementor demonstrating the
//! pluggability the design calls for.

use crate::atom::Atom;
use crate::error::{DiffError, Result};

/// Strategy for splitting a root buffer into [`Atom`]s.
pub trait Atomizer {
    /// Populate `atoms` with every atom found in `buf`, in order.
    fn atomize(&self, buf: &[u8], atoms: &mut Vec<Atom>) -> Result<()>;
}

/// Initial atom-table capacity: `max(8, 2^ceil(log2(len/50)))`,
/// matching the source specification's growth seed so that typical
/// line-oriented text (~50 bytes/line) rarely needs to reallocate.
fn initial_capacity(buf_len: usize) -> usize {
    if buf_len <= 50 {
        return 8;
    }
    let estimate = buf_len.div_ceil(50);
    let shift = usize::BITS - (estimate - 1).leading_zeros();
    (1usize << shift).max(8)
}

fn try_with_capacity(cap: usize) -> Result<Vec<Atom>> {
    let mut v = Vec::new();
    v.try_reserve(cap).map_err(|_| DiffError::OutOfMemory)?;
    Ok(v)
}

fn push_atom(atoms: &mut Vec<Atom>, atom: Atom) -> Result<()> {
    atoms.try_reserve(1).map_err(|_| DiffError::OutOfMemory)?;
    atoms.push(atom);
    Ok(())
}

fn rolling_hash(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |h, &b| h.wrapping_mul(23).wrapping_add(b as u32))
}

/// Default atomizer: one atom per line, terminator included in the
/// atom's span. Recognizes `\n`, `\r`, and `\r\n` (the `\n` following a
/// `\r` is pulled into the same atom as its preceding `\r`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LineAtomizer;

impl Atomizer for LineAtomizer {
    fn atomize(&self, buf: &[u8], atoms: &mut Vec<Atom>) -> Result<()> {
        atoms.try_reserve(initial_capacity(buf.len()))
            .map_err(|_| DiffError::OutOfMemory)?;
        let mut start = 0usize;
        let len = buf.len();
        while start < len {
            let mut end = start;
            while end < len && buf[end] != b'\n' && buf[end] != b'\r' {
                end += 1;
            }
            if end < len {
                end += 1; // include the terminator byte itself
                if buf[end - 1] == b'\r' && end < len && buf[end] == b'\n' {
                    end += 1; // pull the paired \n into the same atom
                }
            }
            let hash = rolling_hash(&buf[start..end]);
            push_atom(atoms, Atom::new(start, end - start, hash))?;
            start = end;
        }
        Ok(())
    }
}

/// Splits a buffer on ASCII whitespace, keeping each run of
/// non-whitespace bytes as one atom and treating UTF-8 grapheme
/// boundaries within a run via `unicode-segmentation` so multi-byte
/// clusters are never torn, useful for word-level diffs of prose.
/// Whitespace itself is dropped rather than forming atoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordAtomizer;

impl Atomizer for WordAtomizer {
    fn atomize(&self, buf: &[u8], atoms: &mut Vec<Atom>) -> Result<()> {
        use unicode_segmentation::UnicodeSegmentation;
        let text = std::str::from_utf8(buf).map_err(|_| DiffError::InvalidArg("not valid UTF-8"))?;
        atoms.try_reserve(initial_capacity(buf.len()))
            .map_err(|_| DiffError::OutOfMemory)?;
        for (start, word) in text.split_word_bound_indices() {
            if word.trim().is_empty() {
                continue;
            }
            let end = start + word.len();
            let hash = rolling_hash(&buf[start..end]);
            push_atom(atoms, Atom::new(start, end - start, hash))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomize_with<A: Atomizer>(a: &A, buf: &[u8]) -> Vec<Atom> {
        let mut atoms = Vec::new();
        a.atomize(buf, &mut atoms).unwrap();
        atoms
    }

    #[test]
    fn line_atomizer_splits_on_lf() {
        let atoms = atomize_with(&LineAtomizer, b"a\nb\nc");
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].bytes(b"a\nb\nc"), b"a\n");
        assert_eq!(atoms[1].bytes(b"a\nb\nc"), b"b\n");
        assert_eq!(atoms[2].bytes(b"a\nb\nc"), b"c");
    }

    #[test]
    fn line_atomizer_handles_crlf_as_one_atom() {
        let buf = b"foo\r\nbar\n";
        let atoms = atomize_with(&LineAtomizer, buf);
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].bytes(buf), b"foo\r\n");
        assert_eq!(atoms[1].bytes(buf), b"bar\n");
    }

    #[test]
    fn line_atomizer_handles_bare_cr() {
        let buf = b"foo\rbar\n";
        let atoms = atomize_with(&LineAtomizer, buf);
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].bytes(buf), b"foo\r");
        assert_eq!(atoms[1].bytes(buf), b"bar\n");
    }

    #[test]
    fn line_atomizer_empty_buffer_yields_no_atoms() {
        let atoms = atomize_with(&LineAtomizer, b"");
        assert!(atoms.is_empty());
    }

    #[test]
    fn crlf_and_lf_forms_are_distinct_atoms() {
        // Same textual content, different terminator, must hash differently.
        let a = atomize_with(&LineAtomizer, b"bar\n");
        let b = atomize_with(&LineAtomizer, b"bar\r\n");
        assert_ne!(a[0].hash, b[0].hash);
        assert_ne!(a[0].len, b[0].len);
    }

    #[test]
    fn initial_capacity_has_sane_floor() {
        assert_eq!(initial_capacity(0), 8);
        assert_eq!(initial_capacity(50), 8);
        assert!(initial_capacity(10_000) >= 8);
    }

    #[test]
    fn word_atomizer_splits_on_whitespace() {
        let buf = "foo bar  baz".as_bytes();
        let atoms = atomize_with(&WordAtomizer, buf);
        let words: Vec<&[u8]> = atoms.iter().map(|a| a.bytes(buf)).collect();
        assert_eq!(words, vec![b"foo" as &[u8], b"bar", b"baz"]);
    }
}
