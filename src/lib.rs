//! A pure, synchronous textual diff engine.
//!
//! `core-diff` turns two byte buffers into an ordered, non-overlapping
//! sequence of [`Chunk`]s describing how to transform the left buffer
//! into the right one. Three composable strategies do the work:
//! [`myers_full`] (canonical full-trace Myers), [`myers_divide`]
//! (linear-space Myers divide-and-conquer), and [`patience`] (LCS over
//! common-unique atoms), wired together by the recursive fallback
//! framework in [`algorithm`].
//!
//! The crate performs no I/O and renders nothing: CLI front ends and
//! output formatters (unified/plain/context/ed) are external
//! collaborators that read [`DiffResult::chunks`].
//!
//! ```
//! use core_diff::{diff, Config};
//!
//! let left = b"a\nb\nc\n";
//! let right = b"a\nx\nc\n";
//! let result = diff(&Config::default(), left, right).unwrap();
//! assert!(result.reconstructs());
//! ```

mod algorithm;
mod atom;
mod atomize;
mod chunk;
mod config;
mod error;
mod myers_divide;
mod myers_full;
mod patience;
mod view;

pub use crate::algorithm::{AlgoKind, Algorithm, AlgorithmGraph};
pub use crate::atom::Atom;
pub use crate::atomize::{Atomizer, LineAtomizer, WordAtomizer};
pub use crate::chunk::{AtomSpan, Chunk, ChunkKind, DiffResult};
pub use crate::config::{Config, DEFAULT_MAX_RECURSION_DEPTH};
pub use crate::error::{DiffError, DiffRc};
pub use crate::view::DiffData;

/// Diffs `left` against `right` using `config`'s atomizer and algorithm
/// pipeline. The sole entry point (spec.md §6's `diff_main`); there is
/// no separate `result_free` counterpart because [`DiffResult`] frees
/// its own storage on drop.
pub fn diff<'a>(config: &Config, left: &'a [u8], right: &'a [u8]) -> Result<DiffResult<'a>, DiffError> {
    tracing::debug!(left_len = left.len(), right_len = right.len(), "diff: starting");

    let mut left_atoms = Vec::new();
    config.atomizer.atomize(left, &mut left_atoms)?;
    let mut right_atoms = Vec::new();
    config.atomizer.atomize(right, &mut right_atoms)?;

    let left_view = view::DiffData::root(left, &left_atoms);
    let right_view = view::DiffData::root(right, &right_atoms);

    let mut chunks = Vec::new();
    algorithm::dispatch(
        Some(config.root_algo),
        &config.graph,
        &left_view,
        &right_view,
        config.max_recursion_depth,
        &mut chunks,
    )?;

    tracing::debug!(chunk_count = chunks.len(), "diff: finished");
    Ok(chunk::DiffResult::new(left, right, left_atoms, right_atoms, chunks))
}
