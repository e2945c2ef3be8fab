//! The algorithm framework: dispatch, fallback, and recursive splicing.
//!
//! Each algorithm is a plain-data [`Algorithm`] descriptor referencing
//! other algorithms by [`AlgoKind`] id rather than by owned pointer, so
//! that the configuration graph can have self-loops (Patience's
//! `inner_algo = Patience`) and back-edges (`MyersDivide`'s
//! `inner_algo = MyersFull`) without modeling an owned tree.

use crate::atom::atoms_equal;
use crate::chunk::{AtomSpan, Chunk, EmittedChunk};
use crate::error::{DiffError, Result};
use crate::myers_divide;
use crate::myers_full;
use crate::patience;
use crate::view::DiffData;

/// Identifies which concrete algorithm a descriptor or recursion step
/// refers to. "none" (spec.md §4.3) is not a member: it is the
/// terminal fallback invoked directly by the dispatcher, never
/// configured as a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgoKind {
    MyersFull,
    MyersDivide,
    Patience,
}

/// A plain-data description of one algorithm's place in the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Algorithm {
    pub inner_algo: Option<AlgoKind>,
    pub fallback_algo: Option<AlgoKind>,
    /// Upper bound, in bytes, on the scratch `myers_full` may allocate.
    /// `0` means unlimited (spec.md §9's resolved ambiguity). Ignored
    /// by algorithms other than `MyersFull`.
    pub permitted_state_size: usize,
}

/// The fixed three-node algorithm graph, customizable per-node by a
/// caller through [`crate::config::Config`].
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmGraph {
    myers_full: Algorithm,
    myers_divide: Algorithm,
    patience: Algorithm,
}

impl AlgorithmGraph {
    pub fn get(&self, kind: AlgoKind) -> &Algorithm {
        match kind {
            AlgoKind::MyersFull => &self.myers_full,
            AlgoKind::MyersDivide => &self.myers_divide,
            AlgoKind::Patience => &self.patience,
        }
    }

    pub fn get_mut(&mut self, kind: AlgoKind) -> &mut Algorithm {
        match kind {
            AlgoKind::MyersFull => &mut self.myers_full,
            AlgoKind::MyersDivide => &mut self.myers_divide,
            AlgoKind::Patience => &mut self.patience,
        }
    }
}

impl Default for AlgorithmGraph {
    /// The default pipeline (spec.md §4.7):
    /// `MyersFull` (1 MiB budget) → fallback `Patience`;
    /// `Patience` inner → `Patience`, fallback → `MyersDivide`;
    /// `MyersDivide` inner → `MyersFull`, no fallback (⇒ none).
    fn default() -> Self {
        const ONE_MIB: usize = 1 << 20;
        Self {
            myers_full: Algorithm {
                inner_algo: None,
                fallback_algo: Some(AlgoKind::Patience),
                permitted_state_size: ONE_MIB,
            },
            patience: Algorithm {
                inner_algo: Some(AlgoKind::Patience),
                fallback_algo: Some(AlgoKind::MyersDivide),
                permitted_state_size: 0,
            },
            myers_divide: Algorithm {
                inner_algo: Some(AlgoKind::MyersFull),
                fallback_algo: None,
                permitted_state_size: 0,
            },
        }
    }
}

/// What an algorithm's top-level `impl` step returned, before the
/// dispatcher has drained its scratch buffer. `OutOfMemory`/`InvalidArg`
/// propagate as `Err` instead of a variant here, matching spec.md §4.2
/// step 3's four outcomes collapsed onto `Result`.
pub(crate) enum StepOutcome {
    Ok,
    UseFallback,
}

fn invoke(
    kind: AlgoKind,
    algo: &Algorithm,
    left: &DiffData,
    right: &DiffData,
    temp: &mut Vec<EmittedChunk>,
) -> Result<StepOutcome> {
    match kind {
        AlgoKind::MyersFull => myers_full::run(algo, left, right, temp),
        AlgoKind::MyersDivide => myers_divide::run(left, right, temp),
        AlgoKind::Patience => patience::run(left, right, temp),
    }
}

/// Algorithm "none" (spec.md §4.3): the fallback of last resort. Emits
/// a byte-identical prefix as one equal chunk, then one deletion chunk
/// for any remaining left atoms, then one insertion chunk for any
/// remaining right atoms.
pub(crate) fn run_none(left: &DiffData, right: &DiffData, out: &mut Vec<Chunk>) -> Result<()> {
    out.try_reserve(3).map_err(|_| DiffError::OutOfMemory)?;
    let left_bytes = left.bytes();
    let right_bytes = right.bytes();
    let mut prefix = 0usize;
    while prefix < left.len()
        && prefix < right.len()
        && atoms_equal(left.atom(prefix), right.atom(prefix), left_bytes, right_bytes)
    {
        prefix += 1;
    }
    if prefix > 0 {
        out.push(Chunk::equal(
            AtomSpan::new(left.offset_in_root(), prefix),
            AtomSpan::new(right.offset_in_root(), prefix),
        ));
    }
    if prefix < left.len() {
        out.push(Chunk::delete(AtomSpan::new(
            left.offset_in_root() + prefix,
            left.len() - prefix,
        )));
    }
    if prefix < right.len() {
        out.push(Chunk::insert(AtomSpan::new(
            right.offset_in_root() + prefix,
            right.len() - prefix,
        )));
    }
    Ok(())
}

/// Appends `c` to `out`, merging it into the last chunk instead if the
/// two are adjacent and the same kind. This is the single funnel every
/// solved chunk passes through, so per-algorithm emission code (see
/// `myers_full`, `myers_divide`, `patience`) is free to emit chunks one
/// backtrace step at a time without worrying about coalescing runs.
fn append_merging(out: &mut Vec<Chunk>, c: Chunk) {
    if let Some(last) = out.last_mut() {
        if last.try_merge(&c) {
            return;
        }
    }
    out.push(c);
}

/// Run `kind` (or algorithm "none" if absent / recursion is exhausted)
/// over `(left, right)`, appending finished chunks to `out` in
/// left-to-right order and recursing into unsolved sub-problems via
/// each algorithm's configured `inner_algo`.
pub(crate) fn dispatch(
    kind: Option<AlgoKind>,
    graph: &AlgorithmGraph,
    left: &DiffData,
    right: &DiffData,
    recursion_depth_left: u32,
    out: &mut Vec<Chunk>,
) -> Result<()> {
    let Some(kind) = kind else {
        tracing::trace!("dispatch: no algorithm configured, running none");
        return run_none(left, right, out);
    };
    if recursion_depth_left == 0 {
        tracing::debug!("dispatch: recursion depth exhausted, running none");
        return run_none(left, right, out);
    }

    let algo = *graph.get(kind);
    let mut temp: Vec<EmittedChunk> = Vec::new();
    tracing::trace!(?kind, left_len = left.len(), right_len = right.len(), "dispatch: running algorithm");
    match invoke(kind, &algo, left, right, &mut temp)? {
        StepOutcome::Ok => {
            for emitted in temp.drain(..) {
                match emitted {
                    EmittedChunk::Solved(c) => append_merging(out, c),
                    EmittedChunk::Pending(p) => {
                        let left_local = p.left.start - left.offset_in_root();
                        let right_local = p.right.start - right.offset_in_root();
                        let sub_left = left.sub_view(left_local, p.left.count);
                        let sub_right = right.sub_view(right_local, p.right.count);
                        dispatch(algo.inner_algo, graph, &sub_left, &sub_right, recursion_depth_left - 1, out)?;
                    }
                }
            }
            Ok(())
        }
        StepOutcome::UseFallback => {
            tracing::debug!(?kind, "dispatch: algorithm requested fallback");
            temp.clear();
            dispatch(algo.fallback_algo, graph, left, right, recursion_depth_left, out)
        }
    }
}
