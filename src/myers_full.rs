//! Canonical Myers diff: full O((N+M)·D) time, O((N+M)^2) space trace.

use crate::algorithm::{Algorithm, StepOutcome};
use crate::atom::atoms_equal;
use crate::chunk::{AtomSpan, Chunk, EmittedChunk};
use crate::error::{DiffError, Result};
use crate::view::DiffData;

const UNSET: i64 = i64::MIN;

/// Picks the predecessor diagonal for `(d, k)` given the fully-slid row
/// at `d - 1`. Ties and the `k == d`/`k == -d` boundaries both prefer a
/// deletion-first (`k - 1`) predecessor, per spec.md §4.4.
fn predecessor_k(d: i64, k: i64, prev_row: &[i64], offset: i64) -> i64 {
    if k == -d {
        return k + 1;
    }
    if k == d {
        return k - 1;
    }
    let left = prev_row[(k - 1 + offset) as usize];
    let right = prev_row[(k + 1 + offset) as usize];
    if left >= right { k - 1 } else { k + 1 }
}

fn slide(left: &DiffData, right: &DiffData, mut x: i64, k: i64) -> i64 {
    let left_bytes = left.bytes();
    let right_bytes = right.bytes();
    let l = left.len() as i64;
    let r = right.len() as i64;
    while x < l
        && (x - k) < r
        && atoms_equal(left.atom(x as usize), right.atom((x - k) as usize), left_bytes, right_bytes)
    {
        x += 1;
    }
    x
}

/// Runs the full Myers trace over `(left, right)` and appends solved
/// chunks to `out`. Returns `StepOutcome::UseFallback` if the scratch
/// the trace would need exceeds `algo.permitted_state_size` (`0` means
/// unlimited, spec.md §9).
pub(crate) fn run(
    algo: &Algorithm,
    left: &DiffData,
    right: &DiffData,
    out: &mut Vec<EmittedChunk>,
) -> Result<StepOutcome> {
    let l = left.len() as i64;
    let r = right.len() as i64;

    if algo.permitted_state_size != 0 {
        let max = l + r + 1;
        let needed = (max as u128)
            .saturating_mul(max as u128)
            .saturating_mul(std::mem::size_of::<i32>() as u128);
        if needed > algo.permitted_state_size as u128 {
            return Ok(StepOutcome::UseFallback);
        }
    }

    if l == 0 && r == 0 {
        return Ok(StepOutcome::Ok);
    }

    let max_d = l + r;
    let offset = max_d.max(1);
    let row_len = (2 * offset + 1) as usize;
    let mut trace: Vec<Vec<i64>> = Vec::new();
    let mut terminal: Option<(i64, i64)> = None;

    'outer: for d in 0..=max_d {
        let mut row = vec![UNSET; row_len];
        let mut k = d;
        while k >= -d {
            if k < -r || k > l {
                if k < 0 {
                    break;
                }
                k -= 2;
                continue;
            }
            let x = if d == 0 {
                0
            } else {
                let prev_row = &trace[(d - 1) as usize];
                let prev_k = predecessor_k(d, k, prev_row, offset);
                let prev_x = prev_row[(prev_k + offset) as usize];
                if prev_k == k - 1 { prev_x + 1 } else { prev_x }
            };
            let x = slide(left, right, x, k);
            row[(k + offset) as usize] = x;
            if x == l && x - k == r {
                terminal = Some((d, k));
                trace.push(row);
                break 'outer;
            }
            k -= 2;
        }
        trace.push(row);
    }

    let Some((d_end, k_end)) = terminal else {
        // Cannot happen for well-formed input within d <= L + R.
        return Ok(StepOutcome::UseFallback);
    };

    // Backtrace: walk from (d_end, k_end) down to d = 0, recording each
    // endpoint, then reverse to read segments in left-to-right order.
    let mut endpoints: Vec<(i64, i64)> = Vec::with_capacity((d_end + 1) as usize);
    let mut k = k_end;
    for d in (0..=d_end).rev() {
        let x = trace[d as usize][(k + offset) as usize];
        let y = x - k;
        endpoints.push((x, y));
        if d > 0 {
            let prev_row = &trace[(d - 1) as usize];
            k = predecessor_k(d, k, prev_row, offset);
        }
    }
    endpoints.reverse();

    out.try_reserve(endpoints.len()).map_err(|_| DiffError::OutOfMemory)?;
    let mut prev = (0i64, 0i64);
    for next in endpoints {
        emit_segment(left, right, out, prev, next)?;
        prev = next;
    }

    Ok(StepOutcome::Ok)
}

/// Converts one backtrace step `(prev -> next)` into solved chunks, per
/// spec.md §4.4: a pure diagonal move is an equal chunk; otherwise the
/// single edit atom is emitted first, followed by the equal remainder
/// (the "snake" slid after that edit), if any.
fn emit_segment(
    left: &DiffData,
    right: &DiffData,
    out: &mut Vec<EmittedChunk>,
    prev: (i64, i64),
    next: (i64, i64),
) -> Result<()> {
    let delta_x = next.0 - prev.0;
    let delta_y = next.1 - prev.1;
    let l0 = left.offset_in_root() as i64;
    let r0 = right.offset_in_root() as i64;

    if delta_x == delta_y {
        if delta_x > 0 {
            push(out, EmittedChunk::Solved(Chunk::equal(
                AtomSpan::new((l0 + prev.0) as usize, delta_x as usize),
                AtomSpan::new((r0 + prev.1) as usize, delta_y as usize),
            )))?;
        }
    } else if delta_x == delta_y + 1 {
        push(out, EmittedChunk::Solved(Chunk::delete(AtomSpan::new((l0 + prev.0) as usize, 1))))?;
        if delta_y > 0 {
            push(out, EmittedChunk::Solved(Chunk::equal(
                AtomSpan::new((l0 + prev.0 + 1) as usize, delta_y as usize),
                AtomSpan::new((r0 + prev.1) as usize, delta_y as usize),
            )))?;
        }
    } else {
        debug_assert_eq!(delta_y, delta_x + 1);
        push(out, EmittedChunk::Solved(Chunk::insert(AtomSpan::new((r0 + prev.1) as usize, 1))))?;
        if delta_x > 0 {
            push(out, EmittedChunk::Solved(Chunk::equal(
                AtomSpan::new((l0 + prev.0) as usize, delta_x as usize),
                AtomSpan::new((r0 + prev.1 + 1) as usize, delta_x as usize),
            )))?;
        }
    }
    Ok(())
}

fn push(out: &mut Vec<EmittedChunk>, c: EmittedChunk) -> Result<()> {
    out.try_reserve(1).map_err(|_| DiffError::OutOfMemory)?;
    out.push(c);
    Ok(())
}
