//! Myers "divide and conquer": linear-space bidirectional search for a
//! mid-snake, splitting the problem into a before/mid/after split.

use crate::algorithm::StepOutcome;
use crate::atom::atoms_equal;
use crate::chunk::{emit_section, AtomSpan, Chunk, EmittedChunk};
use crate::error::{DiffError, Result};
use crate::view::DiffData;

fn xk_to_y(x: i64, k: i64) -> i64 {
    x - k
}

fn xc_to_y(x: i64, c: i64, delta: i64) -> i64 {
    x - c + delta
}

fn k_to_c(k: i64, delta: i64) -> i64 {
    k + delta
}

fn c_to_k(c: i64, delta: i64) -> i64 {
    c - delta
}

/// One forward half-step at distance `d`, tracing from the top-left
/// corner. Returns the mid-snake box `(left_start, left_end,
/// right_start, right_end)` the instant it crosses the backward
/// traversal recorded so far in `kd_backward`.
fn forward_step(
    left: &DiffData,
    right: &DiffData,
    kd_forward: &mut [i64],
    kd_backward: &[i64],
    offset: i64,
    d: i64,
) -> Option<(i64, i64, i64, i64)> {
    let l = left.len() as i64;
    let r = right.len() as i64;
    let delta = r - l;
    let left_bytes = left.bytes();
    let right_bytes = right.bytes();

    let mut k = d;
    while k >= -d {
        if k < -r || k > l {
            if k < 0 {
                break;
            }
            k -= 2;
            continue;
        }

        let (mut x, prev_x, prev_y) = if d == 0 {
            (0i64, 0i64, 0i64)
        } else if k > -d
            && (k == d
                || (k - 1 >= -r
                    && kd_forward[(k - 1 + offset) as usize] >= kd_forward[(k + 1 + offset) as usize]))
        {
            let prev_k = k - 1;
            let prev_x = kd_forward[(prev_k + offset) as usize];
            (prev_x + 1, prev_x, xk_to_y(prev_x, prev_k))
        } else {
            let prev_k = k + 1;
            let prev_x = kd_forward[(prev_k + offset) as usize];
            (prev_x, prev_x, xk_to_y(prev_x, prev_k))
        };

        while x < l
            && xk_to_y(x, k) < r
            && atoms_equal(left.atom(x as usize), right.atom(xk_to_y(x, k) as usize), left_bytes, right_bytes)
        {
            x += 1;
        }
        kd_forward[(k + offset) as usize] = x;

        if x < 0 || x > l || xk_to_y(x, k) < 0 || xk_to_y(x, k) > r {
            k -= 2;
            continue;
        }

        let backwards_d = d - 1;
        if delta % 2 != 0 && backwards_d >= 0 {
            let c = k_to_c(k, delta);
            if c >= -backwards_d && c <= backwards_d {
                let backward_x = kd_backward[(c + offset) as usize];
                let backward_y = xc_to_y(backward_x, c, delta);
                if prev_x <= backward_x && prev_y <= backward_y && x >= backward_x {
                    return Some((backward_x, x, backward_y, xk_to_y(x, k)));
                }
            }
        }
        k -= 2;
    }
    None
}

/// One backward half-step at distance `d`, tracing from the
/// bottom-right corner back toward the forward traversal.
fn backward_step(
    left: &DiffData,
    right: &DiffData,
    kd_forward: &[i64],
    kd_backward: &mut [i64],
    offset: i64,
    d: i64,
) -> Option<(i64, i64, i64, i64)> {
    let l = left.len() as i64;
    let r = right.len() as i64;
    let delta = r - l;
    let left_bytes = left.bytes();
    let right_bytes = right.bytes();

    let mut c = d;
    while c >= -d {
        if c < -l || c > r {
            if c < 0 {
                break;
            }
            c -= 2;
            continue;
        }

        let (mut x, prev_x, prev_y) = if d == 0 {
            (l, l, r)
        } else if c > -d
            && (c == d
                || (c - 1 >= -r
                    && kd_backward[(c - 1 + offset) as usize] <= kd_backward[(c + 1 + offset) as usize]))
        {
            let prev_c = c - 1;
            let prev_x = kd_backward[(prev_c + offset) as usize];
            (prev_x, prev_x, xc_to_y(prev_x, prev_c, delta))
        } else {
            let prev_c = c + 1;
            let prev_x = kd_backward[(prev_c + offset) as usize];
            (prev_x - 1, prev_x, xc_to_y(prev_x, prev_c, delta))
        };

        while x > 0
            && xc_to_y(x, c, delta) > 0
            && atoms_equal(
                left.atom((x - 1) as usize),
                right.atom((xc_to_y(x, c, delta) - 1) as usize),
                left_bytes,
                right_bytes,
            )
        {
            x -= 1;
        }
        kd_backward[(c + offset) as usize] = x;

        if x < 0 || x > l || xc_to_y(x, c, delta) < 0 || xc_to_y(x, c, delta) > r {
            c -= 2;
            continue;
        }

        if delta % 2 == 0 {
            let forwards_d = d;
            let k = c_to_k(c, delta);
            if k >= -forwards_d && k <= forwards_d {
                let forward_x = kd_forward[(k + offset) as usize];
                let forward_y = xk_to_y(forward_x, k);
                if forward_x <= prev_x && forward_y <= prev_y && forward_x >= x {
                    return Some((x, forward_x, xc_to_y(x, c, delta), forward_y));
                }
            }
        }
        c -= 2;
    }
    None
}

pub(crate) fn run(left: &DiffData, right: &DiffData, out: &mut Vec<EmittedChunk>) -> Result<StepOutcome> {
    let l = left.len() as i64;
    let r = right.len() as i64;

    if l == 0 && r == 0 {
        return Ok(StepOutcome::Ok);
    }

    let max = l + r;
    let offset = max.max(1);
    let row_len = (2 * offset + 1) as usize;
    let mut kd_forward = vec![-1i64; row_len];
    let mut kd_backward = vec![-1i64; row_len];

    let mut mid_snake: Option<(i64, i64, i64, i64)> = None;
    let half = max / 2;
    for d in 0..=half {
        if let Some(snake) = forward_step(left, right, &mut kd_forward, &kd_backward, offset, d) {
            mid_snake = Some(snake);
            break;
        }
        if let Some(snake) = backward_step(left, right, &kd_forward, &mut kd_backward, offset, d) {
            mid_snake = Some(snake);
            break;
        }
    }

    let Some((left_start, left_end, right_start, right_end)) = mid_snake else {
        return Ok(StepOutcome::UseFallback);
    };

    let l0 = left.offset_in_root();
    let r0 = right.offset_in_root();

    out.try_reserve(3).map_err(|_| DiffError::OutOfMemory)?;
    emit_section(l0, left_start as usize, r0, right_start as usize, out)?;

    if left_end > left_start && right_end > right_start {
        out.push(EmittedChunk::Solved(Chunk::equal(
            AtomSpan::new(l0 + left_start as usize, (left_end - left_start) as usize),
            AtomSpan::new(r0 + right_start as usize, (right_end - right_start) as usize),
        )));
    }

    emit_section(
        l0 + left_end as usize,
        (l - left_end) as usize,
        r0 + right_end as usize,
        (r - right_end) as usize,
        out,
    )?;

    Ok(StepOutcome::Ok)
}
