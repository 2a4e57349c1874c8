//! Priority distribution of a length across a sequence of springs.
//!
//! This is the one allocation rule the whole engine uses: rows and columns
//! split their main axis with it, grids size their columns and rows with it.
//!
//! 1. Fixed springs (`max == pref`) get exactly their preferred length.
//! 2. If what remains is no more than the flexible minimums, every flexible
//!    spring gets its minimum and the sequence overflows.
//! 3. When the flexible springs mix gaps and content and the gaps' minimums
//!    fit, gaps are held at their minimum and only content shares the rest.
//! 4. The pool shares space in proportion to preferred length. The last
//!    pool member takes the rounding residual so the pool sums exactly.
//! 5. Members that land below their minimum are pinned there and the rest
//!    are re-shared once.
//!
//! Step 5 runs a single correction pass. With three or more members pinned
//! at once the residual member can still land below its minimum.
//!
//! # Example
//!
//! ```
//! use zenpage::{distribute, Axis, Extent, Spring};
//!
//! let fixed = Spring::new(Extent::fixed(50), Extent::ZERO);
//! let flexible = Spring::new(Extent::new(20, 150, 32_767), Extent::ZERO);
//!
//! assert_eq!(distribute(&[fixed, flexible], Axis::Horizontal, 100), vec![50, 50]);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::spring::{Axis, Spring, round_half_up};

/// Split `length` along `axis` across `springs`, returning one length per spring.
pub fn distribute(springs: &[Spring], axis: Axis, length: i32) -> Vec<i32> {
    let mut out = vec![0; springs.len()];
    let mut remaining = i64::from(length);
    let mut flexible = Vec::with_capacity(springs.len());

    for (i, s) in springs.iter().enumerate() {
        if s.is_fixed(axis) {
            out[i] = s.pref(axis);
            remaining -= i64::from(out[i]);
        } else {
            flexible.push(i);
        }
    }
    if flexible.is_empty() {
        return out;
    }

    let min_sum: i64 = flexible.iter().map(|&i| i64::from(springs[i].min(axis))).sum();
    if remaining <= min_sum {
        for &i in &flexible {
            out[i] = springs[i].min(axis);
        }
        return out;
    }

    let (gaps, content): (Vec<usize>, Vec<usize>) =
        flexible.iter().partition(|&&i| springs[i].is_gap());
    let gap_min: i64 = gaps.iter().map(|&i| i64::from(springs[i].min(axis))).sum();

    if !gaps.is_empty() && !content.is_empty() && gap_min <= remaining {
        for &i in &gaps {
            out[i] = springs[i].min(axis);
        }
        share(springs, axis, &content, remaining - gap_min, &mut out);
    } else {
        share(springs, axis, &flexible, remaining, &mut out);
    }

    tracing::trace!(?axis, length, lengths = ?out, "distributed");
    out
}

/// Total length the springs need at minimum: preferred for fixed springs,
/// minimum for flexible ones.
pub(crate) fn minimum_total(springs: &[Spring], axis: Axis) -> i64 {
    springs
        .iter()
        .map(|s| {
            if s.is_fixed(axis) {
                i64::from(s.pref(axis))
            } else {
                i64::from(s.min(axis))
            }
        })
        .sum()
}

/// Proportional share of `space` over `pool`, with one pin-to-minimum pass.
fn share(springs: &[Spring], axis: Axis, pool: &[usize], space: i64, out: &mut [i32]) {
    let Some((&last, rest)) = pool.split_last() else {
        return;
    };
    let space_i = clamp_i32(space);

    let pref_sum: i64 = pool.iter().map(|&i| i64::from(springs[i].pref(axis))).sum();
    let scale = ratio(space, pref_sum);

    let mut used: i64 = 0;
    for &i in rest {
        let v = round_half_up(f64::from(springs[i].pref(axis)) * scale);
        out[i] = v;
        used += i64::from(v);
    }
    out[last] = clamp_i32(space - used);

    let mut pinned_min: i64 = 0;
    let mut free_pref: i64 = 0;
    for &i in pool {
        let s = &springs[i];
        if out[i] < s.min(axis) {
            pinned_min += i64::from(s.min(axis));
        } else {
            free_pref += i64::from(s.pref(axis));
        }
    }
    if pinned_min == 0 || pinned_min >= space {
        return;
    }

    let rescale = ratio(space - pinned_min, free_pref);
    used = 0;
    for &i in rest {
        let s = &springs[i];
        let v = if out[i] < s.min(axis) {
            s.min(axis)
        } else {
            round_half_up(f64::from(s.pref(axis)) * rescale)
        };
        out[i] = v;
        used += i64::from(v);
    }
    out[last] = clamp_i32(i64::from(space_i) - used);
}

fn ratio(space: i64, pref_sum: i64) -> f64 {
    if pref_sum > 0 {
        space as f64 / pref_sum as f64
    } else {
        0.0
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
