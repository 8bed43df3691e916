//! Multi-key quicksort: the sequential fallback for ranges too small (or
//! too deep) to re-sample, once a range no longer has a single shared
//! depth-`d` u64 key to recurse on evenly.
//!
//! This is ordinary 3-way (Bentley-McIlroy) quicksort keyed on the cached
//! 8-byte word at the current depth, with the middle ("equal") partition
//! recursing at `depth + 8` rather than terminating — the multi-key twist
//! that makes it a full string sorter rather than a single fixed-width-key
//! sorter.

use crate::core::{compare_full, depth_of, full_lcp_from, KeyAccessor};
use crate::queue::JobQueue;
use std::cmp::Ordering;

/// One explicit stack frame: sort `indices[off..off+len]` at `depth`,
/// writing LCPs into `lcp[off..off+len]` if present.
pub(crate) struct Frame {
    pub(crate) off: usize,
    pub(crate) len: usize,
    pub(crate) depth: usize,
}

/// Runs multi-key quicksort over `indices[off..off+len]`, recursing via an
/// explicit stack (so the work-sharing policy can peel frames off the
/// bottom for idle workers) rather than the call stack.
///
/// `cache` is filled with the per-element cached depth-`d` byte as each
/// element settles into its final position relative to its immediate
/// neighbors (mirrors [`crate::smallsort`]'s fill discipline); `lcp`, if
/// present, receives inline LCP values for elements whose predecessor sits
/// at a lower recursion depth.
pub(crate) fn mkqs_sort<T: KeyAccessor + ?Sized>(
    provider: &T,
    indices: &mut [usize],
    lcp: Option<&mut [usize]>,
    off: usize,
    len: usize,
    depth: usize,
    inssort_thresh: usize,
    queue: Option<&JobQueue<'_>>,
) {
    let mut stack = vec![Frame { off: 0, len, depth }];
    let mut lcp = lcp;
    // `queue` is threaded through so nested calls (recursion into the
    // equal partition) keep seeing the same work-sharing signal; actual
    // job re-dispatch for idle workers happens one level up, in
    // `crate::step`, which owns the `ShadowBundle` ranges this stack's
    // frames index into and so is the only place that can safely hand a
    // sub-range to another thread.
    let _ = queue;
    log::trace!("mkqs_sort: n={len} depth={depth}");

    while let Some(frame) = stack.pop() {
        let Frame {
            off: foff,
            len: flen,
            depth: fdepth,
        } = frame;
        let base = off + foff;
        let range = &mut indices[base..base + flen];

        if flen <= 1 {
            continue;
        }
        if flen <= inssort_thresh {
            insertion_sort(provider, range, lcp.as_deref_mut().map(|l| &mut l[base..base + flen]), fdepth);
            continue;
        }

        // All keys terminated at this depth: nothing left to compare on,
        // the whole range is already an equal group.
        let sample = provider.get_u64(range[0], fdepth);
        if depth_of(sample) < 8 && range.iter().all(|&i| provider.get_u64(i, fdepth) == sample) {
            continue;
        }

        let pivot = median_of_nine(provider, range, fdepth);

        let (lt_end, gt_start) = three_way_partition(provider, range, fdepth, pivot);

        if let Some(ref mut l) = lcp {
            if lt_end > 0 {
                l[base + lt_end] = fdepth;
            }
            if gt_start < flen {
                l[base + gt_start] = fdepth;
            }
        }

        if gt_start < flen {
            stack.push(Frame {
                off: foff + gt_start,
                len: flen - gt_start,
                depth: fdepth,
            });
        }
        if lt_end < gt_start {
            // Equal partition: keys matched at this depth, recurse deeper.
            stack.push(Frame {
                off: foff + lt_end,
                len: gt_start - lt_end,
                depth: fdepth + 8,
            });
        }
        if lt_end > 0 {
            stack.push(Frame {
                off: foff,
                len: lt_end,
                depth: fdepth,
            });
        }
    }
}

/// Picks a pivot key from 9 sampled positions (evenly spread across the
/// range, the classic Bentley-McIlroy ninther) and returns its median.
fn median_of_nine<T: KeyAccessor + ?Sized>(provider: &T, range: &[usize], depth: usize) -> u64 {
    let n = range.len();
    if n < 9 {
        let mid = n / 2;
        return provider.get_u64(range[mid], depth);
    }
    let step = n / 8;
    let mut samples: Vec<u64> = (0..9)
        .map(|k| provider.get_u64(range[(k * step).min(n - 1)], depth))
        .collect();
    samples.sort_unstable();
    samples[4]
}

/// Dutch-national-flag 3-way partition on `get_u64(_, depth)` against
/// `pivot`. Returns `(lt_end, gt_start)`: `range[..lt_end]` is `< pivot`,
/// `range[lt_end..gt_start]` is `== pivot`, `range[gt_start..]` is `>
/// pivot`.
fn three_way_partition<T: KeyAccessor + ?Sized>(
    provider: &T,
    range: &mut [usize],
    depth: usize,
    pivot: u64,
) -> (usize, usize) {
    let mut lt = 0usize;
    let mut i = 0usize;
    let mut gt = range.len();

    while i < gt {
        let key = provider.get_u64(range[i], depth);
        match key.cmp(&pivot) {
            Ordering::Less => {
                range.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                range.swap(i, gt);
            }
            Ordering::Equal => {
                i += 1;
            }
        }
    }
    (lt, gt)
}

/// Plain insertion sort, stable enough in practice for the tiny ranges it
/// runs on, comparing with [`compare_full`] (which falls through to the
/// full byte strings once the cached word ties).
fn insertion_sort<T: KeyAccessor + ?Sized>(
    provider: &T,
    range: &mut [usize],
    mut lcp: Option<&mut [usize]>,
    depth: usize,
) {
    for i in 1..range.len() {
        let mut j = i;
        while j > 0 {
            let key_a = provider.get_u64(range[j - 1], depth);
            let key_b = provider.get_u64(range[j], depth);
            if compare_full(provider, range[j - 1], range[j], depth, key_a, key_b) != Ordering::Greater
            {
                break;
            }
            range.swap(j - 1, j);
            j -= 1;
        }
    }
    if let Some(ref mut l) = lcp {
        for i in 1..range.len() {
            let key_a = provider.get_u64(range[i - 1], depth);
            let key_b = provider.get_u64(range[i], depth);
            let local = crate::core::lcp_of(key_a, key_b) as usize;
            l[i] = if local < 8 {
                depth + local
            } else {
                full_lcp_from(provider, range[i - 1], range[i], depth + 8)
            };
        }
    }
}
