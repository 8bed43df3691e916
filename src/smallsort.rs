//! Sequential sample sort: what a parallel sample-sort step calls once a
//! sub-range has shrunk below [`crate::config::Config::seq_ss_thresh`] (or
//! what runs the whole input when it was never above threshold to begin
//! with).
//!
//! Structurally identical to the parallel step in [`crate::step`] —
//! sample, classify, count, distribute, recurse — just run on one thread
//! with an explicit frame stack and a reusable scratch buffer instead of
//! queued jobs and a flipped shadow buffer.

use crate::bundle::ShadowBundle;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::core::{compare_full, full_lcp_from, lcp_of, KeyAccessor};
use crate::mkqs::mkqs_sort;
use crate::queue::JobQueue;
use std::cmp::Ordering;

struct Frame {
    off: usize,
    len: usize,
    depth: usize,
}

/// Sorts `bundle.active()` in place, writing LCPs (if the bundle carries
/// an LCP array) and cache bytes (if it carries a cache array) as it goes.
///
/// `seed` seeds every classifier built along the way; callers pass a
/// distinct seed per top-level call so repeated sorts of unrelated inputs
/// don't always draw identical samples, without needing the sort itself to
/// be anything but deterministic for a fixed seed.
pub(crate) fn sort_seq<T: KeyAccessor + ?Sized>(
    provider: &T,
    mut bundle: ShadowBundle<'_>,
    config: &Config,
    seed: u64,
    queue: Option<&JobQueue<'_>>,
) {
    let root_len = bundle.size();
    let mut stack = vec![Frame {
        off: 0,
        len: root_len,
        depth: 0,
    }];
    let mut seed = seed;
    let mut scratch = vec![0usize; root_len];
    let mut bucket_of = vec![0u32; root_len];

    while let Some(Frame { off, len, depth }) = stack.pop() {
        if len <= 1 {
            continue;
        }
        if len <= config.inssort_thresh {
            insertion_sort_bucket(provider, &mut bundle, off, len, depth);
            continue;
        }

        let ns = max_splitters(len, config.classifier_bits());
        if ns == 0 {
            log::trace!("sort_seq: n={len} depth={depth} too small to sample, falling back to mkqs");
            mkqs_on_bucket(provider, &mut bundle, off, len, depth, config, queue);
            continue;
        }

        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let active_slice = &bundle.active()[off..off + len];
        let classifier = Classifier::build(provider, active_slice, depth, ns, seed);

        let bucket_count = classifier.bucket_count();
        let mut counts = vec![0usize; bucket_count];
        for (local_i, &idx) in active_slice.iter().enumerate() {
            let key = provider.get_u64(idx, depth);
            let b = classifier.classify(key);
            bucket_of[local_i] = b as u32;
            counts[b] += 1;
        }

        if counts.iter().any(|&c| c == len) {
            // Every sample landed in one bucket: the classifier gave us
            // nothing. Don't loop forever re-sampling the same range.
            log::debug!("sort_seq: n={len} depth={depth} degenerate classification, falling back to mkqs");
            mkqs_on_bucket(provider, &mut bundle, off, len, depth, config, queue);
            continue;
        }

        let mut starts = vec![0usize; bucket_count + 1];
        for b in 0..bucket_count {
            starts[b + 1] = starts[b] + counts[b];
        }
        let mut cursor = starts.clone();

        {
            let active = &bundle.active()[off..off + len];
            for (local_i, &idx) in active.iter().enumerate() {
                let b = bucket_of[local_i] as usize;
                scratch[cursor[b]] = idx;
                cursor[b] += 1;
            }
        }
        bundle.active_mut()[off..off + len].copy_from_slice(&scratch[..len]);

        // Odd (equal) buckets recurse at depth+8, since every member
        // matched its splitter's word exactly. Even buckets recurse at
        // depth + the splitter's LCP-skip byte: the bytes its neighboring
        // splitter already shares with it need not be re-examined.
        for b in (0..bucket_count).rev() {
            let blen = counts[b];
            if blen == 0 {
                continue;
            }
            let boff = off + starts[b];
            if b % 2 == 1 {
                if blen > 1 {
                    let skip = (classifier.lcp_byte[b / 2] & 0x7F) as usize;
                    bundle.set_lcp(boff - off, depth + skip);
                }
                stack.push(Frame {
                    off: boff,
                    len: blen,
                    depth: depth + 8,
                });
            } else {
                let skip = (classifier.lcp_byte[b / 2] & 0x7F) as usize;
                stack.push(Frame {
                    off: boff,
                    len: blen,
                    depth: depth + skip,
                });
            }
        }
    }
}

fn max_splitters(len: usize, classifier_bits: u32) -> usize {
    let ns = (1usize << classifier_bits) - 1;
    // Need at least 2 samples per splitter (the oversampling factor) and
    // more elements than splitters, or classification can't separate
    // anything.
    if len < 4 * ns {
        0
    } else {
        ns
    }
}

fn mkqs_on_bucket<T: KeyAccessor + ?Sized>(
    provider: &T,
    bundle: &mut ShadowBundle<'_>,
    off: usize,
    len: usize,
    depth: usize,
    config: &Config,
    queue: Option<&JobQueue<'_>>,
) {
    let range = &mut bundle.active_mut()[off..off + len];
    mkqs_sort(provider, range, None, 0, len, depth, config.inssort_thresh, queue);
    fill_adjacent_lcp(provider, bundle, off, len, depth);
}

fn insertion_sort_bucket<T: KeyAccessor + ?Sized>(
    provider: &T,
    bundle: &mut ShadowBundle<'_>,
    off: usize,
    len: usize,
    depth: usize,
) {
    let range = &mut bundle.active_mut()[off..off + len];
    for i in 1..range.len() {
        let mut j = i;
        while j > 0 {
            let key_a = provider.get_u64(range[j - 1], depth);
            let key_b = provider.get_u64(range[j], depth);
            if compare_full(provider, range[j - 1], range[j], depth, key_a, key_b) != Ordering::Greater {
                break;
            }
            range.swap(j - 1, j);
            j -= 1;
        }
    }
    fill_adjacent_lcp(provider, bundle, off, len, depth);
}

/// Fills `bundle`'s LCP slots for `[off+1, off+len)` by directly comparing
/// each now-adjacent pair, for the sequential fallbacks that don't produce
/// LCPs of their own (MKQS and insertion sort operate on plain `&mut
/// [usize]` slices with no knowledge of the bundle).
fn fill_adjacent_lcp<T: KeyAccessor + ?Sized>(
    provider: &T,
    bundle: &mut ShadowBundle<'_>,
    off: usize,
    len: usize,
    depth: usize,
) {
    if !bundle.has_lcp() {
        return;
    }
    for local_i in 1..len {
        let a = bundle.active()[off + local_i - 1];
        let b = bundle.active()[off + local_i];
        let key_a = provider.get_u64(a, depth);
        let key_b = provider.get_u64(b, depth);
        let local = lcp_of(key_a, key_b) as usize;
        let value = if local < 8 {
            depth + local
        } else {
            full_lcp_from(provider, a, b, depth + 8)
        };
        bundle.set_lcp(off + local_i, value);
    }
}
