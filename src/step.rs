//! The parallel sample-sort step: sampling, counting, distributing, and
//! recursing, run across the worker pool rather than on one thread.
//!
//! One call to [`run`] drives a whole sort: it owns the root
//! [`ShadowBundle`], builds the [`JobQueue`] and its worker threads inside
//! a [`std::thread::scope`], and pushes the root range as the first job.
//! Every job popped off the queue is a range still above
//! [`crate::config::Config::seq_ss_thresh`]; once a range shrinks below
//! that, the job hands it to [`crate::smallsort::sort_seq`] and returns
//! instead of pushing children. The buckets one step produces are what get
//! parallelized — each becomes its own job, picked up by whichever worker
//! goes idle next — which is where this algorithm gets its scalability
//! from; classification itself is cheap enough per step to run in one
//! parallel pass over chunks, with counting and the final scatter done in
//! a single sequential pass since neither is the bottleneck at the sizes
//! this step runs on.

use crate::bundle::ShadowBundle;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::core::KeyAccessor;
use crate::queue::JobQueue;
use crate::smallsort::sort_seq;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs a full parallel sort of `active` (the caller-visible permutation
/// buffer) against `provider`, writing into `lcp`/`cache` if given.
pub(crate) fn run<T: KeyAccessor + Sync + ?Sized>(
    provider: &T,
    active: &mut [usize],
    lcp: Option<&mut [usize]>,
    cache: Option<&mut [u8]>,
    config: &Config,
) {
    let len = active.len();
    if len <= 1 {
        return;
    }
    let mut shadow = vec![0usize; len];
    let mut lcp = lcp;
    let mut cache = cache;
    let threads = config.resolved_threads().max(1);
    let seed_source = AtomicU64::new(0x9E3779B97F4A7C15);

    log::debug!("sort step start: n={len} threads={threads} seq_ss_thresh={}", config.seq_ss_thresh);

    {
        let root = ShadowBundle::root(&mut *active, &mut shadow, lcp.as_deref_mut(), cache.as_deref_mut());

        if threads <= 1 || len < config.seq_ss_thresh {
            log::trace!("n={len} below parallel threshold, running sequential sample sort directly");
            sort_seq(provider, root, config, seed_source.load(Ordering::Relaxed), None);
        } else {
            let (queue, deques) = JobQueue::new(threads);
            let queue_ref = &queue;
            let seed_source_ref = &seed_source;

            std::thread::scope(|scope| {
                queue_ref.push(Box::new(move |q: &JobQueue<'_>| {
                    step_range(provider, root, 0, config, seed_source_ref, q);
                }));
                for (i, deque) in deques.iter().enumerate() {
                    scope.spawn(move || queue_ref.run_worker(i, deque));
                }
            });
        }
    }

    // Every bucket boundary within one sample-sort/MKQS level is filled in
    // as classification happens (cheap: either the classifier's own
    // splitter LCP byte, or a direct comparison of two already-adjacent
    // elements). But a bucket that recurses further is handed off as its
    // own job, scheduled in no particular order relative to its siblings —
    // so the boundary between one bucket's last element and the next
    // bucket's first is only knowable once both sides have actually
    // finished sorting, which the job queue doesn't signal back up. Rather
    // than thread a completion-callback tree through the scheduler to
    // reconstruct that ordering, recompute every boundary directly from the
    // now-fully-sorted output: one more linear pass, dominated by 8-byte
    // comparisons, negligible next to the sort itself.
    if let Some(lcp_slice) = lcp.as_deref_mut() {
        finalize_lcp(provider, active, lcp_slice);
    }
}

/// Recomputes `lcp[1..]` directly from the final sorted permutation,
/// independent of whatever order buckets finished in.
fn finalize_lcp<T: KeyAccessor + Sync + ?Sized>(provider: &T, active: &[usize], lcp: &mut [usize]) {
    for i in 1..active.len() {
        lcp[i] = crate::core::lcp_len(provider, active[i - 1], active[i]);
    }
}

/// Processes one range at `depth`: classifies, counts, and distributes its
/// elements, then pushes every resulting non-empty bucket back onto the
/// queue as its own job. Recursion happens entirely through job creation —
/// there is no call-stack recursion in this module.
fn step_range<'a, T: KeyAccessor + Sync + ?Sized>(
    provider: &'a T,
    bundle: ShadowBundle<'a>,
    depth: usize,
    config: &'a Config,
    seed_source: &'a AtomicU64,
    queue: &JobQueue<'a>,
) {
    let len = bundle.size();
    if len <= config.seq_ss_thresh {
        log::trace!("step_range: n={len} depth={depth} at or below seq_ss_thresh, handing to sort_seq");
        let seed = seed_source.fetch_add(0x632BE59BD9B4E019, Ordering::Relaxed);
        sort_seq(provider, bundle, config, seed, Some(queue));
        return;
    }

    let ns = classifier_size(len, config);
    let seed = seed_source.fetch_add(0x632BE59BD9B4E019, Ordering::Relaxed);
    let classifier = Classifier::build(provider, bundle.active(), depth, ns, seed);
    let bucket_count = classifier.bucket_count();
    log::trace!("step_range: n={len} depth={depth} ns={ns} buckets={bucket_count}");

    // Classify phase: independent per element, so it's split into chunks
    // and run across scoped threads. `bucket_of` is chunked the same way
    // `active` is, so every thread writes a disjoint slice — no
    // synchronization needed.
    let mut bucket_of = vec![0u32; len];
    let worker_budget = config.maxprocs.min(queue.worker_count()).max(1);
    let chunk_len = len.div_ceil(worker_budget.min(len).max(1));
    {
        let active = bundle.active();
        let in_chunks = active.chunks(chunk_len);
        let out_chunks = bucket_of.chunks_mut(chunk_len);
        std::thread::scope(|scope| {
            for (in_chunk, out_chunk) in in_chunks.zip(out_chunks) {
                let classifier = &classifier;
                scope.spawn(move || {
                    for (dst, &idx) in out_chunk.iter_mut().zip(in_chunk.iter()) {
                        let key = provider.get_u64(idx, depth);
                        *dst = classifier.classify(key) as u32;
                    }
                });
            }
        });
    }

    // Counting phase.
    let mut counts = vec![0usize; bucket_count];
    for &b in &bucket_of {
        counts[b as usize] += 1;
    }
    if counts.iter().any(|&c| c == len) {
        // Degenerate sample: no separation at all. Don't loop forever
        // re-sampling the same range.
        log::debug!("step_range: n={len} depth={depth} degenerate classification, falling back to sort_seq");
        let seed = seed_source.fetch_add(0x632BE59BD9B4E019, Ordering::Relaxed);
        sort_seq(provider, bundle, config, seed, Some(queue));
        return;
    }
    let mut starts = vec![0usize; bucket_count + 1];
    for b in 0..bucket_count {
        starts[b + 1] = starts[b] + counts[b];
    }

    // Distribute phase: scatter into the shadow buffer by bucket.
    let mut bundle = bundle.flip();
    {
        let mut cursor = starts.clone();
        let active_snapshot: Vec<usize> = bundle.active().to_vec();
        let shadow = bundle.shadow_mut();
        for (local_i, &idx) in active_snapshot.iter().enumerate() {
            let b = bucket_of[local_i] as usize;
            shadow[cursor[b]] = idx;
            cursor[b] += 1;
        }
    }
    bundle.copy_back();

    // Record each equal bucket's LCP-skip byte before handing pieces off
    // (the sub-bundles below no longer have access to `classifier`).
    for b in (1..bucket_count).step_by(2) {
        if counts[b] > 1 {
            let skip = (classifier.lcp_byte[b / 2] & 0x7F) as usize;
            bundle.set_lcp(starts[b], depth + skip);
        }
    }

    if config.single_step {
        // Benchmark mode: stop after classifying and distributing the top
        // level. Buckets are left internally unsorted — this deliberately
        // does not produce a valid sort, it exists to let a caller time the
        // sample/count/distribute phases in isolation.
        log::debug!("step_range: n={len} depth={depth} single_step set, not recursing into buckets");
        return;
    }

    // Carve the range into per-bucket sub-bundles (front to back) and
    // push each non-empty one as an independent job.
    let mut remaining = bundle;
    for b in 0..bucket_count {
        let blen = counts[b];
        if blen == 0 {
            continue;
        }
        let (this_bucket, rest) = remaining.split_at_mut(blen);
        remaining = rest;
        let child_depth = if b % 2 == 1 {
            depth + 8
        } else {
            depth + (classifier.lcp_byte[b / 2] & 0x7F) as usize
        };
        log::trace!("step_range: pushing bucket {b} (n={blen}, depth={child_depth}) as a job");
        queue.push(Box::new(move |q: &JobQueue<'a>| {
            step_range(provider, this_bucket, child_depth, config, seed_source, q);
        }));
    }
}

fn classifier_size(len: usize, config: &Config) -> usize {
    let bits = config.classifier_bits();
    let ns = (1usize << bits) - 1;
    ns.min((len / 4).max(1))
}
