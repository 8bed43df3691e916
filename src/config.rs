//! Build-time tunables for the sorter.
//!
//! These are the "recognized build-time options" of the sorter: cross-over
//! points between the three sequential sort strategies, the cache budget
//! that sizes the classifier tree, and the worker fan-out cap. They are
//! ordinary runtime-configurable fields (not `cfg!`/feature flags) collected
//! into one [`Config`] so call sites can override a threshold without
//! threading five separate arguments through the recursion.

/// Cross-over from sequential in-place sample sort to MKQS, in elements.
pub const SEQ_SS_THRESH: usize = 1 << 20; // 1 Mi strings

/// Cross-over from MKQS/sample sort to insertion sort, in elements.
pub const INSSORT_THRESH: usize = 32;

/// Assumed L2 cache budget used to size the classifier tree. See
/// [`Config::classifier_bits`].
pub const L2_CACHE: usize = 256 * 1024;

/// Upper bound on the number of parallel partitions a single sample-sort
/// step will fan out to, regardless of input size or thread count.
pub const MAXPROCS: usize = 129;

/// Benchmark-only mode: run a single sample-sort level and stop.
pub const SINGLE_STEP: bool = false;

/// Per-call configuration, defaulting to the constants above.
///
/// Cloned cheaply (it is `Copy`) and threaded down through the recursion
/// read-only; nothing below the root ever mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// See [`SEQ_SS_THRESH`].
    pub seq_ss_thresh: usize,
    /// See [`INSSORT_THRESH`].
    pub inssort_thresh: usize,
    /// See [`L2_CACHE`].
    pub l2_cache: usize,
    /// See [`MAXPROCS`].
    pub maxprocs: usize,
    /// See [`SINGLE_STEP`].
    pub single_step: bool,
    /// Number of worker threads to run the job queue with. `0` means "use
    /// [`std::thread::available_parallelism`]".
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seq_ss_thresh: SEQ_SS_THRESH,
            inssort_thresh: INSSORT_THRESH,
            l2_cache: L2_CACHE,
            maxprocs: MAXPROCS,
            single_step: SINGLE_STEP,
            threads: 0,
        }
    }
}

impl Config {
    /// Resolves [`Config::threads`] against the host, honoring an explicit
    /// override.
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Number of splitters `NS = 2^B - 1` such that the splitter array (one
    /// `u64` key + one `u8` LCP byte each) plus the `2*NS+1` bucket count
    /// vector (one `u64` each, per partition) fit in [`Config::l2_cache`].
    ///
    /// `B` is clamped to `[2, 8]`: fewer than 4 buckets defeats the purpose
    /// of sampling, and more than 255 splitters would overflow the `u8`
    /// bucket-index arithmetic used by the classifier.
    pub fn classifier_bits(&self) -> u32 {
        let budget = self.l2_cache;
        let mut b = 8u32;
        while b > 2 {
            let ns = (1usize << b) - 1;
            let tree_bytes = ns * (std::mem::size_of::<u64>() + 1);
            let bucket_bytes = (2 * ns + 1) * std::mem::size_of::<u64>();
            if tree_bytes + bucket_bytes <= budget {
                break;
            }
            b -= 1;
        }
        b
    }

    /// Oversampling factor used to draw splitter candidates: `M = 2 * NS`.
    pub fn oversample(&self, ns: usize) -> usize {
        2 * ns
    }
}
