//! The cache-sized classifier tree.
//!
//! An implicit balanced binary search tree of `NS = 2^B - 1` splitters,
//! stored flat (index `0` unused, children of `i` at `2i`/`2i+1`) so the
//! descent loop is a handful of branches with no pointer chasing, and so
//! the whole tree plus the `2*NS+1` per-partition bucket-count vectors fit
//! in the L2 budget from [`crate::config::Config::classifier_bits`].
//!
//! Two addressings coexist here, and keeping them straight is the whole
//! trick of this module:
//! - **Tree position** (`1..=ns`): where a splitter's key lives in the
//!   array the descent loop walks, chosen purely for cache-friendly
//!   access (an in-order/Eytzinger layout).
//! - **Rank** (`0..ns`): the splitter's ordinal position in ascending
//!   sorted order. Bucket numbering, the LCP-skip byte, and the recursion
//!   depth handed to children are all expressed in rank, never in tree
//!   position — a tree node only needs to know its own rank so an
//!   equality hit can report the right bucket.

use crate::core::{is_nul_terminated, lcp_of, KeyAccessor};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

/// A built classifier for one sample-sort step.
pub(crate) struct Classifier {
    ns: usize,
    /// Eytzinger-order splitter keys, length `ns + 1`, index 0 unused.
    tree_keys: Vec<u64>,
    /// Parallel to `tree_keys`: the rank of the splitter stored there.
    tree_rank: Vec<u32>,
    /// Rank-indexed ascending splitter keys, length `ns`.
    pub(crate) splitter_key: Vec<u64>,
    /// Rank-indexed LCP-skip bytes, length `ns + 1`: low 7 bits of entry
    /// `r < ns` = `lcp_of(splitter[r-1], splitter[r])` (`0` for `r == 0`,
    /// there being no lower bound), high bit set iff `splitter[r]` is
    /// NUL-terminated. Entry `ns` is a trailing sentinel (always `0`) for
    /// the "greater than every splitter" bucket, which has no splitter of
    /// its own to carry a skip byte.
    pub(crate) lcp_byte: Vec<u8>,
}

impl Classifier {
    /// Number of splitters.
    pub(crate) fn ns(&self) -> usize {
        self.ns
    }

    /// Number of buckets classification can produce: `2*ns + 1`.
    pub(crate) fn bucket_count(&self) -> usize {
        2 * self.ns + 1
    }

    /// Builds a classifier by sampling `2*ns` random keys at `depth` from
    /// `indices`, an arbitrary non-empty slice of positions into
    /// `provider` (usually the current step's whole range).
    ///
    /// `seed` only needs to vary across sibling calls enough to avoid
    /// always drawing the same samples; it has no correctness obligation
    /// (sample sort tolerates arbitrarily bad splitters, just slower).
    pub(crate) fn build<T: KeyAccessor + ?Sized>(
        provider: &T,
        indices: &[usize],
        depth: usize,
        ns: usize,
        seed: u64,
    ) -> Classifier {
        debug_assert!(ns >= 1);
        let m = 2 * ns;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut samples: Vec<u64> = (0..m)
            .map(|_| {
                let pick = rng.random_range(0..indices.len());
                provider.get_u64(indices[pick], depth)
            })
            .collect();
        samples.sort_unstable();

        // step = m / ns == 2 given the fixed 2x oversampling factor, but
        // written generally in case oversample() ever changes.
        let step = m / ns;
        let offset = step / 2;
        let splitter_key: Vec<u64> = (0..ns).map(|r| samples[offset + r * step]).collect();

        let mut lcp_byte = vec![0u8; ns + 1];
        for r in 0..ns {
            let local = if r == 0 {
                0
            } else {
                lcp_of(splitter_key[r - 1], splitter_key[r])
            };
            let hi = if is_nul_terminated(splitter_key[r]) {
                0x80
            } else {
                0
            };
            lcp_byte[r] = local | hi;
        }
        // lcp_byte[ns] stays 0: the sentinel for the top-open-end bucket,
        // which recurses with no known skip since it has no splitter.

        let mut tree_keys = vec![0u64; ns + 1];
        let mut tree_rank = vec![0u32; ns + 1];
        let mut pos = 0usize;
        fill_eytzinger(&splitter_key, &mut tree_keys, &mut tree_rank, 1, ns, &mut pos);

        Classifier {
            ns,
            tree_keys,
            tree_rank,
            splitter_key,
            lcp_byte,
        }
    }

    /// Classifies `key` into a bucket in `0..bucket_count()`.
    ///
    /// Even buckets (`2*rank`) are "strictly between splitter `rank-1` and
    /// splitter `rank`" (or, for `rank == 0`/`rank == ns`, the open ends);
    /// odd buckets (`2*rank + 1`) are "equal to splitter `rank`".
    #[inline]
    pub(crate) fn classify(&self, key: u64) -> usize {
        let mut i = 1usize;
        loop {
            if i > self.ns {
                break;
            }
            match key.cmp(&self.tree_keys[i]) {
                Ordering::Less => i = 2 * i,
                Ordering::Greater => i = 2 * i + 1,
                Ordering::Equal => return 2 * self.tree_rank[i] as usize + 1,
            }
        }
        let leaf = i - (self.ns + 1);
        2 * leaf
    }
}

/// Fills `tree_keys`/`tree_rank` in Eytzinger order via an in-order
/// traversal of the implicit tree, handing out `sorted` splitters (already
/// ascending) in increasing order as it visits nodes left-to-right.
fn fill_eytzinger(
    sorted: &[u64],
    tree_keys: &mut [u64],
    tree_rank: &mut [u32],
    node: usize,
    ns: usize,
    pos: &mut usize,
) {
    if node > ns {
        return;
    }
    fill_eytzinger(sorted, tree_keys, tree_rank, 2 * node, ns, pos);
    tree_keys[node] = sorted[*pos];
    tree_rank[node] = *pos as u32;
    *pos += 1;
    fill_eytzinger(sorted, tree_keys, tree_rank, 2 * node + 1, ns, pos);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(Vec<Vec<u8>>);
    impl KeyAccessor for Flat {
        fn get_key(&self, index: usize) -> &[u8] {
            &self.0[index]
        }
        fn len(&self) -> usize {
            self.0.len()
        }
    }

    #[test]
    fn classify_matches_sorted_position() {
        let data: Vec<Vec<u8>> = (0u16..500).map(|i| i.to_be_bytes().to_vec()).collect();
        let provider = Flat(data);
        let indices: Vec<usize> = (0..provider.len()).collect();
        let classifier = Classifier::build(&provider, &indices, 0, 15, 42);

        // Every splitter must classify to its own equal bucket.
        for (rank, &key) in classifier.splitter_key.iter().enumerate() {
            assert_eq!(classifier.classify(key), 2 * rank + 1);
        }

        // A key strictly below every splitter goes to bucket 0.
        assert_eq!(classifier.classify(0), 0);

        // A key strictly above every splitter goes to the last bucket.
        let top = u64::MAX;
        assert_eq!(classifier.classify(top), classifier.bucket_count() - 1);
    }

    #[test]
    fn lcp_byte_matches_adjacent_splitters() {
        let data: Vec<Vec<u8>> = (0u16..2000).map(|i| i.to_be_bytes().to_vec()).collect();
        let provider = Flat(data);
        let indices: Vec<usize> = (0..provider.len()).collect();
        let classifier = Classifier::build(&provider, &indices, 0, 31, 7);

        for r in 1..classifier.ns() {
            let expect = lcp_of(classifier.splitter_key[r - 1], classifier.splitter_key[r]);
            assert_eq!(classifier.lcp_byte[r] & 0x7F, expect);
        }
        assert_eq!(classifier.lcp_byte[0] & 0x7F, 0);
    }
}
