//! Shared, NUL-aware ordering helpers for the integration/property/scenario
//! test suites.
//!
//! A string's logical length is the offset of its first zero byte: an
//! embedded NUL terminates it for ordering purposes the same as a physical
//! buffer end, so two rows that agree up to (and including) a shared
//! embedded NUL are logically equal regardless of what bytes follow. Tests
//! that instead lean on plain `Vec<u8>`/byte-slice `Ord` (`<=`, `.sort()`,
//! `slice::cmp`) silently assume no row ever hits that case, and disagree
//! with a NUL-aware sorter's tie-breaking whenever one does. Everything
//! here compares on the logical (NUL-truncated) prefix instead, matching
//! `pssort::logical_bytes`.

use std::cmp::Ordering;

pub fn logical_bytes(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(nul_at) => &bytes[..nul_at],
        None => bytes,
    }
}

pub fn logical_cmp(a: &[u8], b: &[u8]) -> Ordering {
    logical_bytes(a).cmp(logical_bytes(b))
}

pub fn logical_le(a: &[u8], b: &[u8]) -> bool {
    logical_cmp(a, b) != Ordering::Greater
}

pub fn is_permutation_of(out: &[usize], len: usize) -> bool {
    let mut seen = vec![false; len];
    for &i in out {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// Asserts `out` is both a valid permutation of `0..input.len()` and
/// produces a non-decreasing logical key order.
pub fn assert_sorted_permutation<T: AsRef<[u8]>>(input: &[T], out: &[usize]) {
    assert!(is_permutation_of(out, input.len()), "not a permutation");
    for w in out.windows(2) {
        assert!(
            logical_le(input[w[0]].as_ref(), input[w[1]].as_ref()),
            "out of logical order at adjacent output pair"
        );
    }
}

/// Asserts `sorted` is a rearrangement of `original`'s rows (as a
/// multiset) in non-decreasing logical order — for callers that sort a
/// `Vec<Vec<u8>>` in place, where the only oracle available is the rows
/// themselves, not an index permutation.
pub fn assert_is_sorted_rearrangement(original: &[Vec<u8>], sorted: &[Vec<u8>]) {
    assert_eq!(original.len(), sorted.len(), "row count changed");
    let mut want = original.to_vec();
    let mut got = sorted.to_vec();
    want.sort();
    got.sort();
    assert_eq!(got, want, "not a rearrangement of the original rows");
    for w in sorted.windows(2) {
        assert!(logical_le(&w[0], &w[1]), "out of logical order at adjacent output pair");
    }
}
