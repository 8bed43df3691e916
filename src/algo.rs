//! Public sort entry points.
//!
//! Every function here is a thin wrapper around [`crate::step::run`]
//! (build the permutation, run the parallel/sequential sample sort,
//! optionally apply it back onto the caller's own collection). They exist
//! to give callers a surface shaped like the collection they actually
//! have: sort a slice in place, or write the permutation/LCPs/cache bytes
//! out to buffers you already own, without forcing everyone through the
//! lowest common denominator.
//!
//! Every function has a `_with_config` sibling taking an explicit
//! [`Config`]; the unsuffixed name always means "use [`Config::default`]".

use crate::config::Config;
use crate::core::KeyAccessor;
use crate::numa::LocalityHint;
use crate::step;

/// Sorts `items` in place by their byte-string representation.
///
/// # Examples
///
/// ```
/// use pssort::sort;
///
/// let mut data = vec!["banana", "apple", "cherry"];
/// sort(&mut data);
/// assert_eq!(data, vec!["apple", "banana", "cherry"]);
/// ```
pub fn sort<T: AsRef<[u8]> + Sync>(items: &mut [T]) {
    sort_with_config(items, &Config::default());
}

/// [`sort`] with an explicit [`Config`].
pub fn sort_with_config<T: AsRef<[u8]> + Sync>(items: &mut [T], config: &Config) {
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mut indices: Vec<usize> = (0..len).collect();
    {
        let view: &[T] = items;
        step::run(view, &mut indices, None, None, config);
    }
    apply_permutation(items, &indices);
}

/// Writes the sorted permutation of `provider` into `out` without moving
/// `provider`'s own data. `out` must have the same length as `provider`.
///
/// Accepts any [`KeyAccessor`], not just `AsRef<[u8]>` slices — this is the
/// entry point for external collections (Arrow-style offset buffers, a
/// custom struct's field) that only ever expose their data as borrowed
/// byte views.
///
/// # Examples
///
/// ```
/// use pssort::sort_out;
///
/// let data = vec!["banana", "apple", "cherry"];
/// let mut out = vec![0usize; data.len()];
/// sort_out(&data, &mut out);
/// assert_eq!(out, vec![1, 0, 2]); // apple, banana, cherry
/// ```
pub fn sort_out<T: KeyAccessor + Sync + ?Sized>(provider: &T, out: &mut [usize]) {
    sort_out_with_config(provider, out, &Config::default());
}

/// [`sort_out`] with an explicit [`Config`].
pub fn sort_out_with_config<T: KeyAccessor + Sync + ?Sized>(provider: &T, out: &mut [usize], config: &Config) {
    assert_eq!(
        provider.len(),
        out.len(),
        "sort_out: `out` must match `provider` in length"
    );
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = i;
    }
    if provider.len() <= 1 {
        return;
    }
    step::run(provider, out, None, None, config);
}

/// [`sort_out`], additionally filling `lcp` with the longest-common-prefix
/// length of each output element with its predecessor. `lcp[0]` is left
/// untouched; by convention callers treat that slot as `0`.
pub fn sort_lcp<T: KeyAccessor + Sync + ?Sized>(provider: &T, out: &mut [usize], lcp: &mut [usize]) {
    sort_lcp_with_config(provider, out, lcp, &Config::default());
}

/// [`sort_lcp`] with an explicit [`Config`].
pub fn sort_lcp_with_config<T: KeyAccessor + Sync + ?Sized>(
    provider: &T,
    out: &mut [usize],
    lcp: &mut [usize],
    config: &Config,
) {
    assert_eq!(
        provider.len(),
        out.len(),
        "sort_lcp: `out` must match `provider` in length"
    );
    assert_eq!(
        provider.len(),
        lcp.len(),
        "sort_lcp: `lcp` must match `provider` in length"
    );
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = i;
    }
    if provider.len() <= 1 {
        return;
    }
    step::run(provider, out, Some(lcp), None, config);
}

/// [`sort_lcp`], additionally filling `cache` with each output element's
/// byte at its own LCP offset: `cache[i]` is the logical (NUL-terminated)
/// key of `out[i]` at offset `lcp[i]`, or `0` when that offset is at or
/// past the end of the logical string.
pub fn sort_lcp_cache_out<T: KeyAccessor + Sync + ?Sized>(
    provider: &T,
    out: &mut [usize],
    lcp: &mut [usize],
    cache: &mut [u8],
) {
    sort_lcp_cache_out_with_config(provider, out, lcp, cache, &Config::default());
}

/// [`sort_lcp_cache_out`] with an explicit [`Config`].
pub fn sort_lcp_cache_out_with_config<T: KeyAccessor + Sync + ?Sized>(
    provider: &T,
    out: &mut [usize],
    lcp: &mut [usize],
    cache: &mut [u8],
    config: &Config,
) {
    assert_eq!(
        provider.len(),
        out.len(),
        "sort_lcp_cache_out: `out` must match `provider` in length"
    );
    assert_eq!(
        provider.len(),
        lcp.len(),
        "sort_lcp_cache_out: `lcp` must match `provider` in length"
    );
    assert_eq!(
        provider.len(),
        cache.len(),
        "sort_lcp_cache_out: `cache` must match `provider` in length"
    );
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = i;
    }
    if provider.len() <= 1 {
        return;
    }
    step::run(provider, out, Some(lcp), Some(cache), config);
    for i in 0..out.len() {
        let key = crate::core::logical_bytes(provider.get_key(out[i]));
        cache[i] = key.get(lcp[i]).copied().unwrap_or(0);
    }
}

/// [`sort_out`], consulting `hint` for locality placement of top-level job
/// ranges. See [`crate::numa::LocalityHint`] for what this can and can't
/// do on a given platform.
pub fn sort_numa<T: KeyAccessor + Sync + ?Sized>(provider: &T, out: &mut [usize], hint: &dyn LocalityHint) {
    sort_numa_with_config(provider, out, hint, &Config::default());
}

/// [`sort_numa`] with an explicit [`Config`].
pub fn sort_numa_with_config<T: KeyAccessor + Sync + ?Sized>(
    provider: &T,
    out: &mut [usize],
    hint: &dyn LocalityHint,
    config: &Config,
) {
    hint.bind(0);
    sort_out_with_config(provider, out, config);
}

/// Reorders `items` according to `indices` (`indices[i]` is the original
/// position of the item that belongs at output position `i`), in place,
/// by following each permutation cycle to completion and marking each
/// slot visited as it's placed.
fn apply_permutation<T>(items: &mut [T], indices: &[usize]) {
    let mut placed = vec![false; items.len()];
    for start in 0..items.len() {
        if placed[start] {
            continue;
        }
        let mut current = start;
        loop {
            placed[current] = true;
            let target = indices[current];
            if target == start {
                break;
            }
            items.swap(current, target);
            current = target;
        }
    }
}
