//! The shadow/output/LCP pointer bundle.
//!
//! A [`ShadowBundle`] ties together the two permutation-index buffers a
//! sample-sort step works with (the "active" buffer it reads from and the
//! "shadow" buffer it distributes into), plus the optional LCP and
//! cached-character output arrays. Both index buffers hold positions into
//! the caller's original string collection — the bundle never touches the
//! strings themselves, only where each one currently sits.
//!
//! Every level of recursion either keeps working on the buffer it was
//! handed (sequential sort, in place) or flips active/shadow roles (one
//! parallel distribute pass). [`ShadowBundle::copy_back`] is what makes
//! that invisible to the caller: whichever buffer ends up holding the
//! final order, its contents are copied into the caller-visible one if it
//! isn't already that one.

/// A borrowed sub-range of the root bundle. Every `sub`/`flip` call below
/// narrows or re-rolls this without ever reallocating.
pub(crate) struct ShadowBundle<'a> {
    active: &'a mut [usize],
    shadow: &'a mut [usize],
    lcp: Option<&'a mut [usize]>,
    cache: Option<&'a mut [u8]>,
    /// Absolute offset of this sub-range within the root-sized LCP/cache
    /// arrays, used only to protect global position 0 from ever being
    /// written (its LCP is defined to be untouched by the sorter).
    abs_offset: usize,
    /// `true` while `active` is the buffer the caller will ultimately read
    /// results from.
    active_is_primary: bool,
}

impl<'a> ShadowBundle<'a> {
    /// Builds the root bundle. `active` starts as the caller-visible
    /// buffer; `shadow` is pure scratch space of equal length.
    pub(crate) fn root(
        active: &'a mut [usize],
        shadow: &'a mut [usize],
        lcp: Option<&'a mut [usize]>,
        cache: Option<&'a mut [u8]>,
    ) -> Self {
        debug_assert_eq!(active.len(), shadow.len());
        if let Some(ref l) = lcp {
            debug_assert_eq!(l.len(), active.len());
        }
        if let Some(ref c) = cache {
            debug_assert_eq!(c.len(), active.len());
        }
        ShadowBundle {
            active,
            shadow,
            lcp,
            cache,
            abs_offset: 0,
            active_is_primary: true,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn active(&self) -> &[usize] {
        self.active
    }

    pub(crate) fn active_mut(&mut self) -> &mut [usize] {
        self.active
    }

    pub(crate) fn shadow_mut(&mut self) -> &mut [usize] {
        self.shadow
    }

    /// Splits into two adjacent sub-bundles at `mid` (used when a worker
    /// peels a prefix off its own range, e.g. to hand the rest to another
    /// job without touching what it's already committed to).
    pub(crate) fn split_at_mut(self, mid: usize) -> (ShadowBundle<'a>, ShadowBundle<'a>) {
        let abs_offset = self.abs_offset;
        let active_is_primary = self.active_is_primary;
        let (active_l, active_r) = self.active.split_at_mut(mid);
        let (shadow_l, shadow_r) = self.shadow.split_at_mut(mid);
        let (lcp_l, lcp_r) = match self.lcp {
            Some(l) => {
                let (a, b) = l.split_at_mut(mid);
                (Some(a), Some(b))
            }
            None => (None, None),
        };
        let (cache_l, cache_r) = match self.cache {
            Some(c) => {
                let (a, b) = c.split_at_mut(mid);
                (Some(a), Some(b))
            }
            None => (None, None),
        };
        (
            ShadowBundle {
                active: active_l,
                shadow: shadow_l,
                lcp: lcp_l,
                cache: cache_l,
                abs_offset,
                active_is_primary,
            },
            ShadowBundle {
                active: active_r,
                shadow: shadow_r,
                lcp: lcp_r,
                cache: cache_r,
                abs_offset: abs_offset + mid,
                active_is_primary,
            },
        )
    }

    /// Narrows to `[off, off+len)`, keeping active/shadow roles.
    pub(crate) fn sub(self, off: usize, len: usize) -> ShadowBundle<'a> {
        debug_assert!(off + len <= self.active.len());
        let active_is_primary = self.active_is_primary;
        let abs_offset = self.abs_offset + off;
        let active = &mut self.active[off..off + len];
        let shadow = &mut self.shadow[off..off + len];
        let lcp = self.lcp.map(|l| &mut l[off..off + len]);
        let cache = self.cache.map(|c| &mut c[off..off + len]);
        ShadowBundle {
            active,
            shadow,
            lcp,
            cache,
            abs_offset,
            active_is_primary,
        }
    }

    /// Swaps active/shadow roles over this same range (what a parallel
    /// distribute pass does: it reads `active`, writes `shadow`, and the
    /// result for this range now lives in what was `shadow`).
    pub(crate) fn flip(mut self) -> ShadowBundle<'a> {
        std::mem::swap(&mut self.active, &mut self.shadow);
        self.active_is_primary = !self.active_is_primary;
        self
    }

    /// Ensures the sorted region named by `active` ends up in the
    /// caller-visible buffer, copying if a flip left it in `shadow`.
    pub(crate) fn copy_back(&mut self) {
        if !self.active_is_primary {
            self.shadow.copy_from_slice(self.active);
        }
    }

    pub(crate) fn set_lcp(&mut self, local_i: usize, v: usize) {
        if self.abs_offset + local_i == 0 {
            return;
        }
        if let Some(ref mut lcp) = self.lcp {
            lcp[local_i] = v;
        }
    }

    pub(crate) fn set_cache(&mut self, local_i: usize, c: u8) {
        if let Some(ref mut cache) = self.cache {
            cache[local_i] = c;
        }
    }

    /// Broadcasts `d` to every LCP slot in this range, except global
    /// position 0.
    pub(crate) fn fill_lcp(&mut self, d: usize) {
        let start = if self.abs_offset == 0 { 1 } else { 0 };
        if let Some(ref mut lcp) = self.lcp {
            for slot in lcp.iter_mut().skip(start) {
                *slot = d;
            }
        }
    }

    pub(crate) fn has_lcp(&self) -> bool {
        self.lcp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_roles_and_copy_back_fixes_up() {
        let mut buf_a = vec![0usize, 1, 2, 3];
        let mut buf_b = vec![9usize, 9, 9, 9];
        let mut bundle = ShadowBundle::root(&mut buf_a, &mut buf_b, None, None);
        bundle.active_mut().copy_from_slice(&[3, 2, 1, 0]);
        let mut bundle = bundle.flip();
        bundle.active_mut().copy_from_slice(&[0, 1, 2, 3]);
        bundle.copy_back();
        drop(bundle);
        assert_eq!(buf_a, vec![0, 1, 2, 3]);
    }

    #[test]
    fn fill_lcp_skips_global_zero() {
        let mut buf_a = vec![0usize; 4];
        let mut buf_b = vec![0usize; 4];
        let mut lcp = vec![99usize; 4];
        let mut bundle = ShadowBundle::root(&mut buf_a, &mut buf_b, Some(&mut lcp), None);
        bundle.fill_lcp(5);
        drop(bundle);
        assert_eq!(lcp, vec![99, 5, 5, 5]);
    }

    #[test]
    fn sub_range_tracks_absolute_offset() {
        let mut buf_a = vec![0usize; 6];
        let mut buf_b = vec![0usize; 6];
        let mut lcp = vec![7usize; 6];
        let bundle = ShadowBundle::root(&mut buf_a, &mut buf_b, Some(&mut lcp), None);
        let mut sub = bundle.sub(2, 3);
        sub.fill_lcp(11); // sub doesn't contain global index 0, nothing skipped
        drop(sub);
        assert_eq!(lcp, vec![7, 7, 11, 11, 11, 7]);
    }
}
