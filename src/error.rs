//! Error taxonomy.
//!
//! This crate has no `Result`-returning entry points. Sorting a sequence
//! of byte strings cannot fail for any reason intrinsic to the data —
//! there is no encoding to reject, no I/O to fail, no parse to get wrong.
//! The only ways a call can go wrong are programmer errors at the call
//! site, and those are contract violations, not runtime conditions a
//! caller should be asked to handle with a `match`. They're documented
//! here rather than modeled as a type:
//!
//! - **Mismatched buffer lengths.** [`crate::sort_out`]'s `out` and
//!   [`crate::sort_lcp`]'s `lcp` parameters must have the same length as
//!   the input. A mismatch is a `debug_assert!` in the constructor
//!   ([`crate::bundle::ShadowBundle::root`]); release builds skip the
//!   check rather than pay for it on every call, consistent with this
//!   crate's `panic = "abort"` release profile treating any reachable
//!   panic as a process-ending bug, not a recoverable error.
//! - **`KeyAccessor` implementations that lie.** If `get_key` returns
//!   different bytes for the same index across two calls within one sort,
//!   or `len()` doesn't match the number of indices actually reachable,
//!   the result is an unspecified permutation, not a panic — this crate
//!   has no way to detect it and makes no attempt to.
//! - **Empty and singleton inputs.** Not errors: every public entry point
//!   treats `len() <= 1` as already sorted and returns immediately.
//! - **Thread spawn failure.** [`std::thread::scope`] aborts the process
//!   if the underlying OS thread spawn fails; this crate doesn't
//!   second-guess that by adding its own fallback path, since a host that
//!   can't spawn threads can't usefully run a parallel sort either.
//!
//! Nothing in this module is a type; it exists so the policy above has one
//! place to live and be linked from doc comments, rather than being
//! repeated at every `debug_assert!` call site.
