//! # pssort
//!
//! `pssort` is a parallel, cache-aware string sorter: Super Scalar String
//! Sample Sort (pS5). It scales from one thread to many by recursively
//! splitting the input against a cache-resident classifier tree built from
//! random samples, falling back to multi-key quicksort and insertion sort
//! once a partition is small enough that sampling stops paying for itself.
//!
//! ## Key Features
//!
//! - **Cache-resident classification**: each recursion level samples a
//!   handful of keys, builds a small balanced tree of splitters sized to
//!   fit L2, and classifies every element against it with no more than a
//!   few branches and no pointer chasing.
//! - **Inline LCP output**: [`sort_lcp`] and [`sort_lcp_cache_out`] recover
//!   the longest-common-prefix of each output element with its predecessor
//!   essentially for free, as a byproduct of the classifier's own
//!   bookkeeping, rather than as a second full pass.
//! - **Zero-copy abstraction**: the [`KeyAccessor`] trait lets you sort
//!   anything that can hand back a byte-string view per index (`Vec<Vec<u8>>`,
//!   `VecDeque<String>`, an Arrow-style offsets buffer) without copying the
//!   underlying data. `[T: AsRef<[u8]>]` and its owning collections get a
//!   blanket impl.
//! - **Work-stealing parallelism**: a [`std::thread::scope`]-scoped pool of
//!   workers shares one job queue; a worker that runs dry steals from a
//!   sibling rather than the pool going idle while work sits elsewhere.
//!
//! ## Usage
//!
//! ### Sorting in place
//!
//! ```rust
//! use pssort::sort;
//!
//! let mut data = vec!["banana", "apple", "cherry", "date"];
//! sort(&mut data);
//!
//! assert_eq!(data, vec!["apple", "banana", "cherry", "date"]);
//! ```
//!
//! ### Sorting without moving the input, with LCPs
//!
//! ```rust
//! use pssort::sort_lcp;
//!
//! let data = vec!["banana", "apple", "cherry", "date"];
//! let mut out = vec![0usize; data.len()];
//! let mut lcp = vec![0usize; data.len()];
//! sort_lcp(&data, &mut out, &mut lcp);
//!
//! assert_eq!(out, vec![1, 0, 2, 3]); // apple, banana, cherry, date
//! ```
//!
//! ### Custom types
//!
//! To sort custom types or complex data structures without creating
//! intermediate strings, implement [`KeyAccessor`] directly.
//!
//! ```rust
//! use pssort::{sort_out, KeyAccessor};
//!
//! struct User {
//!     username: String,
//! }
//!
//! // Wrapper struct to avoid orphan-rule violation (impl foreign trait on
//! // a foreign type).
//! struct Users(Vec<User>);
//!
//! impl KeyAccessor for Users {
//!     fn get_key(&self, index: usize) -> &[u8] {
//!         self.0[index].username.as_bytes()
//!     }
//!
//!     fn len(&self) -> usize {
//!         self.0.len()
//!     }
//! }
//!
//! let users = Users(vec![
//!     User { username: "Bob".to_string() },
//!     User { username: "Alice".to_string() },
//! ]);
//!
//! let mut out = vec![0usize; users.len()];
//! sort_out(&users, &mut out);
//! assert_eq!(out, vec![1, 0]); // Alice, Bob
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Best case**: close to linear in the total byte length of the input
//!   when keys separate early (short shared prefixes).
//! - **Worst case**: `O(n log n)` comparisons, same asymptotic bound as
//!   any comparison sort, with the constant factor dominated by how many
//!   levels of classification a pathological shared prefix forces.
//! - **Memory overhead**: one `usize` permutation index per element plus a
//!   same-sized shadow buffer; the classifier tree and per-partition
//!   bucket counts are sized to fit the configured L2 budget and are
//!   transient per recursion level.

pub mod algo;
mod bundle;
mod classifier;
pub mod config;
pub mod core;
pub mod error;
mod mkqs;
pub mod numa;
mod queue;
mod smallsort;
mod step;

pub use algo::{
    sort, sort_lcp, sort_lcp_cache_out, sort_lcp_cache_out_with_config, sort_lcp_with_config,
    sort_numa, sort_numa_with_config, sort_out, sort_out_with_config, sort_with_config,
};
pub use config::Config;
pub use core::KeyAccessor;
pub use numa::{LocalityHint, NoLocality};

pub mod prelude {
    pub use crate::algo::{
        sort, sort_lcp, sort_lcp_cache_out, sort_lcp_cache_out_with_config, sort_lcp_with_config,
        sort_numa, sort_numa_with_config, sort_out, sort_out_with_config, sort_with_config,
    };
    pub use crate::config::Config;
    pub use crate::core::KeyAccessor;
    pub use crate::numa::{LocalityHint, NoLocality};
}
