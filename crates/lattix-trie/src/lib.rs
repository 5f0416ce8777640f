//! A compact double-array trie over byte keys.
//!
//! The trie maps byte sequences to `i32` values using the double-array
//! encoding: two integers per slot (`base`, `check`), where `base` plus a
//! transition label addresses the child slot and `check` points back at the
//! owning parent. Construction is incremental; collisions are resolved by
//! relocating the smaller of the two affected sibling sets.
//!
//! Keys are opaque byte sequences. Callers that store typed keys must
//! serialize them injectively first — two distinct keys that serialize to the
//! same bytes silently alias the same slot, which this crate cannot detect.
//!
//! ```
//! use lattix_trie::DoubleArray;
//!
//! let mut da = DoubleArray::new();
//! da.insert(b"a", 1).unwrap();
//! da.insert(b"ab", 2).unwrap();
//! da.insert(b"abc", 3).unwrap();
//!
//! assert_eq!(da.lookup(b"ab"), Some(2));
//! assert_eq!(da.lookup(b"abcd"), None);
//!
//! let hits: Vec<(usize, i32)> = da
//!     .common_prefix_search(b"abcd")
//!     .map(|m| (m.len, m.value))
//!     .collect();
//! assert_eq!(hits, vec![(1, 1), (2, 2), (3, 3)]);
//! ```
//!
//! After construction the trie is read-only; all query methods take `&self`
//! and the type is `Send + Sync`, so a built trie can be shared across
//! threads without locking.

mod double_array;
mod image;

pub use double_array::{CommonPrefixSearch, DoubleArray, Iter, PrefixMatch};

/// Errors reported by trie construction and image loading.
///
/// Lookup misses are not errors; they are `None` results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// The inserted key is already present. The trie is left untouched.
    #[error("key already present in trie")]
    KeyConflict,

    /// A persisted image failed structural validation. No partially-loaded
    /// trie is exposed.
    #[error("corrupt trie image: {0}")]
    CorruptImage(&'static str),
}
