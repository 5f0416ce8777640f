//! Dictionary and connection-cost storage.
//!
//! `TrieDictionary` stores key → entries mappings behind a double-array
//! trie. `ConnectionMatrix` stores bigram transition costs between entry
//! categories.

pub mod connection;
mod entry;
mod trie_dict;
mod trie_dict_io;

pub use entry::Entry;
pub use trie_dict::TrieDictionary;

use std::io;

/// Unified error type for dictionary binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected LXDA)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("trie error: {0}")]
    Trie(#[from] lattix_trie::TrieError),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One common-prefix hit: a stored key of `len` bytes that prefixes the
/// query, with its entries.
pub struct PrefixEntries<'a> {
    pub len: usize,
    pub entries: &'a [Entry],
}

/// The two operations the lattice needs from a dictionary.
///
/// Implementations must be safe for concurrent read access; the search
/// layer shares one dictionary across parallel queries.
pub trait Dictionary: Send + Sync {
    /// Exact-match lookup. A miss is a normal `None`, never an error.
    fn lookup(&self, key: &str) -> Option<&[Entry]>;

    /// Lazily enumerates every stored key that prefixes `input`, in
    /// increasing length order. Runs once per input position during
    /// lattice assembly, so implementations should not materialize the
    /// result set.
    fn common_prefixes<'a>(&'a self, input: &'a str)
        -> Box<dyn Iterator<Item = PrefixEntries<'a>> + 'a>;
}
