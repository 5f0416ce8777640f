//! Dictionary-backed lattice path search.
//!
//! `dict` stores entries behind a double-array trie and models transition
//! costs; `search` assembles a lattice over an input from dictionary
//! lookups and enumerates its N lowest-cost complete paths under optional
//! positional constraints.

pub mod dict;
pub mod search;
