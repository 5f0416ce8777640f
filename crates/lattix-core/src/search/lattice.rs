use tracing::{debug, debug_span};

use crate::dict::Dictionary;

/// A candidate dictionary entry occupying an input span.
///
/// `key` and `value` are owned `String`s cloned from dictionary results;
/// nodes are transient per-query values and the spans involved are short,
/// so the clone cost does not warrant shared ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Start position (char index, inclusive)
    pub start: usize,
    /// End position (char index, exclusive)
    pub end: usize,
    /// The matched input substring (the dictionary key)
    pub key: String,
    /// The entry's produced value
    pub value: String,
    /// Emission cost (lower = more preferred)
    pub cost: i32,
    /// Left category id for connection costs
    pub left_id: u16,
    /// Right category id for connection costs
    pub right_id: u16,
}

/// The lattice: every dictionary entry matching somewhere in the input,
/// indexed by start position.
pub struct Lattice {
    /// All nodes in the lattice
    pub nodes: Vec<Node>,
    /// nodes_by_start[i] = indices of nodes that start at position i
    pub nodes_by_start: Vec<Vec<usize>>,
    /// Number of characters in the input
    pub char_count: usize,
}

impl Lattice {
    /// Builds a lattice from dictionary lookups.
    ///
    /// One `common_prefixes` walk per starting position finds all matching
    /// keys at once. Node order is deterministic: increasing start
    /// position, then increasing match length, then dictionary entry
    /// order. Positions no entry covers simply stay unreachable; the
    /// search layer reports a short result in that case.
    pub fn build(dict: &dyn Dictionary, input: &str) -> Self {
        let char_count = input.chars().count();
        let _span = debug_span!("build_lattice", char_count).entered();

        // Byte offset of each char position, so suffixes slice the input
        // directly instead of allocating per position.
        let byte_offsets: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
        let mut nodes = Vec::new();
        let mut nodes_by_start: Vec<Vec<usize>> = vec![Vec::new(); char_count];

        for start in 0..char_count {
            let suffix = &input[byte_offsets[start]..];
            for hit in dict.common_prefixes(suffix) {
                let key = &suffix[..hit.len];
                let end = start + key.chars().count();
                for entry in hit.entries {
                    let idx = nodes.len();
                    nodes.push(Node {
                        start,
                        end,
                        key: key.to_string(),
                        value: entry.value.clone(),
                        cost: entry.cost,
                        left_id: entry.left_id,
                        right_id: entry.right_id,
                    });
                    nodes_by_start[start].push(idx);
                }
            }
        }

        debug!(node_count = nodes.len());
        Lattice {
            nodes,
            nodes_by_start,
            char_count,
        }
    }
}
