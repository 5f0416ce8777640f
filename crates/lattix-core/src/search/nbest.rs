use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, debug_span};

use super::constraint::ConstraintSeq;
use super::cost::ConnectionCost;
use super::lattice::{Lattice, Node};

/// A complete path through the lattice: nodes covering the whole input
/// with no gaps or overlaps, plus the accumulated total cost (node
/// emission costs + connection costs + constraint adjustments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub cost: i64,
}

/// Immutable part of a hypothesis, kept in an arena so frontier entries
/// stay small and backpointer chains survive until emission.
struct Record {
    node_idx: usize,
    prev: Option<usize>,
    /// Constraint slot this node occupies.
    slot: usize,
}

/// Frontier entry: accumulated cost plus a discovery sequence number.
/// Lower cost wins; at equal cost the first-discovered hypothesis wins,
/// which makes the emission order a deterministic function of node
/// discovery order.
#[derive(PartialEq, Eq)]
struct FrontierEntry {
    cost: i64,
    seq: u64,
    record: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want pop-min.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-frontier enumeration of the `n` lowest-cost complete paths.
///
/// Pops the cheapest partial path; a full-span hypothesis is emitted,
/// anything else is extended with every admissible node starting at its
/// end position. Constraint rejections silently drop the candidate — the
/// frontier just never sees it. Runs until `n` paths are emitted or the
/// frontier is exhausted, whichever comes first.
pub(super) fn search(
    lattice: &Lattice,
    costs: &dyn ConnectionCost,
    constraints: &ConstraintSeq,
    n: usize,
) -> Vec<Path> {
    let _span = debug_span!("nbest_search", n, char_count = lattice.char_count).entered();

    let mut records: Vec<Record> = Vec::new();
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;
    // Edge scores keyed by node-index pair. Hypotheses that meet at the
    // same node reuse the cached score, so the cost function runs at most
    // once per adjacent pair.
    let mut edge_costs: HashMap<(usize, usize), i32> = HashMap::new();

    if lattice.char_count > 0 {
        for &idx in &lattice.nodes_by_start[0] {
            let node = &lattice.nodes[idx];
            let Some(adjustment) = constraints.compatibility(0, node) else {
                continue;
            };
            records.push(Record {
                node_idx: idx,
                prev: None,
                slot: 0,
            });
            frontier.push(FrontierEntry {
                cost: i64::from(node.cost) + i64::from(adjustment),
                seq,
                record: records.len() - 1,
            });
            seq += 1;
        }
    }

    let mut paths: Vec<Path> = Vec::new();
    while let Some(entry) = frontier.pop() {
        let record = &records[entry.record];
        let slot = record.slot;
        let node_idx = record.node_idx;
        let node = &lattice.nodes[node_idx];

        if node.end == lattice.char_count {
            if constraints.allows_end(slot + 1) {
                paths.push(Path {
                    nodes: backtrace(&records, entry.record, lattice),
                    cost: entry.cost,
                });
                if paths.len() == n {
                    break;
                }
            }
            continue;
        }

        for &next_idx in &lattice.nodes_by_start[node.end] {
            let next = &lattice.nodes[next_idx];
            let Some(adjustment) = constraints.compatibility(slot + 1, next) else {
                continue;
            };
            let transition = *edge_costs
                .entry((node_idx, next_idx))
                .or_insert_with(|| costs.connection(node, next).cost());
            let cost = entry.cost
                + i64::from(transition)
                + i64::from(next.cost)
                + i64::from(adjustment);
            records.push(Record {
                node_idx: next_idx,
                prev: Some(entry.record),
                slot: slot + 1,
            });
            frontier.push(FrontierEntry {
                cost,
                seq,
                record: records.len() - 1,
            });
            seq += 1;
        }
    }

    debug!(
        result_count = paths.len(),
        best_cost = paths.first().map(|p| p.cost)
    );
    paths
}

/// Rebuilds the node sequence from a backpointer chain. Only runs at
/// emission time, so exploration never copies partial paths.
fn backtrace(records: &[Record], end: usize, lattice: &Lattice) -> Vec<Node> {
    let mut indices = Vec::new();
    let mut cursor = Some(end);
    while let Some(at) = cursor {
        indices.push(records[at].node_idx);
        cursor = records[at].prev;
    }
    indices.reverse();
    indices
        .into_iter()
        .map(|idx| lattice.nodes[idx].clone())
        .collect()
}
