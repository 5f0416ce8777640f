//! Lattice assembly and ranked path enumeration.
//!
//! Builds a position-indexed lattice of candidate dictionary entries over
//! an input, then runs a priority-frontier search that emits the N
//! lowest-cost paths spanning the whole input, in non-decreasing cost
//! order, honoring per-slot admissibility constraints.

mod constraint;
mod cost;
mod lattice;
mod nbest;
pub(crate) mod testutil;

#[cfg(test)]
mod tests;

pub use constraint::{ConstraintElement, ConstraintSeq};
pub use cost::{ConnectionCost, MatrixConnection, UniformConnection};
pub use lattice::{Lattice, Node};
pub use nbest::Path;

use crate::dict::Dictionary;

/// Enumerates at most `n` lowest-cost paths spanning `input`, in
/// non-decreasing total-cost order.
///
/// Candidate nodes come from `dict` prefix lookups; adjacent nodes are
/// scored by `costs`; path slot `i` must satisfy `constraints` element `i`
/// (missing elements are wildcards). Fewer than `n` paths — including
/// none — is a normal short result, not an error. Given identical inputs
/// the result sequence is exactly reproducible.
pub fn find_n_best(
    dict: &dyn Dictionary,
    costs: &dyn ConnectionCost,
    input: &str,
    constraints: &ConstraintSeq,
    n: usize,
) -> Vec<Path> {
    if input.is_empty() || n == 0 {
        return Vec::new();
    }
    let lattice = Lattice::build(dict, input);
    nbest::search(&lattice, costs, constraints, n)
}
