use crate::dict::connection::{Connection, ConnectionMatrix};

use super::lattice::Node;

/// Scores the transition between two adjacent lattice nodes.
///
/// Implementations must be pure: the search calls this at most once per
/// adjacent pair it considers, assumes results are deterministic, and
/// shares one instance across concurrent queries.
pub trait ConnectionCost: Send + Sync {
    fn connection(&self, left: &Node, right: &Node) -> Connection;
}

/// Connection costs from a bigram category matrix: the cost of following
/// `left` with `right` is `matrix[left.right_id][right.left_id]`.
pub struct MatrixConnection<'a> {
    matrix: &'a ConnectionMatrix,
}

impl<'a> MatrixConnection<'a> {
    pub fn new(matrix: &'a ConnectionMatrix) -> Self {
        Self { matrix }
    }
}

impl ConnectionCost for MatrixConnection<'_> {
    fn connection(&self, left: &Node, right: &Node) -> Connection {
        self.matrix.connection(left.right_id, right.left_id)
    }
}

/// The same cost for every transition. Zero disables connection scoring
/// entirely; tests use small nonzero values.
pub struct UniformConnection(pub i32);

impl ConnectionCost for UniformConnection {
    fn connection(&self, _left: &Node, _right: &Node) -> Connection {
        Connection::new(self.0)
    }
}
