//! Bigram connection costs.

/// An immutable connection between two adjacent lattice nodes. Carries a
/// single cost; two connections with equal cost are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection(i32);

impl Connection {
    pub fn new(cost: i32) -> Self {
        Self(cost)
    }

    pub fn cost(&self) -> i32 {
        self.0
    }
}

/// A dense cost matrix mapping (left_id, right_id) → cost, used to score
/// the transition from one entry category to the next.
pub struct ConnectionMatrix {
    num_ids: u16,
    costs: Vec<i16>,
}

impl ConnectionMatrix {
    /// Creates a matrix over `num_ids` categories. `costs` is laid out
    /// row-major (`left_id * num_ids + right_id`) and padded with zeros if
    /// shorter than `num_ids²`.
    pub fn new(num_ids: u16, mut costs: Vec<i16>) -> Self {
        costs.resize(num_ids as usize * num_ids as usize, 0);
        Self { num_ids, costs }
    }

    /// Look up the connection between two category ids. Out-of-range ids
    /// cost 0.
    pub fn connection(&self, left_id: u16, right_id: u16) -> Connection {
        let idx = (left_id as usize)
            .saturating_mul(self.num_ids as usize)
            .saturating_add(right_id as usize);
        let cost = if left_id < self.num_ids && right_id < self.num_ids {
            self.costs.get(idx).copied().unwrap_or(0)
        } else {
            0
        };
        Connection::new(i32::from(cost))
    }

    /// Number of category ids in this matrix.
    pub fn num_ids(&self) -> u16 {
        self.num_ids
    }
}
