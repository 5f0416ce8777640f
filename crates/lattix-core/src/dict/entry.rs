use serde::{Deserialize, Serialize};

/// A dictionary entry: the produced value, its emission cost, and the
/// category ids used for bigram connection costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub value: String,
    pub cost: i32,
    pub left_id: u16,
    pub right_id: u16,
}
