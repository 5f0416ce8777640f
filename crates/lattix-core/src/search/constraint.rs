use super::lattice::Node;

/// A positional admissibility predicate over candidate nodes.
///
/// The variant set is closed: a matcher pinned to one node identity, a
/// wildcard, and a terminator that only marks the end of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintElement {
    /// Compatible only with a node of exactly this span and value.
    Matcher {
        start: usize,
        end: usize,
        value: String,
    },
    /// Compatible with any node.
    Wildcard,
    /// Legal only as the final slot; matches no node.
    Terminator,
}

impl ConstraintElement {
    /// Checks a candidate node against this element. `Some(adjustment)` is
    /// an additive cost contribution; `None` is the reject sentinel.
    pub fn compatibility(&self, node: &Node) -> Option<i32> {
        match self {
            ConstraintElement::Matcher { start, end, value } => {
                (node.start == *start && node.end == *end && node.value == *value).then_some(0)
            }
            ConstraintElement::Wildcard => Some(0),
            ConstraintElement::Terminator => None,
        }
    }
}

/// An ordered constraint sequence applied positionally: path slot `i` must
/// satisfy element `i`. Slots past the end of the sequence are
/// unconstrained.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSeq {
    elements: Vec<ConstraintElement>,
}

impl ConstraintSeq {
    pub fn new(elements: Vec<ConstraintElement>) -> Self {
        Self { elements }
    }

    /// A sequence that accepts every path.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Checks the node proposed for path slot `slot`.
    pub fn compatibility(&self, slot: usize, node: &Node) -> Option<i32> {
        match self.elements.get(slot) {
            Some(element) => element.compatibility(node),
            None => Some(0),
        }
    }

    /// Whether a path may end with `slot` slots filled: either the
    /// sequence is exhausted, or the next element is the terminator. A
    /// leftover matcher or wildcard still demands a node.
    pub fn allows_end(&self, slot: usize) -> bool {
        match self.elements.get(slot) {
            None => true,
            Some(ConstraintElement::Terminator) => true,
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(start: usize, end: usize, value: &str) -> Node {
        Node {
            start,
            end,
            key: value.to_lowercase(),
            value: value.to_string(),
            cost: 0,
            left_id: 0,
            right_id: 0,
        }
    }

    #[test]
    fn test_matcher() {
        let element = ConstraintElement::Matcher {
            start: 0,
            end: 2,
            value: "AB".to_string(),
        };
        assert_eq!(element.compatibility(&node(0, 2, "AB")), Some(0));
        assert_eq!(element.compatibility(&node(0, 2, "XY")), None);
        assert_eq!(element.compatibility(&node(1, 3, "AB")), None);
    }

    #[test]
    fn test_wildcard_accepts_anything() {
        assert_eq!(
            ConstraintElement::Wildcard.compatibility(&node(3, 9, "Q")),
            Some(0)
        );
    }

    #[test]
    fn test_terminator_rejects_nodes() {
        assert_eq!(
            ConstraintElement::Terminator.compatibility(&node(0, 1, "A")),
            None
        );
    }

    #[test]
    fn test_sequence_defaults_to_wildcard_past_end() {
        let seq = ConstraintSeq::new(vec![ConstraintElement::Wildcard]);
        assert_eq!(seq.compatibility(5, &node(0, 1, "A")), Some(0));
        assert!(seq.allows_end(1));
        assert!(seq.allows_end(7));
    }

    #[test]
    fn test_sequence_end_rules() {
        let seq = ConstraintSeq::new(vec![
            ConstraintElement::Wildcard,
            ConstraintElement::Terminator,
        ]);
        assert!(!seq.allows_end(0), "a wildcard slot still demands a node");
        assert!(seq.allows_end(1), "terminator marks the legal end");
    }
}
