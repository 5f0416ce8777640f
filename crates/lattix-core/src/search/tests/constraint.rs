use crate::search::testutil::test_dict;
use crate::search::{find_n_best, ConstraintElement, ConstraintSeq, Path, UniformConnection};

fn values(path: &Path) -> Vec<&str> {
    path.nodes.iter().map(|n| n.value.as_str()).collect()
}

fn matcher(start: usize, end: usize, value: &str) -> ConstraintElement {
    ConstraintElement::Matcher {
        start,
        end,
        value: value.to_string(),
    }
}

#[test]
fn test_matcher_pins_first_slot() {
    let dict = test_dict();
    let constraints = ConstraintSeq::new(vec![matcher(0, 1, "A")]);
    let paths = find_n_best(&dict, &UniformConnection(0), "abc", &constraints, 10);

    // Only the paths that start with the single-char node A survive.
    assert_eq!(paths.len(), 2);
    assert_eq!(values(&paths[0]), vec!["A", "BC"]);
    assert_eq!(values(&paths[1]), vec!["A", "B", "C"]);
}

#[test]
fn test_matcher_in_middle_slot() {
    let dict = test_dict();
    let constraints = ConstraintSeq::new(vec![
        ConstraintElement::Wildcard,
        matcher(1, 2, "B"),
    ]);
    let paths = find_n_best(&dict, &UniformConnection(0), "abc", &constraints, 10);

    assert_eq!(paths.len(), 1);
    assert_eq!(values(&paths[0]), vec!["A", "B", "C"]);
}

#[test]
fn test_terminator_limits_path_length() {
    let dict = test_dict();
    let constraints = ConstraintSeq::new(vec![
        ConstraintElement::Wildcard,
        ConstraintElement::Terminator,
    ]);
    let paths = find_n_best(&dict, &UniformConnection(0), "abc", &constraints, 10);

    // Exactly one node must span the whole input.
    assert_eq!(paths.len(), 1);
    assert_eq!(values(&paths[0]), vec!["ABC"]);
    assert_eq!(paths[0].cost, 50);
}

#[test]
fn test_unsatisfiable_constraint_yields_empty() {
    let dict = test_dict();
    let constraints = ConstraintSeq::new(vec![matcher(0, 2, "NOPE")]);
    let paths = find_n_best(&dict, &UniformConnection(0), "abc", &constraints, 10);
    assert!(paths.is_empty(), "pruned search space is not an error");
}

#[test]
fn test_every_emitted_path_satisfies_its_constraints() {
    let dict = test_dict();
    let constraints = ConstraintSeq::new(vec![ConstraintElement::Wildcard, matcher(1, 3, "BC")]);
    let paths = find_n_best(&dict, &UniformConnection(2), "abc", &constraints, 10);

    assert!(!paths.is_empty());
    for path in &paths {
        for (slot, node) in path.nodes.iter().enumerate() {
            assert!(
                constraints.compatibility(slot, node).is_some(),
                "emitted path violates slot {slot}"
            );
        }
        assert!(constraints.allows_end(path.nodes.len()));
    }
}

#[test]
fn test_constraints_longer_than_any_path() {
    let dict = test_dict();
    // Four matchers over a three-char input: no path can fill slot 3.
    let constraints = ConstraintSeq::new(vec![
        ConstraintElement::Wildcard,
        ConstraintElement::Wildcard,
        ConstraintElement::Wildcard,
        ConstraintElement::Wildcard,
    ]);
    let paths = find_n_best(&dict, &UniformConnection(0), "abc", &constraints, 10);
    assert!(paths.is_empty(), "leftover wildcard slots still demand nodes");
}
