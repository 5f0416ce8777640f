#![cfg(test)]

use crate::dict::{Entry, TrieDictionary};

fn entry(value: &str, cost: i32, id: u16) -> Entry {
    Entry {
        value: value.to_string(),
        cost,
        left_id: id,
        right_id: id,
    }
}

/// Shared test dictionary for lattice and search tests.
///
/// Over the input "abc" this produces five complete paths with distinct
/// costs under a zero connection cost:
///   a+bc = 35, ab+c = 45, abc = 50, a+b+c = 60, Ab+c = 70.
pub fn test_dict() -> TrieDictionary {
    TrieDictionary::from_entries(vec![
        ("a".to_string(), vec![entry("A", 10, 1)]),
        (
            "ab".to_string(),
            vec![entry("AB", 15, 2), entry("Ab", 40, 3)],
        ),
        ("abc".to_string(), vec![entry("ABC", 50, 4)]),
        ("b".to_string(), vec![entry("B", 20, 5)]),
        ("bc".to_string(), vec![entry("BC", 25, 6)]),
        ("c".to_string(), vec![entry("C", 30, 7)]),
    ])
    .unwrap()
}
