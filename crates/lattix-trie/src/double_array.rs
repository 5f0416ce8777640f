use crate::TrieError;

/// Marker for a vacant slot and for a node with no children yet.
pub(crate) const VACANT: i32 = -1;

/// The root always lives at slot 0 and owns itself.
pub(crate) const ROOT: usize = 0;

/// Transition label for end-of-key. Byte `b` travels on label `b + 1`, so
/// keys may contain any byte value, including NUL.
const TERMINAL: u32 = 0;

const MAX_LABEL: u32 = 256;

#[inline]
fn label_of(byte: u8) -> u32 {
    u32::from(byte) + 1
}

/// One double-array slot.
///
/// For an interior node, `base + label` addresses the child slot. For a leaf
/// (a slot reached via the terminal label), `base` holds the stored value
/// instead. `check` is the parent slot index, or `VACANT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) base: i32,
    pub(crate) check: i32,
}

const VACANT_CELL: Cell = Cell {
    base: VACANT,
    check: VACANT,
};

/// A key prefix found by [`DoubleArray::common_prefix_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Matched length in bytes.
    pub len: usize,
    /// Value stored for the matched key.
    pub value: i32,
}

/// A double-array trie from byte keys to `i32` values.
///
/// The slot array is an index-addressed arena; relocation rewrites indices,
/// never pointers. The array only grows — vacated slots stay allocated and
/// become reusable by later placements.
#[derive(Debug, PartialEq, Eq)]
pub struct DoubleArray {
    pub(crate) cells: Vec<Cell>,
    /// Number of stored keys.
    pub(crate) key_count: usize,
    /// Lowest slot that may still be vacant. Free-slot scans start near here
    /// instead of at the array head.
    search_start: usize,
}

impl Default for DoubleArray {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleArray {
    /// Creates an empty trie holding only the root slot.
    pub fn new() -> Self {
        Self {
            cells: vec![Cell {
                base: VACANT,
                check: 0,
            }],
            key_count: 0,
            search_start: 1,
        }
    }

    pub(crate) fn from_parts(cells: Vec<Cell>, key_count: usize) -> Self {
        let search_start = cells.len();
        Self {
            cells,
            key_count,
            search_start,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of allocated slots, occupied or vacant.
    pub fn num_slots(&self) -> usize {
        self.cells.len()
    }

    /// Fraction of allocated slots that are vacant.
    pub fn vacancy_rate(&self) -> f64 {
        let vacant = self.cells.iter().filter(|c| c.check == VACANT).count();
        vacant as f64 / self.cells.len() as f64
    }

    #[inline]
    fn occupied(&self, slot: usize) -> bool {
        slot < self.cells.len() && self.cells[slot].check != VACANT
    }

    /// Follows `label` from `node`, if the transition exists.
    #[inline]
    fn child(&self, node: usize, label: u32) -> Option<usize> {
        let base = self.cells[node].base;
        if base < 1 {
            return None;
        }
        let slot = base as usize + label as usize;
        if self.occupied(slot) && self.cells[slot].check == node as i32 {
            Some(slot)
        } else {
            None
        }
    }

    /// Labels of all existing transitions out of `node`, ascending.
    fn child_labels(&self, node: usize) -> Vec<u32> {
        let base = self.cells[node].base;
        if base < 1 {
            return Vec::new();
        }
        let mut labels = Vec::new();
        for label in TERMINAL..=MAX_LABEL {
            let slot = base as usize + label as usize;
            if self.occupied(slot) && self.cells[slot].check == node as i32 {
                labels.push(label);
            }
        }
        labels
    }

    /// Inserts a key. Fails with [`TrieError::KeyConflict`] if the key is
    /// already present; the trie is not modified in that case.
    pub fn insert(&mut self, key: &[u8], value: i32) -> Result<(), TrieError> {
        // Read-only walk over the existing prefix. A duplicate key has every
        // transition already in place, so conflict detection happens before
        // any slot is touched.
        let mut node = ROOT;
        let mut consumed = 0;
        for &byte in key {
            match self.child(node, label_of(byte)) {
                Some(next) => {
                    node = next;
                    consumed += 1;
                }
                None => break,
            }
        }
        if consumed == key.len() && self.child(node, TERMINAL).is_some() {
            return Err(TrieError::KeyConflict);
        }

        for &byte in &key[consumed..] {
            node = self.add_transition(node, label_of(byte));
        }
        let leaf = self.add_transition(node, TERMINAL);
        self.cells[leaf].base = value;
        self.key_count += 1;
        Ok(())
    }

    /// Looks up a key, exact match only.
    pub fn lookup(&self, key: &[u8]) -> Option<i32> {
        let mut node = ROOT;
        for &byte in key {
            node = self.child(node, label_of(byte))?;
        }
        let leaf = self.child(node, TERMINAL)?;
        Some(self.cells[leaf].base)
    }

    /// Enumerates every stored key that is a prefix of `input`, in
    /// increasing length order. Lazy; allocates nothing per step.
    pub fn common_prefix_search<'a>(&'a self, input: &'a [u8]) -> CommonPrefixSearch<'a> {
        CommonPrefixSearch {
            da: self,
            input,
            node: Some(ROOT),
            pos: 0,
            terminal_checked: false,
        }
    }

    /// Enumerates all `(key, value)` pairs in byte-lexicographic key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            da: self,
            stack: vec![(ROOT, TERMINAL)],
            prefix: Vec::new(),
        }
    }

    fn ensure_slot(&mut self, slot: usize) {
        if slot >= self.cells.len() {
            self.cells.resize(slot + 1, VACANT_CELL);
        }
    }

    fn claim(&mut self, slot: usize, parent: usize) {
        self.ensure_slot(slot);
        debug_assert_eq!(self.cells[slot].check, VACANT);
        self.cells[slot].check = parent as i32;
        while self.search_start < self.cells.len()
            && self.cells[self.search_start].check != VACANT
        {
            self.search_start += 1;
        }
    }

    /// Finds a base that can host transitions for all of `labels` (ascending)
    /// without touching any occupied slot. Scans forward from the vacancy
    /// cursor; the array is extended implicitly by the later `claim`s.
    fn find_base(&self, labels: &[u32]) -> i32 {
        debug_assert!(!labels.is_empty());
        let first = labels[0];
        let mut base = self.search_start as i32 - first as i32;
        if base < 1 {
            base = 1;
        }
        loop {
            let fits = labels.iter().all(|&label| {
                let slot = base as usize + label as usize;
                !self.occupied(slot)
            });
            if fits {
                return base;
            }
            base += 1;
        }
    }

    /// Adds (or finds) the transition `label` out of `parent`, resolving
    /// collisions by relocating whichever sibling set is smaller.
    ///
    /// Relocation is where `check` back-pointers can silently desynchronize;
    /// every moved slot must have its children re-pointed in the same pass.
    fn add_transition(&mut self, parent: usize, label: u32) -> usize {
        let base = self.cells[parent].base;
        if base < 1 {
            // First child of this node.
            let new_base = self.find_base(&[label]);
            self.cells[parent].base = new_base;
            let slot = new_base as usize + label as usize;
            self.claim(slot, parent);
            return slot;
        }

        let slot = base as usize + label as usize;
        if !self.occupied(slot) {
            self.claim(slot, parent);
            return slot;
        }
        if self.cells[slot].check == parent as i32 {
            return slot;
        }

        // Collision. The target slot belongs to another parent's sibling set.
        let other = self.cells[slot].check as usize;
        let own_degree = self.child_labels(parent).len() + 1;
        let other_degree = self.child_labels(other).len();

        if own_degree <= other_degree {
            let mut unmoved = parent;
            self.relocate(parent, Some(label), &mut unmoved);
            debug_assert_eq!(unmoved, parent);
            let slot = self.cells[parent].base as usize + label as usize;
            self.claim(slot, parent);
            slot
        } else {
            // Moving the other sibling set vacates exactly the slot we need.
            // `parent` itself may be one of the moved slots.
            let mut parent = parent;
            self.relocate(other, None, &mut parent);
            let slot = self.cells[parent].base as usize + label as usize;
            self.claim(slot, parent);
            slot
        }
    }

    /// Moves the whole sibling set under `node` to a fresh base. The new
    /// base additionally accommodates `extra_label` when given. `watched` is
    /// updated if the slot it names is among the moved siblings.
    fn relocate(&mut self, node: usize, extra_label: Option<u32>, watched: &mut usize) {
        let labels = self.child_labels(node);
        let mut host_labels = labels.clone();
        if let Some(extra) = extra_label {
            match host_labels.binary_search(&extra) {
                Ok(_) => {}
                Err(at) => host_labels.insert(at, extra),
            }
        }
        let old_base = self.cells[node].base;
        let new_base = self.find_base(&host_labels);

        for &label in &labels {
            let old_slot = old_base as usize + label as usize;
            let new_slot = new_base as usize + label as usize;
            self.ensure_slot(new_slot);
            self.cells[new_slot] = self.cells[old_slot];

            // Re-point the moved slot's children. Leaves store a value in
            // `base`; the occupancy and check guards keep the scan from
            // matching anything under such a garbage base.
            let child_base = self.cells[old_slot].base;
            if child_base >= 1 {
                for grand_label in TERMINAL..=MAX_LABEL {
                    let grand = child_base as usize + grand_label as usize;
                    if self.occupied(grand) && self.cells[grand].check == old_slot as i32 {
                        self.cells[grand].check = new_slot as i32;
                    }
                }
            }

            if *watched == old_slot {
                *watched = new_slot;
            }
            self.cells[old_slot] = VACANT_CELL;
            if old_slot < self.search_start {
                self.search_start = old_slot;
            }
        }
        self.cells[node].base = new_base;
    }
}

/// Lazy enumerator over stored keys that prefix a query. See
/// [`DoubleArray::common_prefix_search`].
pub struct CommonPrefixSearch<'a> {
    da: &'a DoubleArray,
    input: &'a [u8],
    node: Option<usize>,
    pos: usize,
    terminal_checked: bool,
}

impl Iterator for CommonPrefixSearch<'_> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<PrefixMatch> {
        while let Some(node) = self.node {
            if !self.terminal_checked {
                self.terminal_checked = true;
                if let Some(leaf) = self.da.child(node, TERMINAL) {
                    return Some(PrefixMatch {
                        len: self.pos,
                        value: self.da.cells[leaf].base,
                    });
                }
            }
            if self.pos >= self.input.len() {
                self.node = None;
                break;
            }
            match self.da.child(node, label_of(self.input[self.pos])) {
                Some(next) => {
                    self.node = Some(next);
                    self.pos += 1;
                    self.terminal_checked = false;
                }
                None => self.node = None,
            }
        }
        None
    }
}

/// Depth-first enumerator over all stored keys. See [`DoubleArray::iter`].
pub struct Iter<'a> {
    da: &'a DoubleArray,
    /// (node, next label to try) frames; `prefix` holds the bytes consumed
    /// by every non-root frame.
    stack: Vec<(usize, u32)>,
    prefix: Vec<u8>,
}

impl Iterator for Iter<'_> {
    type Item = (Vec<u8>, i32);

    fn next(&mut self) -> Option<(Vec<u8>, i32)> {
        while let Some(&mut (node, ref mut next_label)) = self.stack.last_mut() {
            let mut found = None;
            let mut label = *next_label;
            while label <= MAX_LABEL {
                if let Some(child) = self.da.child(node, label) {
                    found = Some((label, child));
                    break;
                }
                label += 1;
            }
            match found {
                Some((label, child)) => {
                    *next_label = label + 1;
                    if label == TERMINAL {
                        return Some((self.prefix.clone(), self.da.cells[child].base));
                    }
                    self.prefix.push((label - 1) as u8);
                    self.stack.push((child, TERMINAL));
                }
                None => {
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.prefix.pop();
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keys: &[(&[u8], i32)]) -> DoubleArray {
        let mut da = DoubleArray::new();
        for &(key, value) in keys {
            da.insert(key, value).unwrap();
        }
        da
    }

    #[test]
    fn test_insert_lookup_roundtrip() {
        let da = build(&[(b"a", 1), (b"ab", 2), (b"abc", 3), (b"b", 4)]);
        assert_eq!(da.lookup(b"a"), Some(1));
        assert_eq!(da.lookup(b"ab"), Some(2));
        assert_eq!(da.lookup(b"abc"), Some(3));
        assert_eq!(da.lookup(b"b"), Some(4));
        assert_eq!(da.len(), 4);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let da = build(&[(b"ab", 2)]);
        assert_eq!(da.lookup(b"a"), None, "prefix of a key must not match");
        assert_eq!(da.lookup(b"abc"), None);
        assert_eq!(da.lookup(b"zz"), None);
        assert_eq!(da.lookup(b""), None);
    }

    #[test]
    fn test_empty_trie() {
        let da = DoubleArray::new();
        assert!(da.is_empty());
        assert_eq!(da.lookup(b"a"), None);
        assert_eq!(da.common_prefix_search(b"abc").count(), 0);
        assert_eq!(da.iter().count(), 0);
    }

    #[test]
    fn test_duplicate_key_conflicts_and_leaves_state_intact() {
        let mut da = build(&[(b"kuma", 10), (b"kumo", 20), (b"tora", 30)]);
        let slots_before = da.num_slots();

        assert_eq!(da.insert(b"kumo", 99), Err(TrieError::KeyConflict));

        assert_eq!(da.num_slots(), slots_before);
        assert_eq!(da.lookup(b"kuma"), Some(10));
        assert_eq!(da.lookup(b"kumo"), Some(20));
        assert_eq!(da.lookup(b"tora"), Some(30));
        assert_eq!(da.len(), 3);
    }

    #[test]
    fn test_common_prefix_scenario() {
        let da = build(&[(b"a", 1), (b"ab", 2), (b"abc", 3)]);
        let hits: Vec<(usize, i32)> = da
            .common_prefix_search(b"abcd")
            .map(|m| (m.len, m.value))
            .collect();
        assert_eq!(hits, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_common_prefix_excludes_non_keys() {
        let da = build(&[(b"ab", 2), (b"abcd", 4)]);
        let hits: Vec<(usize, i32)> = da
            .common_prefix_search(b"abc")
            .map(|m| (m.len, m.value))
            .collect();
        assert_eq!(hits, vec![(2, 2)], "abcd extends past the input");
    }

    #[test]
    fn test_common_prefix_is_lazy_and_restartable() {
        let da = build(&[(b"a", 1), (b"ab", 2), (b"abc", 3)]);
        let mut search = da.common_prefix_search(b"abc");
        assert_eq!(search.next().map(|m| m.value), Some(1));
        drop(search);
        // A fresh search starts over from the root.
        assert_eq!(da.common_prefix_search(b"abc").count(), 3);
    }

    #[test]
    fn test_keys_with_nul_bytes() {
        let da = build(&[(b"\x00", 1), (b"\x00\x00", 2), (b"a\x00b", 3)]);
        assert_eq!(da.lookup(b"\x00"), Some(1));
        assert_eq!(da.lookup(b"\x00\x00"), Some(2));
        assert_eq!(da.lookup(b"a\x00b"), Some(3));
        assert_eq!(da.lookup(b"a\x00"), None);
    }

    #[test]
    fn test_empty_key() {
        let da = build(&[(b"", 7), (b"a", 1)]);
        assert_eq!(da.lookup(b""), Some(7));
        let hits: Vec<(usize, i32)> = da
            .common_prefix_search(b"ab")
            .map(|m| (m.len, m.value))
            .collect();
        assert_eq!(hits, vec![(0, 7), (1, 1)]);
    }

    #[test]
    fn test_negative_and_extreme_values() {
        let da = build(&[(b"neg", -42), (b"min", i32::MIN), (b"max", i32::MAX)]);
        assert_eq!(da.lookup(b"neg"), Some(-42));
        assert_eq!(da.lookup(b"min"), Some(i32::MIN));
        assert_eq!(da.lookup(b"max"), Some(i32::MAX));
    }

    #[test]
    fn test_iter_lexicographic_order() {
        let da = build(&[(b"b", 2), (b"ab", 12), (b"a", 1), (b"abc", 13), (b"ba", 21)]);
        let keys: Vec<Vec<u8>> = da.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                b"a".to_vec(),
                b"ab".to_vec(),
                b"abc".to_vec(),
                b"b".to_vec(),
                b"ba".to_vec(),
            ]
        );
        let values: Vec<i32> = da.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1, 12, 13, 2, 21]);
    }

    /// Dense key sets force repeated sibling-set relocations; every key must
    /// stay reachable and every absent key must stay absent.
    #[test]
    fn test_relocation_stress() {
        let mut keys: Vec<Vec<u8>> = Vec::new();
        for a in 0u8..26 {
            for b in 0u8..26 {
                keys.push(vec![b'a' + a, b'a' + b]);
                keys.push(vec![b'a' + b, b'a' + a, b'z' - a]);
            }
        }
        keys.sort();
        keys.dedup();

        // Insertion in an order that interleaves prefixes maximizes
        // collisions against already-placed sibling sets.
        keys.reverse();

        let mut da = DoubleArray::new();
        for (i, key) in keys.iter().enumerate() {
            da.insert(key, i as i32).unwrap();
        }
        assert_eq!(da.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(da.lookup(key), Some(i as i32), "lost key {key:?}");
        }
        assert_eq!(da.lookup(b"a"), None);
        assert_eq!(da.lookup(b"aaaa"), None);

        let mut enumerated: Vec<Vec<u8>> = da.iter().map(|(k, _)| k).collect();
        let mut expected = keys.clone();
        expected.sort();
        enumerated.sort();
        assert_eq!(enumerated, expected);
    }

    #[test]
    fn test_vacancy_introspection() {
        let da = DoubleArray::new();
        assert_eq!(da.num_slots(), 1);
        assert_eq!(da.vacancy_rate(), 0.0, "the root slot is always occupied");

        // Sparse sibling sets leave gaps between claimed slots.
        let da = build(&[(b"a", 1), (b"m", 2), (b"z", 3)]);
        let rate = da.vacancy_rate();
        assert!(rate > 0.0 && rate < 1.0, "rate {rate} out of range");

        // Filling in siblings reuses vacant slots, so the rate drops.
        let mut dense = DoubleArray::new();
        for b in b'a'..=b'z' {
            dense.insert(&[b], i32::from(b)).unwrap();
        }
        assert!(
            dense.vacancy_rate() < rate,
            "a dense sibling set must waste fewer slots than a sparse one"
        );
    }

    #[test]
    fn test_shared_trie_concurrent_reads() {
        let da = build(&[(b"a", 1), (b"ab", 2), (b"abc", 3)]);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(da.lookup(b"ab"), Some(2));
                        assert_eq!(da.common_prefix_search(b"abcd").count(), 3);
                    }
                });
            }
        });
    }
}
