use lattix_trie::DoubleArray;

use super::{DictError, Dictionary, Entry, PrefixEntries};

/// A dictionary backed by a double-array trie.
///
/// The trie maps each key's bytes to an index into a value table holding
/// that key's entries, sorted by cost. Built once, then read-only; the
/// trie must outlive any node or path derived from it, which the borrow
/// checker enforces through the `&[Entry]` slices handed out.
pub struct TrieDictionary {
    pub(super) trie: DoubleArray,
    pub(super) values: Vec<Vec<Entry>>,
}

impl TrieDictionary {
    /// Builds a dictionary from `(key, entries)` pairs.
    ///
    /// Keys are sorted by their byte representation before insertion so
    /// entry order is independent of input order; a repeated key surfaces
    /// the trie's `KeyConflict`.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Vec<Entry>)>,
    ) -> Result<Self, DictError> {
        let mut pairs: Vec<(String, Vec<Entry>)> = entries.into_iter().collect();
        for (_, candidates) in &mut pairs {
            candidates.sort_by_key(|e| e.cost);
        }
        pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let mut trie = DoubleArray::new();
        let mut values = Vec::with_capacity(pairs.len());
        for (key, candidates) in pairs {
            trie.insert(key.as_bytes(), values.len() as i32)?;
            values.push(candidates);
        }

        Ok(Self { trie, values })
    }

    /// Iterate over all `(key, entries)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Vec<Entry>)> {
        self.trie.iter().map(move |(key, value_id)| {
            let key = String::from_utf8(key)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
            (key, &self.values[value_id as usize])
        })
    }

    /// Returns (key_count, entry_count).
    pub fn stats(&self) -> (usize, usize) {
        let keys = self.values.len();
        let entries: usize = self.values.iter().map(|v| v.len()).sum();
        (keys, entries)
    }
}

impl Dictionary for TrieDictionary {
    fn lookup(&self, key: &str) -> Option<&[Entry]> {
        self.trie
            .lookup(key.as_bytes())
            .map(|id| self.values[id as usize].as_slice())
    }

    fn common_prefixes<'a>(
        &'a self,
        input: &'a str,
    ) -> Box<dyn Iterator<Item = PrefixEntries<'a>> + 'a> {
        Box::new(
            self.trie
                .common_prefix_search(input.as_bytes())
                .map(move |m| PrefixEntries {
                    len: m.len,
                    entries: self.values[m.value as usize].as_slice(),
                }),
        )
    }
}
