use std::fs::{self, File};
use std::path::Path;

use lattix_trie::DoubleArray;
use memmap2::Mmap;

use super::trie_dict::TrieDictionary;
use super::{DictError, Entry};

const MAGIC: &[u8; 4] = b"LXDA";
const VERSION: u8 = 1;
/// magic + version + reserved + trie_len + values_len = 16
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4;

impl TrieDictionary {
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let trie_data = self.trie.to_bytes();
        let values_data = bincode::serialize(&self.values).map_err(DictError::Serialize)?;

        let trie_len: u32 = trie_data
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("trie data exceeds u32::MAX".to_string()))?;
        let values_len: u32 = values_data
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("values data exceeds u32::MAX".to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + trie_data.len() + values_data.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]);
        buf.extend_from_slice(&trie_len.to_le_bytes());
        buf.extend_from_slice(&values_len.to_le_bytes());
        buf.extend_from_slice(&trie_data);
        buf.extend_from_slice(&values_data);

        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }

        let trie_len = u32::from_le_bytes(data[8..12].try_into().unwrap()) as usize;
        let values_len = u32::from_le_bytes(data[12..16].try_into().unwrap()) as usize;

        let expected = HEADER_SIZE + trie_len + values_len;
        if data.len() < expected {
            return Err(DictError::InvalidHeader);
        }

        let trie_start = HEADER_SIZE;
        let values_start = trie_start + trie_len;

        let trie = DoubleArray::from_bytes(&data[trie_start..trie_start + trie_len])?;
        let values: Vec<Vec<Entry>> =
            bincode::deserialize(&data[values_start..values_start + values_len])
                .map_err(DictError::Deserialize)?;

        // Every leaf must address a value table row, or lookups would panic
        // later on an image that passed the trie's own validation.
        if trie.len() != values.len() {
            return Err(DictError::Parse(format!(
                "trie holds {} keys but value table has {} rows",
                trie.len(),
                values.len()
            )));
        }
        for (key, value_id) in trie.iter() {
            if value_id < 0 || value_id as usize >= values.len() {
                return Err(DictError::Parse(format!(
                    "key {key:?} points at value row {value_id} of {}",
                    values.len()
                )));
            }
        }

        Ok(Self { trie, values })
    }

    /// Open a dictionary file, using mmap to avoid doubling peak memory.
    ///
    /// The trie is deserialized from the mapped region, then the mapping is
    /// dropped.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped after deserialization completes below.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}
